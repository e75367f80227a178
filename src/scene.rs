//! Scene: both engines, their frame loops and the shared inputs.
//!
//! The scene is the composition root every host drives the same way:
//!
//! 1. [`Scene::start`] builds the populations and arms one frame per loop.
//! 2. The host forwards pointer moves and viewport changes as they happen.
//! 3. Whenever a requested frame fires, the host hands its token to
//!    [`Scene::run_frame`], which updates that subsystem and re-arms it.
//!
//! Re-creating a population ([`Scene::start_swarm`], [`Scene::start_field`])
//! removes the old elements from the sink and restarts that loop, so a frame
//! the old loop had already requested is dropped when it fires.

use crate::config::SceneConfig;
use crate::error::ConfigError;
use crate::field::FieldEngine;
use crate::input::{PointerState, Viewport};
use crate::scheduler::{FrameScheduler, FrameToken, RepaintHost, Subsystem};
use crate::sink::RenderSink;
use crate::spawn::SpawnContext;
use crate::swarm::SwarmEngine;
use crate::time::Time;
use glam::Vec2;

pub struct Scene {
    config: SceneConfig,
    spawn: SpawnContext,
    pointer: PointerState,
    viewport: Viewport,
    time: Time,
    swarm: Option<SwarmEngine>,
    field: Option<FieldEngine>,
    swarm_loop: FrameScheduler,
    field_loop: FrameScheduler,
}

impl Scene {
    /// Validate `config` and prepare an idle scene.
    pub fn new(config: SceneConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawn = match config.seed {
            Some(seed) => SpawnContext::seeded(seed),
            None => SpawnContext::from_time(),
        };
        tracing::info!(
            seed = spawn.seed(),
            width = viewport.width,
            height = viewport.height,
            "scene created"
        );
        Ok(Self {
            config,
            spawn,
            pointer: PointerState::new(viewport),
            viewport,
            time: Time::new(),
            swarm: None,
            field: None,
            swarm_loop: FrameScheduler::new(Subsystem::Swarm),
            field_loop: FrameScheduler::new(Subsystem::Field),
        })
    }

    /// Create every configured population and start its loop.
    pub fn start(&mut self, host: &mut dyn RepaintHost, sink: &mut dyn RenderSink) {
        if let Some(count) = self.config.swarm.as_ref().map(|c| c.count) {
            self.start_swarm(count, host, sink);
        }
        if let Some(count) = self.config.field.as_ref().map(|c| c.count) {
            self.start_field(count, host, sink);
        }
    }

    /// (Re-)create the swarm with `count` followers.
    pub fn start_swarm(
        &mut self,
        count: u32,
        host: &mut dyn RepaintHost,
        sink: &mut dyn RenderSink,
    ) {
        self.swarm_loop.stop();
        let mut config = self.config.swarm.clone().unwrap_or_default();
        config.count = count;
        self.swarm = Some(SwarmEngine::create(
            config,
            &mut self.spawn,
            self.viewport,
            sink,
        ));
        self.swarm_loop.start(host);
    }

    /// (Re-)create the field with `count` shapes.
    pub fn start_field(
        &mut self,
        count: u32,
        host: &mut dyn RepaintHost,
        sink: &mut dyn RenderSink,
    ) {
        self.field_loop.stop();
        let mut config = self.config.field.clone().unwrap_or_default();
        config.count = count;
        self.field = Some(FieldEngine::create(
            config,
            &mut self.spawn,
            self.viewport,
            sink,
        ));
        self.field_loop.start(host);
    }

    /// Stop both loops. Elements stay where they were last placed.
    pub fn stop(&mut self) {
        self.swarm_loop.stop();
        self.field_loop.stop();
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer.move_to(position);
    }

    /// Record the live viewport size.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.pointer.recenter(viewport);
    }

    /// Run the frame `token` was requested for.
    ///
    /// Returns `false` if the token is stale (its loop was stopped or
    /// restarted since the request).
    pub fn run_frame(
        &mut self,
        token: FrameToken,
        host: &mut dyn RepaintHost,
        sink: &mut dyn RenderSink,
    ) -> bool {
        match token.subsystem() {
            Subsystem::Swarm => {
                let Self {
                    swarm_loop,
                    swarm,
                    time,
                    pointer,
                    ..
                } = self;
                swarm_loop.fire(token, host, || {
                    let t = time.update();
                    let pointer = pointer.snapshot();
                    if let Some(swarm) = swarm {
                        swarm.update(t, pointer, sink);
                    }
                })
            }
            Subsystem::Field => {
                let Self {
                    field_loop,
                    field,
                    viewport,
                    ..
                } = self;
                let viewport = *viewport;
                field_loop.fire(token, host, || {
                    if let Some(field) = field {
                        field.update(viewport, sink);
                    }
                })
            }
        }
    }

    pub fn swarm(&self) -> Option<&SwarmEngine> {
        self.swarm.as_ref()
    }

    pub fn field(&self) -> Option<&FieldEngine> {
        self.field.as_ref()
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Mutable clock, e.g. to pause or fix the step.
    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.spawn.seed()
    }

    pub fn is_running(&self) -> bool {
        self.swarm_loop.is_running() || self.field_loop.is_running()
    }
}
