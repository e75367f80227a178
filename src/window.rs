//! Native window host.
//!
//! Drives a [`Scene`] from winit: pointer moves come from `CursorMoved`, and
//! every frame either loop requests becomes a `request_redraw`. When
//! `RedrawRequested` arrives, all pending frames run and the sink is drawn
//! once. The event loop waits between redraws, so a stopped scene idles.
//!
//! Keys: `R` re-creates the swarm, `F` the field, `Space` pauses, `Escape`
//! quits.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::error::RunError;
use crate::gpu::{GpuSink, GpuState};
use crate::input::{Input, KeyCode, Viewport};
use crate::scene::Scene;
use crate::scheduler::{FrameToken, RepaintHost};

/// Open a window and animate `config` until it is closed.
pub fn run(config: SceneConfig) -> Result<(), RunError> {
    config.validate()?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Repaint host backed by the window's redraw requests.
struct WindowHost {
    window: Arc<Window>,
    pending: Vec<FrameToken>,
}

impl RepaintHost for WindowHost {
    fn request_repaint(&mut self, token: FrameToken) {
        self.pending.push(token);
        self.window.request_redraw();
    }
}

struct Running {
    window: Arc<Window>,
    gpu: GpuState,
    sink: GpuSink,
    scene: Scene,
    input: Input,
    host: WindowHost,
}

impl Running {
    fn new(event_loop: &ActiveEventLoop, config: &SceneConfig) -> Result<Self, RunError> {
        let window_attrs = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = pollster::block_on(GpuState::new(window.clone()))?;

        let scale_factor = window.scale_factor();
        let logical = window.inner_size().to_logical::<f32>(scale_factor);
        let viewport = Viewport::new(logical.width, logical.height);

        let mut scene = Scene::new(config.clone(), viewport)?;
        let mut sink = GpuSink::new();
        let mut host = WindowHost {
            window: window.clone(),
            pending: Vec::new(),
        };
        scene.start(&mut host, &mut sink);

        Ok(Self {
            window,
            gpu,
            sink,
            scene,
            input: Input::new(viewport, scale_factor),
            host,
        })
    }

    fn handle_keys(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
        }
        if self.input.key_pressed(KeyCode::R) {
            let count = self.scene.config().swarm.clone().unwrap_or_default().count;
            self.scene.start_swarm(count, &mut self.host, &mut self.sink);
        }
        if self.input.key_pressed(KeyCode::F) {
            let count = self.scene.config().field.clone().unwrap_or_default().count;
            self.scene.start_field(count, &mut self.host, &mut self.sink);
        }
        if self.input.key_pressed(KeyCode::Space) {
            self.scene.time_mut().toggle_pause();
            tracing::info!(paused = self.scene.time().is_paused(), "toggled pause");
        }
        self.input.begin_frame();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Self {
            gpu,
            sink,
            scene,
            host,
            ..
        } = self;

        for token in std::mem::take(&mut host.pending) {
            scene.run_frame(token, host, sink);
        }

        match gpu.render(sink, scene.viewport(), scene.config().background) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(winit::dpi::PhysicalSize {
                    width: gpu.config.width,
                    height: gpu.config.height,
                })
            }
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => tracing::warn!("render error: {e:?}"),
        }
    }
}

struct App {
    config: SceneConfig,
    running: Option<Running>,
    error: Option<RunError>,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        Self {
            config,
            running: None,
            error: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match Running::new(event_loop, &self.config) {
            Ok(running) => self.running = Some(running),
            Err(err) => {
                tracing::error!("failed to start: {err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };
        if running.window.id() != id {
            return;
        }

        running.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                running.gpu.resize(physical_size);
                running.scene.set_viewport(running.input.viewport());
            }
            WindowEvent::CursorMoved { .. } => {
                if let Some(position) = running.input.take_pointer() {
                    running.scene.pointer_moved(position);
                }
            }
            WindowEvent::KeyboardInput { .. } => {
                running.handle_keys(event_loop);
            }
            WindowEvent::RedrawRequested => {
                running.redraw(event_loop);
            }
            _ => {}
        }
    }
}
