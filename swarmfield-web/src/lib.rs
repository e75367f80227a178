//! Browser binding for swarmfield.
//!
//! Renders the scene as plain DOM elements and drives both frame loops from
//! `requestAnimationFrame`:
//!
//! ```js
//! import init, { Ambience, mount_default } from "./swarmfield_web.js";
//! await init();
//! const ambience = mount_default();          // 40 dots + 8 shapes
//! // or: new Ambience('{"seed": 7}').start();
//! ```

mod dom;

use std::cell::RefCell;
use std::rc::Rc;

use swarmfield::{FrameToken, RepaintHost, Scene, SceneConfig, Vec2, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub use dom::{style_declarations, DomSink};

struct WebState {
    scene: Scene,
    sink: DomSink,
}

/// Repaint host that schedules frames with `requestAnimationFrame`.
struct WebHost {
    state: Rc<RefCell<WebState>>,
}

impl RepaintHost for WebHost {
    fn request_repaint(&mut self, token: FrameToken) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let state = self.state.clone();
        let callback = Closure::once_into_js(move || {
            let mut host = WebHost {
                state: state.clone(),
            };
            let Ok(mut guard) = state.try_borrow_mut() else {
                return;
            };
            let WebState { scene, sink } = &mut *guard;
            if let Some(viewport) = window_viewport() {
                scene.set_viewport(viewport);
            }
            scene.run_frame(token, &mut host, sink);
        });
        if window
            .request_animation_frame(callback.unchecked_ref())
            .is_err()
        {
            tracing::warn!(?token, "requestAnimationFrame failed");
        }
    }
}

fn window_viewport() -> Option<Viewport> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Viewport::new(width as f32, height as f32))
}

/// A running swarm and field attached to the current document.
#[wasm_bindgen]
pub struct Ambience {
    state: Rc<RefCell<WebState>>,
    listener: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

#[wasm_bindgen]
impl Ambience {
    /// Build from an optional JSON scene config. Nothing moves until
    /// [`start`](Self::start).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Ambience, JsError> {
        console_error_panic_hook::set_once();

        let config = match config_json {
            Some(json) => SceneConfig::from_json(&json)?,
            None => SceneConfig::default(),
        };
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsError::new("no document"))?;
        let sink =
            DomSink::new(document.clone()).ok_or_else(|| JsError::new("no document body"))?;
        let viewport = window_viewport().unwrap_or_default();
        let scene = Scene::new(config, viewport)?;
        let state = Rc::new(RefCell::new(WebState { scene, sink }));

        let weak = Rc::downgrade(&state);
        let on_move = move |event: web_sys::MouseEvent| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if let Ok(mut state) = state.try_borrow_mut() {
                let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                state.scene.pointer_moved(pointer);
            }
        };
        let listener = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(on_move);
        document
            .add_event_listener_with_callback("mousemove", listener.as_ref().unchecked_ref())
            .map_err(|_| JsError::new("failed to listen for mousemove"))?;

        Ok(Ambience { state, listener })
    }

    /// Create every configured population and start animating.
    pub fn start(&mut self) {
        self.with_scene(|scene, host, sink| scene.start(host, sink));
    }

    /// Replace the swarm with `count` dots.
    pub fn start_swarm(&mut self, count: u32) {
        self.with_scene(|scene, host, sink| scene.start_swarm(count, host, sink));
    }

    /// Replace the field with `count` shapes.
    pub fn start_field(&mut self, count: u32) {
        self.with_scene(|scene, host, sink| scene.start_field(count, host, sink));
    }

    /// Freeze both loops in place.
    pub fn stop(&mut self) {
        self.state.borrow_mut().scene.stop();
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.state.borrow_mut().scene.pointer_moved(Vec2::new(x, y));
    }

    /// Seed the scene is using.
    pub fn seed(&self) -> u64 {
        self.state.borrow().scene.seed()
    }
}

impl Ambience {
    fn with_scene(&mut self, f: impl FnOnce(&mut Scene, &mut WebHost, &mut DomSink)) {
        let mut host = WebHost {
            state: self.state.clone(),
        };
        let mut guard = self.state.borrow_mut();
        let WebState { scene, sink } = &mut *guard;
        if let Some(viewport) = window_viewport() {
            scene.set_viewport(viewport);
        }
        f(scene, &mut host, sink);
    }
}

impl Drop for Ambience {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.scene.stop();
        }
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let _ = document.remove_event_listener_with_callback(
                "mousemove",
                self.listener.as_ref().unchecked_ref(),
            );
        }
    }
}

/// Start the default scene: 40 dots over 8 drifting shapes.
#[wasm_bindgen]
pub fn mount_default() -> Result<Ambience, JsError> {
    let mut ambience = Ambience::new(None)?;
    ambience.start();
    Ok(ambience)
}
