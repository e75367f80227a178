//! Pointer, viewport and keyboard input.
//!
//! [`PointerState`] and [`Viewport`] are plain values that every host can
//! feed. With the `window` feature, [`Input`] folds raw winit events into
//! them, tracking both instantaneous key events (pressed this frame) and
//! continuous state (held down).
//!
//! Positions are logical pixels with the origin at the top-left corner and y
//! pointing down, the same space the page layout uses.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size of the visible area in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether `point` lies inside `[0, width] x [0, height]`.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Last known pointer position.
///
/// Single writer (the input source), single reader (the swarm update). The
/// reader takes a [`snapshot`](Self::snapshot) once per frame, so pointer
/// events arriving mid-frame only show up on the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    position: Vec2,
    moved: bool,
}

impl PointerState {
    /// Pointer parked at the viewport centre until the first move.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            position: viewport.center(),
            moved: false,
        }
    }

    /// Record a pointer move. Last write wins.
    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
        self.moved = true;
    }

    /// Keep an untouched pointer at the centre of a resized viewport.
    pub fn recenter(&mut self, viewport: Viewport) {
        if !self.moved {
            self.position = viewport.center();
        }
    }

    /// Value copy of the current position.
    #[inline]
    pub fn snapshot(&self) -> Vec2 {
        self.position
    }

    /// Whether the pointer has ever moved.
    #[inline]
    pub fn has_moved(&self) -> bool {
        self.moved
    }
}

#[cfg(feature = "window")]
pub use self::window_input::{Input, KeyCode};

#[cfg(feature = "window")]
mod window_input {
    use super::Viewport;
    use glam::Vec2;
    use std::collections::HashSet;
    use winit::event::{ElementState, WindowEvent};
    use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

    /// Keys the scene reacts to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum KeyCode {
        /// Re-create the swarm.
        R,
        /// Re-create the field.
        F,
        /// Pause/resume time.
        Space,
        /// Quit.
        Escape,
        /// Any other key (raw winit code).
        Other(u32),
    }

    impl From<WinitKeyCode> for KeyCode {
        fn from(key: WinitKeyCode) -> Self {
            match key {
                WinitKeyCode::KeyR => KeyCode::R,
                WinitKeyCode::KeyF => KeyCode::F,
                WinitKeyCode::Space => KeyCode::Space,
                WinitKeyCode::Escape => KeyCode::Escape,
                _ => KeyCode::Other(key as u32),
            }
        }
    }

    /// Input state folded from winit window events.
    #[derive(Debug)]
    pub struct Input {
        keys_held: HashSet<KeyCode>,
        keys_pressed: HashSet<KeyCode>,
        /// Latest pointer position, logical pixels.
        pointer: Option<Vec2>,
        viewport: Viewport,
        scale_factor: f64,
    }

    impl Input {
        pub fn new(viewport: Viewport, scale_factor: f64) -> Self {
            Self {
                keys_held: HashSet::new(),
                keys_pressed: HashSet::new(),
                pointer: None,
                viewport,
                scale_factor,
            }
        }

        /// Check if a key was pressed this frame (just went down).
        pub fn key_pressed(&self, key: KeyCode) -> bool {
            self.keys_pressed.contains(&key)
        }

        /// Pointer position received since the last [`take_pointer`](Self::take_pointer).
        pub fn take_pointer(&mut self) -> Option<Vec2> {
            self.pointer.take()
        }

        pub fn viewport(&self) -> Viewport {
            self.viewport
        }

        /// Called at the start of each frame to clear per-frame state.
        pub fn begin_frame(&mut self) {
            self.keys_pressed.clear();
        }

        /// Process a winit window event.
        pub fn handle_event(&mut self, event: &WindowEvent) {
            match event {
                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(keycode) = event.physical_key {
                        let key = KeyCode::from(keycode);
                        match event.state {
                            ElementState::Pressed => {
                                // No auto-repeat
                                if !self.keys_held.contains(&key) {
                                    self.keys_pressed.insert(key);
                                }
                                self.keys_held.insert(key);
                            }
                            ElementState::Released => {
                                self.keys_held.remove(&key);
                            }
                        }
                    }
                }

                WindowEvent::CursorMoved { position, .. } => {
                    let logical = position.to_logical::<f32>(self.scale_factor);
                    self.pointer = Some(Vec2::new(logical.x, logical.y));
                }

                WindowEvent::Resized(size) => {
                    let logical = size.to_logical::<f32>(self.scale_factor);
                    self.viewport = Viewport::new(logical.width, logical.height);
                }

                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    self.scale_factor = *scale_factor;
                }

                _ => {}
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_key_state() {
            let mut input = Input::new(Viewport::default(), 1.0);

            assert!(!input.key_pressed(KeyCode::R));

            // Simulate key press via direct state manipulation (normally done via handle_event)
            input.keys_pressed.insert(KeyCode::R);
            input.keys_held.insert(KeyCode::R);
            assert!(input.key_pressed(KeyCode::R));

            input.begin_frame();
            assert!(input.keys_held.contains(&KeyCode::R));
            assert!(!input.key_pressed(KeyCode::R));
        }

        #[test]
        fn test_key_mapping() {
            assert_eq!(KeyCode::from(WinitKeyCode::KeyR), KeyCode::R);
            assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
            assert!(matches!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::Other(_)));
        }

        #[test]
        fn test_take_pointer_clears() {
            let mut input = Input::new(Viewport::default(), 2.0);
            input.pointer = Some(Vec2::new(10.0, 20.0));
            assert_eq!(input.take_pointer(), Some(Vec2::new(10.0, 20.0)));
            assert_eq!(input.take_pointer(), None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_starts_at_center() {
        let pointer = PointerState::new(Viewport::new(1000.0, 600.0));
        assert_eq!(pointer.snapshot(), Vec2::new(500.0, 300.0));
        assert!(!pointer.has_moved());
    }

    #[test]
    fn recenter_only_before_first_move() {
        let mut pointer = PointerState::new(Viewport::new(1000.0, 600.0));
        pointer.recenter(Viewport::new(200.0, 100.0));
        assert_eq!(pointer.snapshot(), Vec2::new(100.0, 50.0));

        pointer.move_to(Vec2::new(7.0, 9.0));
        pointer.recenter(Viewport::new(1000.0, 600.0));
        assert_eq!(pointer.snapshot(), Vec2::new(7.0, 9.0));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut pointer = PointerState::new(Viewport::new(100.0, 100.0));
        let before = pointer.snapshot();
        pointer.move_to(Vec2::new(1.0, 1.0));
        assert_eq!(before, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn viewport_contains() {
        let vp = Viewport::new(100.0, 50.0);
        assert!(vp.contains(Vec2::new(0.0, 0.0)));
        assert!(vp.contains(Vec2::new(100.0, 50.0)));
        assert!(!vp.contains(Vec2::new(-1.0, 10.0)));
    }
}
