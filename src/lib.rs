//! # swarmfield
//!
//! A small 2D ambient particle engine: a swarm of dots that trails the
//! pointer, drawn over a field of large translucent shapes drifting around
//! the viewport.
//!
//! The update rules are plain CPU code over `glam` vectors. Everything that
//! shows pixels sits behind the [`RenderSink`] trait, so the same engines
//! drive a native `wgpu` window, a browser DOM, a PNG renderer, or a test.
//!
//! ## Quick Start
//!
//! ```no_run
//! use swarmfield::prelude::*;
//!
//! let config = SceneConfig { seed: Some(7), ..SceneConfig::default() };
//! let mut scene = Scene::new(config, Viewport::new(1280.0, 720.0))?;
//! let mut host = ManualHost::new();
//! let mut sink = HeadlessSink::new();
//!
//! scene.start(&mut host, &mut sink);
//! for _ in 0..60 {
//!     scene.pointer_moved(Vec2::new(300.0, 200.0));
//!     for token in host.drain() {
//!         scene.run_frame(token, &mut host, &mut sink);
//!     }
//! }
//! # Ok::<(), swarmfield::ConfigError>(())
//! ```
//!
//! ## Core Concepts
//!
//! ### Swarm
//!
//! Each [`Follower`] has a fixed offset from the pointer, its own follow rate
//! and a float phase. Every frame it moves a fraction of the way toward
//! `pointer + offset + float(t)`, so the group lags and spreads behind the
//! cursor.
//!
//! ### Field
//!
//! Each [`Drifter`] moves and spins at a constant rate and bounces off the
//! viewport edges, allowed to leave the screen by up to its own size first.
//!
//! ### Frame loops
//!
//! The swarm and the field run separate loops. A loop asks its host for the
//! next repaint and re-arms itself when that frame fires. Restarting or
//! stopping a loop invalidates frames it had already requested; see
//! [`scheduler`].
//!
//! | Sink | Output |
//! |------|--------|
//! | [`HeadlessSink`] | recorded poses, for tests |
//! | [`NullSink`] | nothing |
//! | [`RasterSink`] | `image::RgbaImage` / PNG |
//! | `GpuSink` | instanced quads through `wgpu` (feature `window`) |

pub mod config;
pub mod error;
pub mod field;
#[cfg(feature = "window")]
pub mod gpu;
pub mod headless;
pub mod input;
pub mod raster;
pub mod scene;
pub mod scheduler;
pub mod sink;
pub mod spawn;
pub mod swarm;
pub mod time;
pub mod visuals;
#[cfg(feature = "window")]
pub mod window;

pub use config::{SceneConfig, WindowConfig};
pub use error::{ConfigError, RenderError};
#[cfg(feature = "window")]
pub use error::{GpuError, RunError};
pub use field::{drift_step, Drifter, FieldConfig, FieldEngine};
pub use glam::Vec2;
pub use input::{PointerState, Viewport};
pub use raster::RasterSink;
pub use scene::Scene;
pub use scheduler::{FrameScheduler, FrameToken, ManualHost, RepaintHost, Subsystem};
pub use sink::{ElementId, ElementStyle, HeadlessSink, NullSink, Pose, RenderSink};
pub use spawn::SpawnContext;
pub use swarm::{float_offset, follow_step, Follower, SwarmConfig, SwarmEngine};
pub use time::Time;
pub use visuals::{Color, Layer, Palette, ShapeKind};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use swarmfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SceneConfig;
    pub use crate::field::{FieldConfig, FieldEngine};
    pub use crate::input::Viewport;
    pub use crate::scene::Scene;
    pub use crate::scheduler::{ManualHost, RepaintHost};
    pub use crate::sink::{HeadlessSink, Pose, RenderSink};
    pub use crate::spawn::SpawnContext;
    pub use crate::swarm::{SwarmConfig, SwarmEngine};
    pub use crate::time::Time;
    pub use crate::visuals::{Color, Layer, Palette, ShapeKind};
    pub use crate::Vec2;
}
