//! # Stagecraft
//!
//! `stagecraft-core` is a retained-mode 2D scene-graph animation engine driven by a virtual clock.
//!
//! Actors live in an arena ([`SceneGraph`]) and are arranged into containers and scenes.
//! Each frame the [`Director`] advances its clock by a caller-supplied delta, applies the
//! time-bounded [`Behavior`]s and keyframes attached to every actor, rebuilds the affine
//! transforms, and paints the visible scenes through a [`RenderSurface`].
//!
//! ## Core Features
//!
//! *   **Virtual Time**: Frames are driven by explicit deltas, so pausing and time-scaling are free.
//! *   **Behaviors**: Alpha, rotate, scale, path, color, generic and nested container behaviors
//!     with cycling, delays, easing curves and typed lifecycle events.
//! *   **Keyframes**: Named per-property keyframe sets held in an explicit registry.
//! *   **Scene Graph**: Containers with z-order, delayed attachment, discardable pruning and
//!     an optional flexbox layout manager ([Taffy](https://crates.io/crates/taffy)).
//! *   **Scenes**: Independent clocks, timers and animated scene-to-scene transitions.
//! *   **Rendering**: A recording surface for tests and a software rasterizer
//!     ([tiny-skia](https://crates.io/crates/tiny-skia)) with PNG output.
//!
//! ## Usage
//!
//! ```rust
//! use stagecraft_core::{Actor, Behavior, Director, DirectorConfig, RecordingSurface};
//!
//! let mut director = Director::new(DirectorConfig::new(320, 240));
//! let scene = director.create_scene();
//! let actor = director.graph.add_actor(Actor::new().with_bounds(10.0, 10.0, 50.0, 50.0));
//! director.graph.add_child(scene, actor).unwrap();
//! director
//!     .graph
//!     .add_behavior(actor, Behavior::alpha(0.0, 1.0).with_frame_time(0.0, 1000.0));
//!
//! let mut surface = RecordingSurface::new();
//! director.render(500.0, &mut surface).unwrap();
//! assert_eq!(director.graph.actor(actor).unwrap().alpha, 0.5);
//! ```

/// Shared value types: colors, rectangles, animatable properties.
pub mod types;

pub mod errors;

/// Easing curves and the `Interpolator` modifiers.
pub mod interpolator;

/// 2D affine and 3D matrices, plus the transform stack.
pub mod matrix;

/// Arc-length parameterized motion paths.
pub mod path;

/// Time-bounded animations and their containers.
pub mod behavior;

/// Per-property keyframe tracks and the named registry.
pub mod keyframes;

/// The actor: geometry, frame window, behaviors and leaf paint.
pub mod actor;

/// The actor arena.
pub mod graph;

/// Child lists, pending attachment, z-order and hit-testing.
pub mod container;

/// Scene clocks, timers and ease transitions.
pub mod scene;

/// Timers checked against a scene clock.
pub mod timer;

pub mod input;

/// Director settings.
pub mod config;

/// The frame driver that ties scenes, time and painting together.
pub mod director;

/// Rendering, layout, dirty tracking and transitions.
pub mod systems;

pub use actor::{Actor, ImageRegion};
pub use behavior::{Behavior, BehaviorEvent, BehaviorId, BehaviorStatus, BehaviorValue};
pub use config::DirectorConfig;
pub use container::AddHint;
pub use director::{Director, FrameStats};
pub use errors::{ConfigError, RenderError, SceneError};
pub use graph::SceneGraph;
pub use interpolator::Interpolator;
pub use keyframes::{Keyframes, KeyframesContainer, KeyframesRegistry};
pub use matrix::{Matrix, MatrixStack};
pub use systems::{RasterSurface, RecordingSurface, RenderSurface};
pub use types::{ActorId, Color, Point, Rect};

use anyhow::Result;
use tracing::instrument;

/// Abstracts where image bytes come from.
///
/// The pipeline resolves image references in scene documents through this
/// trait, so hosts can serve assets from archives or memory.
pub trait AssetLoader {
    /// Loads the raw bytes of an asset.
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>>;
}

/// Reads assets from the filesystem, falling back to `assets/`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultAssetLoader;

impl AssetLoader for DefaultAssetLoader {
    #[instrument(level = "debug", skip(self))]
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>> {
        if let Ok(bytes) = std::fs::read(path) {
            return Ok(bytes);
        }
        let alt = format!("assets/{}", path);
        std::fs::read(&alt).map_err(|e| {
            anyhow::anyhow!("asset not found: {} (checked '{}' and '{}'): {}", path, path, alt, e)
        })
    }
}
