//! # Stagecraft
//!
//! Facade over the Stagecraft workspace.
//!
//! *   [`stagecraft_core`] (re-exported at the root): actors, behaviors, keyframes,
//!     containers, scenes and the [`Director`] frame loop.
//! *   [`schema`]: the serde data model of declarative stage documents.
//! *   [`pipeline`]: turns a document into a runnable [`pipeline::Stage`].
//!
//! ```rust
//! let json = r#"{ "width": 64, "height": 64, "fps": 10,
//!     "scenes": [{ "actors": [{ "type": "actor", "width": 8, "height": 8,
//!         "behaviors": [{ "type": "alpha", "from": 0, "to": 1, "duration": 1000 }] }] }] }"#;
//! let stats = stagecraft::render_document(json, 5).unwrap();
//! assert_eq!(stats.last().unwrap().time, 500.0);
//! ```

pub use stagecraft_core::*;
pub use stagecraft_pipeline as pipeline;
pub use stagecraft_schema as schema;

use anyhow::Result;

/// Parses `json` and renders `frames` fixed-step frames to a recording surface.
pub fn render_document(json: &str, frames: u32) -> Result<Vec<FrameStats>> {
    let mut stage = pipeline::parse_document(json)?;
    let mut surface = RecordingSurface::new();
    let mut stats = Vec::with_capacity(frames as usize);
    for _ in 0..frames {
        surface.clear_commands();
        stats.push(stage.step(&mut surface)?);
    }
    Ok(stats)
}
