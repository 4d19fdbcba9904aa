use crate::types::ActorId;
use thiserror::Error;

/// Topology and invariant violations in the actor tree.
///
/// These indicate a programming error in the host application and are
/// never swallowed by the frame loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("actor {child} already has a parent ({parent})")]
    AlreadyParented { child: ActorId, parent: ActorId },
    #[error("actor {0} is not a container")]
    NotAContainer(ActorId),
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),
    #[error("adding actor {child} under {parent} would create a cycle")]
    CycleDetected { parent: ActorId, child: ActorId },
    #[error("actor {0} is not a child of container {1}")]
    NotAChild(ActorId, ActorId),
    #[error("actor {0} is not a scene")]
    NotAScene(ActorId),
    #[error("scene index {0} out of range")]
    UnknownScene(usize),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Malformed configuration handed to the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown anchor: {0}")]
    UnknownAnchor(String),
    #[error("anchor {anchor} is not supported by {operation}")]
    UnsupportedAnchor {
        anchor: String,
        operation: &'static str,
    },
    #[error("unknown interpolator: {0}")]
    UnknownInterpolator(String),
    #[error("invalid duration: {0}")]
    InvalidDuration(f64),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),
    #[error("Failed to create surface")]
    SurfaceFailure,
    #[error("Raster error: {0}")]
    Raster(String),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
    #[error("Recursion depth limit exceeded")]
    RecursionLimit,
}
