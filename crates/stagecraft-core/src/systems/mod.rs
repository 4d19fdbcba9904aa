pub mod dirty;
pub mod layout;
pub mod raster;
pub mod renderer;
pub mod transitions;

pub use dirty::DirtyRegions;
pub use layout::{FlexLayout, LayoutManager};
pub use raster::RasterSurface;
pub use renderer::{DrawCommand, RecordingSurface, RenderSurface};
pub use transitions::{Anchor, SceneTransition, TransitionKind, TransitionLeg};
