//! # Renderer System
//!
//! Paint traversal over the actor arena.
//!
//! ## Responsibilities
//! - **Surface contract**: [`RenderSurface`] is the minimal backend API
//!   (save/restore, transform, alpha, rectangle fill, image blit, clipping).
//! - **Scene Traversal**: `paint_node` accumulates world transforms on a
//!   [`MatrixStack`] and paints each container's `active_children` in z-order,
//!   restoring surface state around every child.
//! - **Recording**: [`RecordingSurface`] captures the command stream for
//!   tests and debugging.
//!
//! ## See Also
//! - `systems::raster` for the software rasterizer backend.

use crate::errors::RenderError;
use crate::graph::SceneGraph;
use crate::matrix::{Matrix, MatrixStack};
use crate::types::{ActorId, Color, Rect};
use std::collections::HashSet;
use tracing::instrument;

const MAX_PAINT_DEPTH: usize = 100;

/// Drawing backend consumed by the paint pass.
pub trait RenderSurface {
    fn save(&mut self);
    fn restore(&mut self);
    /// Replaces the current transform.
    fn set_transform(&mut self, matrix: &Matrix);
    fn set_global_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Blits `src` from a named image into `dst`, in current-transform coordinates.
    fn draw_image(&mut self, image: &str, src: Rect, dst: Rect) -> Result<(), RenderError>;
    fn clear(&mut self, _color: Color) {}
    /// Replaces the pixels of a device-space rectangle, ignoring transform and alpha.
    fn clear_rect(&mut self, rect: Rect, color: Color) {
        self.fill_rect(rect, color);
    }
    /// Restricts all later drawing to the union of device-space `rects`.
    ///
    /// The clip is not part of the save/restore state; it holds until
    /// [`RenderSurface::reset_clip`].
    fn clip_rects(&mut self, rects: &[Rect]);
    fn reset_clip(&mut self);
}

/// Paints `id` and its active subtree.
///
/// When `dirty` is given, actors whose screen box touches none of the
/// rectangles skip their own paint; their children are still visited.
pub fn paint_node(
    graph: &SceneGraph,
    id: ActorId,
    surface: &mut dyn RenderSurface,
    stack: &mut MatrixStack,
    time: f64,
    dirty: Option<&[Rect]>,
    depth: usize,
) -> Result<(), RenderError> {
    if depth > MAX_PAINT_DEPTH {
        return Err(RenderError::RecursionLimit);
    }
    let Some(node) = graph.get_node(id) else {
        return Ok(());
    };
    let actor = &node.actor;
    if !actor.visible || !actor.is_in_frame() {
        return Ok(());
    }

    stack.save();
    stack.push_matrix(*actor.model_view());
    let world = stack.get_matrix();

    surface.save();
    surface.set_transform(&world);
    surface.set_global_alpha(actor.frame_alpha());

    let touches_dirty = dirty.map_or(true, |rects| {
        let aabb = actor.aabb();
        rects.iter().any(|r| r.intersects(&aabb))
    });
    if touches_dirty {
        actor.paint(surface, &world, time);
    }

    let mut last_error = Ok(());
    if let Some(container) = &node.container {
        for &child in container.active_children() {
            surface.save();
            if let Err(e) = paint_node(graph, child, surface, stack, time, dirty, depth + 1) {
                last_error = Err(e);
            }
            surface.restore();
        }
        if let Some(post) = &actor.post_paint {
            surface.set_transform(&world);
            surface.set_global_alpha(actor.frame_alpha());
            post(actor, surface, time);
        }
    }

    surface.restore();
    stack.restore();
    last_error
}

/// Paints a root node (typically a scene) from an identity transform.
#[instrument(level = "trace", skip(graph, surface, dirty))]
pub fn paint_root(
    graph: &SceneGraph,
    root: ActorId,
    surface: &mut dyn RenderSurface,
    time: f64,
    dirty: Option<&[Rect]>,
) -> Result<(), RenderError> {
    let mut stack = MatrixStack::new();
    paint_node(graph, root, surface, &mut stack, time, dirty, 0)
}

/// A single recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    SetTransform(Matrix),
    SetGlobalAlpha(f32),
    FillRect { rect: Rect, color: Color },
    DrawImage { image: String, src: Rect, dst: Rect },
    Clear(Color),
    ClearRect { rect: Rect, color: Color },
    Clip(Vec<Rect>),
    ResetClip,
}

/// Surface that records every call instead of drawing.
///
/// With a known-image set, unknown images fail like a real backend would.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    known_images: Option<HashSet<String>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_images<I, S>(images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: Vec::new(),
            known_images: Some(images.into_iter().map(Into::into).collect()),
        }
    }

    /// Fill colors in paint order.
    pub fn fills(&self) -> Vec<Color> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawImage { image, .. } => Some(image.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True when every save has a matching restore.
    pub fn is_balanced(&self) -> bool {
        let mut depth: i64 = 0;
        for c in &self.commands {
            match c {
                DrawCommand::Save => depth += 1,
                DrawCommand::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn set_transform(&mut self, matrix: &Matrix) {
        self.commands.push(DrawCommand::SetTransform(*matrix));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::SetGlobalAlpha(alpha));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_image(&mut self, image: &str, src: Rect, dst: Rect) -> Result<(), RenderError> {
        if let Some(known) = &self.known_images {
            if !known.contains(image) {
                return Err(RenderError::AssetNotFound(image.to_string()));
            }
        }
        self.commands.push(DrawCommand::DrawImage {
            image: image.to_string(),
            src,
            dst,
        });
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn clear_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::ClearRect { rect, color });
    }

    fn clip_rects(&mut self, rects: &[Rect]) {
        self.commands.push(DrawCommand::Clip(rects.to_vec()));
    }

    fn reset_clip(&mut self) {
        self.commands.push(DrawCommand::ResetClip);
    }
}
