//! # Layout System
//!
//! Pluggable child positioning for containers.
//!
//! ## Responsibilities
//! - **Contract**: [`LayoutManager`] is consulted by a container whenever
//!   children are attached, detached or reordered, and validated at the
//!   start of the container's animate pass.
//! - **Flexbox**: [`FlexLayout`] runs Taffy over the container's direct
//!   children and writes the computed positions back to the actors.

use crate::graph::SceneGraph;
use crate::types::ActorId;
use std::collections::HashMap;
use std::fmt;
use taffy::prelude::*;
use tracing::{instrument, warn};

/// Delegated sizing and positioning for a container's children.
pub trait LayoutManager: fmt::Debug {
    fn is_invalidated(&self) -> bool;

    fn invalidate_layout(&mut self);

    /// Positions the children of `container`.
    fn do_layout(&mut self, graph: &mut SceneGraph, container: ActorId);

    /// Registers a child with an optional per-child constraint.
    fn add_child(&mut self, child: ActorId, constraint: Option<Style>);

    fn remove_child(&mut self, _child: ActorId) {}
}

/// Flexbox layout of a container's direct children via Taffy.
///
/// Children without an explicit style are laid out at their current size.
#[derive(Debug, Clone)]
pub struct FlexLayout {
    pub style: Style,
    child_styles: HashMap<ActorId, Style>,
    invalid: bool,
}

impl Default for FlexLayout {
    fn default() -> Self {
        Self::new(FlexDirection::Row)
    }
}

impl FlexLayout {
    pub fn new(direction: FlexDirection) -> Self {
        Self {
            style: Style {
                display: Display::Flex,
                flex_direction: direction,
                ..Default::default()
            },
            child_styles: HashMap::new(),
            invalid: true,
        }
    }

    pub fn row() -> Self {
        Self::new(FlexDirection::Row)
    }

    pub fn column() -> Self {
        Self::new(FlexDirection::Column)
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.style.gap = Size {
            width: length(gap),
            height: length(gap),
        };
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.style.padding = taffy::Rect {
            left: length(padding),
            right: length(padding),
            top: length(padding),
            bottom: length(padding),
        };
        self
    }

    pub fn with_justify(mut self, justify: JustifyContent) -> Self {
        self.style.justify_content = Some(justify);
        self
    }

    pub fn with_align(mut self, align: AlignItems) -> Self {
        self.style.align_items = Some(align);
        self
    }
}

impl LayoutManager for FlexLayout {
    fn is_invalidated(&self) -> bool {
        self.invalid
    }

    fn invalidate_layout(&mut self) {
        self.invalid = true;
    }

    #[instrument(level = "debug", skip(self, graph))]
    fn do_layout(&mut self, graph: &mut SceneGraph, container: ActorId) {
        let Some(parent) = graph.actor(container) else {
            return;
        };
        let root_style = Style {
            size: Size {
                width: length(parent.width),
                height: length(parent.height),
            },
            ..self.style.clone()
        };

        let mut taffy: TaffyTree<()> = TaffyTree::new();
        let mut leaves = Vec::new();
        for &child in graph.children(container) {
            let Some(actor) = graph.actor(child) else {
                continue;
            };
            let explicit = self.child_styles.get(&child).cloned();
            let sized = explicit.is_some();
            let style = explicit.unwrap_or_else(|| Style {
                size: Size {
                    width: length(actor.width),
                    height: length(actor.height),
                },
                flex_shrink: 0.0,
                ..Default::default()
            });
            match taffy.new_leaf(style) {
                Ok(node) => leaves.push((child, node, sized)),
                Err(e) => warn!(actor = child, error = %e, "layout leaf skipped"),
            }
        }

        let nodes: Vec<taffy::NodeId> = leaves.iter().map(|(_, n, _)| *n).collect();
        let root = match taffy.new_with_children(root_style, &nodes) {
            Ok(root) => root,
            Err(e) => {
                warn!(container, error = %e, "layout root failed");
                return;
            }
        };
        if let Err(e) = taffy.compute_layout(root, Size::MAX_CONTENT) {
            warn!(container, error = %e, "layout computation failed");
            return;
        }

        for (child, node, sized) in leaves {
            let Ok(layout) = taffy.layout(node) else {
                continue;
            };
            if let Some(actor) = graph.actor_mut(child) {
                actor.set_location(layout.location.x, layout.location.y);
                if sized {
                    actor.set_size(layout.size.width, layout.size.height);
                }
            }
        }
        self.invalid = false;
    }

    fn add_child(&mut self, child: ActorId, constraint: Option<Style>) {
        if let Some(style) = constraint {
            self.child_styles.insert(child, style);
        }
        self.invalid = true;
    }

    fn remove_child(&mut self, child: ActorId) {
        self.child_styles.remove(&child);
        self.invalid = true;
    }
}
