//! # Actor Containers
//!
//! Child management, per-frame animation and hit-testing for container nodes.
//!
//! ## Responsibilities
//! - **Topology**: immediate and delayed attachment with a single-parent
//!   invariant, removal, z-order moves and depth-first destruction.
//! - **Animate pass**: splices pending children, animates children in z-order,
//!   rebuilds `active_children` and prunes expired discardable children.
//! - **Sizing**: delegates to an attached [`LayoutManager`], or grows to fit
//!   its children under [`AddHint::Conform`].
//! - **Hit-testing**: topmost child first, then the container itself.

use crate::errors::SceneError;
use crate::graph::SceneGraph;
use crate::matrix::Matrix;
use crate::systems::dirty::DirtyRegions;
use crate::systems::layout::LayoutManager;
use crate::types::{ActorId, Point};
use serde::{Deserialize, Serialize};
use taffy::Style;
use tracing::debug;

/// Resize policy applied when children are attached.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddHint {
    #[default]
    None,
    /// Grow to the bounding box of the children.
    Conform,
}

#[derive(Debug, Default)]
pub struct ContainerState {
    pub(crate) children: Vec<ActorId>,
    pub(crate) active_children: Vec<ActorId>,
    pub(crate) pending: Vec<ActorId>,
    pub add_hint: AddHint,
    pub(crate) layout: Option<Box<dyn LayoutManager>>,
    /// Pre-rendered content; children are not re-animated.
    pub deep_cache: bool,
    pub(crate) size_total: usize,
    pub(crate) size_active: usize,
}

impl ContainerState {
    pub fn children(&self) -> &[ActorId] {
        &self.children
    }

    pub fn active_children(&self) -> &[ActorId] {
        &self.active_children
    }

    pub fn pending_children(&self) -> &[ActorId] {
        &self.pending
    }

    pub fn size_total(&self) -> usize {
        self.size_total
    }

    pub fn size_active(&self) -> usize {
        self.size_active
    }

    pub fn has_layout(&self) -> bool {
        self.layout.is_some()
    }

    fn detach(&mut self, child: ActorId) -> bool {
        let before = self.children.len() + self.pending.len();
        self.children.retain(|&c| c != child);
        self.pending.retain(|&c| c != child);
        self.active_children.retain(|&c| c != child);
        before != self.children.len() + self.pending.len()
    }
}

impl SceneGraph {
    /// Validates that `child` may be attached under `parent`.
    fn check_attach(&self, parent: ActorId, child: ActorId) -> Result<(), SceneError> {
        let parent_node = self.node(parent)?;
        if !parent_node.is_container() {
            return Err(SceneError::NotAContainer(parent));
        }
        let child_node = self.node(child)?;
        if let Some(existing) = child_node.parent {
            return Err(SceneError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::CycleDetected { parent, child });
        }
        Ok(())
    }

    /// Attaches `child` at the end of `parent`'s children, effective immediately.
    pub fn add_child(&mut self, parent: ActorId, child: ActorId) -> Result<(), SceneError> {
        self.add_child_at(parent, child, usize::MAX)
    }

    /// Attaches `child` at `index` (clamped to the list length), effective immediately.
    pub fn add_child_at(&mut self, parent: ActorId, child: ActorId, index: usize) -> Result<(), SceneError> {
        self.attach(parent, child, index, None)
    }

    /// Attaches `child` and registers it with the parent's layout manager under `style`.
    pub fn add_child_with_style(&mut self, parent: ActorId, child: ActorId, style: Style) -> Result<(), SceneError> {
        self.attach(parent, child, usize::MAX, Some(style))
    }

    fn attach(&mut self, parent: ActorId, child: ActorId, index: usize, style: Option<Style>) -> Result<(), SceneError> {
        self.check_attach(parent, child)?;
        self.node_mut(child)?.parent = Some(parent);
        let container = self.container_mut(parent).ok_or(SceneError::NotAContainer(parent))?;
        let index = index.min(container.children.len());
        container.children.insert(index, child);
        self.after_children_changed(parent, Some((child, style)));
        Ok(())
    }

    /// Queues `child` to join `parent` at the start of the parent's next animate pass.
    ///
    /// The parent link is reserved immediately, so the child cannot be
    /// attached elsewhere in the meantime.
    pub fn add_child_delayed(&mut self, parent: ActorId, child: ActorId) -> Result<(), SceneError> {
        self.check_attach(parent, child)?;
        self.node_mut(child)?.parent = Some(parent);
        let container = self.container_mut(parent).ok_or(SceneError::NotAContainer(parent))?;
        container.pending.push(child);
        Ok(())
    }

    fn after_children_changed(&mut self, parent: ActorId, added: Option<(ActorId, Option<Style>)>) {
        let Some(container) = self.container_mut(parent) else {
            return;
        };
        if let Some(layout) = container.layout.as_mut() {
            if let Some((child, style)) = added {
                layout.add_child(child, style);
            }
            layout.invalidate_layout();
        } else if container.add_hint == AddHint::Conform {
            self.recalc_size(parent);
        }
    }

    /// Detaches `child` from `parent` without destroying it.
    pub fn remove_child(&mut self, parent: ActorId, child: ActorId) -> Result<(), SceneError> {
        let container = self.container_mut(parent).ok_or(SceneError::NotAContainer(parent))?;
        if !container.detach(child) {
            return Err(SceneError::NotAChild(child, parent));
        }
        if let Some(layout) = container.layout.as_mut() {
            layout.remove_child(child);
        }
        if let Some(node) = self.get_node_mut(child) {
            node.parent = None;
        }
        self.after_children_changed(parent, None);
        Ok(())
    }

    pub fn remove_child_at(&mut self, parent: ActorId, index: usize) -> Option<ActorId> {
        let child = *self.children(parent).get(index)?;
        self.remove_child(parent, child).ok()?;
        Some(child)
    }

    pub fn remove_first_child(&mut self, parent: ActorId) -> Option<ActorId> {
        self.remove_child_at(parent, 0)
    }

    pub fn remove_last_child(&mut self, parent: ActorId) -> Option<ActorId> {
        let last = self.children(parent).len().checked_sub(1)?;
        self.remove_child_at(parent, last)
    }

    /// Detaches every child, including pending ones.
    pub fn empty_children(&mut self, parent: ActorId) {
        let Some(container) = self.container_mut(parent) else {
            return;
        };
        let mut detached = std::mem::take(&mut container.children);
        detached.append(&mut container.pending);
        container.active_children.clear();
        for child in detached {
            if let Some(layout) = self.container_mut(parent).and_then(|c| c.layout.as_mut()) {
                layout.remove_child(child);
            }
            if let Some(node) = self.get_node_mut(child) {
                node.parent = None;
            }
        }
        self.after_children_changed(parent, None);
    }

    /// Destroys a node and its subtree, leaves first, then frees the slots.
    pub fn destroy(&mut self, id: ActorId) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        let parent = node.parent;
        let children: Vec<ActorId> = node
            .container
            .as_ref()
            .map(|c| c.children.iter().chain(c.pending.iter()).copied().collect())
            .unwrap_or_default();

        for child in children.into_iter().rev() {
            self.destroy(child);
        }
        if let Some(parent) = parent {
            if let Some(container) = self.container_mut(parent) {
                container.detach(id);
                if let Some(layout) = container.layout.as_mut() {
                    layout.remove_child(id);
                    layout.invalidate_layout();
                }
            }
        }
        self.free_node(id);
        debug!(actor = id, "actor destroyed");
    }

    /// Moves `child` to `index` in its parent's z-order.
    ///
    /// Negative indices clamp to 0; indices past the end append.
    pub fn set_z_order(&mut self, parent: ActorId, child: ActorId, index: isize) -> Result<(), SceneError> {
        let container = self.container_mut(parent).ok_or(SceneError::NotAContainer(parent))?;
        let from = container
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(SceneError::NotAChild(child, parent))?;
        container.children.remove(from);
        let to = (index.max(0) as usize).min(container.children.len());
        container.children.insert(to, child);
        if let Some(layout) = container.layout.as_mut() {
            layout.invalidate_layout();
        }
        Ok(())
    }

    pub fn get_child_at(&self, parent: ActorId, index: usize) -> Option<ActorId> {
        self.children(parent).get(index).copied()
    }

    pub fn find_child(&self, parent: ActorId, child: ActorId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    pub fn num_children(&self, parent: ActorId) -> usize {
        self.children(parent).len()
    }

    /// Finds a descendant by name, depth-first.
    pub fn find_by_name(&self, root: ActorId, name: &str) -> Option<ActorId> {
        if self.actor(root)?.name.as_deref() == Some(name) {
            return Some(root);
        }
        self.children(root)
            .iter()
            .find_map(|&child| self.find_by_name(child, name))
    }

    /// Resizes the container to the union of its children's untransformed
    /// rectangles, measured from its local origin.
    ///
    /// Child rotation and scale are not taken into account.
    pub fn recalc_size(&mut self, parent: ActorId) {
        let (mut width, mut height) = (0.0_f32, 0.0_f32);
        for &child in self.children(parent) {
            if let Some(a) = self.actor(child) {
                width = width.max(a.x + a.width);
                height = height.max(a.y + a.height);
            }
        }
        if let Some(actor) = self.actor_mut(parent) {
            actor.set_size(width.max(0.0), height.max(0.0));
        }
    }

    pub fn set_layout(&mut self, parent: ActorId, layout: Box<dyn LayoutManager>) -> Result<(), SceneError> {
        let container = self.container_mut(parent).ok_or(SceneError::NotAContainer(parent))?;
        container.layout = Some(layout);
        Ok(())
    }

    pub fn invalidate_layout(&mut self, parent: ActorId) {
        if let Some(layout) = self.container_mut(parent).and_then(|c| c.layout.as_mut()) {
            layout.invalidate_layout();
        }
    }

    /// Runs the layout manager if it reports an invalid layout.
    pub(crate) fn validate_layout(&mut self, parent: ActorId) {
        let Some(mut layout) = self.container_mut(parent).and_then(|c| c.layout.take()) else {
            return;
        };
        if layout.is_invalidated() {
            layout.do_layout(self, parent);
        }
        if let Some(container) = self.container_mut(parent) {
            container.layout = Some(layout);
        }
    }

    /// Topmost actor under a screen point, searching `id` and its subtree.
    ///
    /// A mouse-disabled container hides its whole subtree.
    pub fn find_actor_at_position(&self, id: ActorId, screen: Point) -> Option<ActorId> {
        let node = self.get_node(id)?;
        let actor = &node.actor;
        if !actor.visible || !actor.is_in_frame() || !actor.mouse_enabled {
            return None;
        }
        if let Some(container) = &node.container {
            for &child in container.active_children.iter().rev() {
                if let Some(hit) = self.find_actor_at_position(child, screen) {
                    return Some(hit);
                }
            }
        }
        let local = actor.screen_to_local(screen)?;
        actor.contains(local.x, local.y).then_some(id)
    }

    pub(crate) fn animate_container(
        &mut self,
        id: ActorId,
        time: f64,
        parent_world: &Matrix,
        parent_alpha: f32,
        dirty: &mut DirtyRegions,
    ) -> bool {
        let Some(node) = self.get_node_mut(id) else {
            return false;
        };
        let Some(container) = node.container.as_mut() else {
            return false;
        };
        container.active_children.clear();
        if !node.actor.animate(time, parent_world, parent_alpha, dirty) {
            return false;
        }
        if container.deep_cache {
            return false;
        }
        let world = *node.actor.world_model_view();
        let alpha = node.actor.children_alpha(parent_alpha);

        self.validate_layout(id);

        let Some(container) = self.container_mut(id) else {
            return false;
        };
        let pending = std::mem::take(&mut container.pending);
        let spliced = !pending.is_empty();
        container.children.extend(pending);
        let children = container.children.clone();
        if spliced {
            self.after_children_changed(id, None);
        }

        let mut active = Vec::with_capacity(children.len());
        let (mut size_total, mut size_active) = (1, 1);
        let mut doomed = Vec::new();
        for child in children {
            let alive = self.animate_node(child, time, &world, alpha, dirty);
            let (total, active_size) = self.sizes(child);
            size_total += total;
            if alive {
                active.push(child);
                size_active += active_size;
            } else if self
                .actor(child)
                .is_some_and(|a| a.is_expired() && a.discardable)
            {
                doomed.push(child);
            }
        }

        if let Some(container) = self.container_mut(id) {
            container.active_children = active;
            container.size_total = size_total;
            container.size_active = size_active;
        }

        for child in doomed {
            let aabb = self.actor(child).map(|a| a.aabb());
            debug!(actor = child, "discardable actor pruned");
            self.destroy(child);
            if let Some(aabb) = aabb {
                dirty.add(aabb);
            }
        }
        true
    }
}
