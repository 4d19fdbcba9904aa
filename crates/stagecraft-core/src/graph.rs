use crate::actor::Actor;
use crate::behavior::{Behavior, BehaviorId};
use crate::container::ContainerState;
use crate::errors::SceneError;
use crate::matrix::Matrix;
use crate::scene::SceneState;
use crate::systems::dirty::DirtyRegions;
use crate::types::ActorId;
use tracing::debug;

/// An actor plus its place in the tree.
///
/// Leaves have neither `container` nor `scene`. Containers carry a
/// [`ContainerState`]; scenes carry both.
#[derive(Debug)]
pub struct SceneNode {
    pub actor: Actor,
    /// Set as soon as the node is attached, including delayed attachment.
    pub parent: Option<ActorId>,
    pub container: Option<ContainerState>,
    pub scene: Option<SceneState>,
}

impl SceneNode {
    pub fn leaf(actor: Actor) -> Self {
        Self {
            actor,
            parent: None,
            container: None,
            scene: None,
        }
    }

    pub fn container(actor: Actor) -> Self {
        Self {
            container: Some(ContainerState::default()),
            ..Self::leaf(actor)
        }
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn is_scene(&self) -> bool {
        self.scene.is_some()
    }
}

/// The actor arena.
///
/// Nodes live in a flat `Vec` indexed by [`ActorId`]; parent and child links
/// are ids, and freed slots are recycled.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<SceneNode>>,
    free_indices: Vec<ActorId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: SceneNode) -> ActorId {
        if let Some(id) = self.free_indices.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        self.add_node(SceneNode::leaf(actor))
    }

    pub fn add_container(&mut self, actor: Actor) -> ActorId {
        self.add_node(SceneNode::container(actor))
    }

    /// Frees a slot without touching links. Callers detach first.
    pub(crate) fn free_node(&mut self, id: ActorId) -> Option<SceneNode> {
        let node = self.nodes.get_mut(id)?.take()?;
        self.free_indices.push(id);
        Some(node)
    }

    pub fn get_node(&self, id: ActorId) -> Option<&SceneNode> {
        self.nodes.get(id).and_then(|n| n.as_ref())
    }

    pub fn get_node_mut(&mut self, id: ActorId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id).and_then(|n| n.as_mut())
    }

    pub(crate) fn node(&self, id: ActorId) -> Result<&SceneNode, SceneError> {
        self.get_node(id).ok_or(SceneError::UnknownActor(id))
    }

    pub(crate) fn node_mut(&mut self, id: ActorId) -> Result<&mut SceneNode, SceneError> {
        self.get_node_mut(id).ok_or(SceneError::UnknownActor(id))
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.get_node(id).map(|n| &n.actor)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.get_node_mut(id).map(|n| &mut n.actor)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.get_node(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_container(&self, id: ActorId) -> bool {
        self.get_node(id).is_some_and(SceneNode::is_container)
    }

    pub fn is_scene(&self, id: ActorId) -> bool {
        self.get_node(id).is_some_and(SceneNode::is_scene)
    }

    pub fn parent(&self, id: ActorId) -> Option<ActorId> {
        self.get_node(id)?.parent
    }

    pub fn container(&self, id: ActorId) -> Option<&ContainerState> {
        self.get_node(id)?.container.as_ref()
    }

    pub fn container_mut(&mut self, id: ActorId) -> Option<&mut ContainerState> {
        self.get_node_mut(id)?.container.as_mut()
    }

    /// Children in z-order, or an empty slice for leaves.
    pub fn children(&self, id: ActorId) -> &[ActorId] {
        self.container(id).map_or(&[], |c| c.children())
    }

    /// Children that were alive in the last animate pass.
    pub fn active_children(&self, id: ActorId) -> &[ActorId] {
        self.container(id).map_or(&[], |c| c.active_children())
    }

    /// True when `ancestor` is `id` or one of its parents.
    pub fn is_ancestor(&self, ancestor: ActorId, id: ActorId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Attaches a behavior to an actor.
    ///
    /// Scenes only animate through their ease transitions; for a scene this
    /// is a no-op and returns `None`.
    pub fn add_behavior(&mut self, id: ActorId, behavior: Behavior) -> Option<BehaviorId> {
        let node = self.get_node_mut(id)?;
        if node.is_scene() {
            debug!(scene = id, "add_behavior ignored on scene");
            return None;
        }
        Some(node.actor.add_behavior(behavior))
    }

    pub fn remove_behavior(&mut self, id: ActorId, behavior: BehaviorId) -> Option<Behavior> {
        self.actor_mut(id)?.remove_behavior(behavior)
    }

    /// Aggregate `(total, active)` node counts for a subtree, as of the last animate.
    pub fn sizes(&self, id: ActorId) -> (usize, usize) {
        match self.get_node(id) {
            Some(node) => match &node.container {
                Some(c) => (c.size_total, c.size_active),
                None => (1, usize::from(node.actor.is_in_frame())),
            },
            None => (0, 0),
        }
    }

    /// Animates a node and, for containers, its subtree.
    pub(crate) fn animate_node(
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
        if node.container.is_none() {
            return node.actor.animate(time, parent_world, parent_alpha, dirty);
        }
        self.animate_container(id, time, parent_world, parent_alpha, dirty)
    }

    /// Animates a root node (a scene or a detached container) at `time`.
    pub fn animate(&mut self, root: ActorId, time: f64, dirty: &mut DirtyRegions) -> bool {
        self.animate_node(root, time, &Matrix::identity(), 1.0, dirty)
    }
}
