use super::{Behavior, BehaviorId, BehaviorStatus, BehaviorValue};
use crate::actor::Actor;

/// Groups behaviors on a shared, container-local timeline.
///
/// Children are framed relative to the container's start: a child with
/// frame time `(0, 500)` in a container starting at 1000 runs from scene
/// time 1000 to 1500. Cyclic containers rewind expired children every lap.
#[derive(Debug, Default)]
pub struct ContainerBehavior {
    behaviors: Vec<Behavior>,
}

impl Clone for ContainerBehavior {
    /// Listeners are not cloneable; a cloned container starts with empty
    /// child listener lists.
    fn clone(&self) -> Self {
        Self {
            behaviors: self
                .behaviors
                .iter()
                .map(|b| Behavior {
                    id: super::next_behavior_id(),
                    timing: b.timing,
                    discardable: b.discardable,
                    do_value_application: b.do_value_application,
                    kind: b.kind.clone(),
                    listeners: Vec::new(),
                })
                .collect(),
        }
    }
}

impl ContainerBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.add_behavior(behavior);
        self
    }

    pub fn add_behavior(&mut self, behavior: Behavior) -> BehaviorId {
        let id = behavior.id();
        self.behaviors.push(behavior);
        id
    }

    pub fn remove_behavior(&mut self, id: BehaviorId) -> Option<Behavior> {
        let index = self.behaviors.iter().position(|b| b.id() == id)?;
        Some(self.behaviors.remove(index))
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    pub fn behaviors_mut(&mut self) -> &mut [Behavior] {
        &mut self.behaviors
    }

    pub fn get(&self, id: BehaviorId) -> Option<&Behavior> {
        self.behaviors.iter().find(|b| b.id() == id)
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Forwards a container-local time to every child.
    ///
    /// In a cyclic container a child that expires during this call is set
    /// back to `Started` so it runs again on the next lap.
    pub(crate) fn apply_children(&mut self, local_time: f64, cycle: bool, target: &mut Actor) -> Option<BehaviorValue> {
        let mut last = None;
        for child in self.behaviors.iter_mut() {
            let was_expired = child.is_expired();
            if let Some(value) = child.apply(local_time, target) {
                last = Some(value);
            }
            if cycle && !was_expired && child.is_expired() {
                child.set_status(BehaviorStatus::Started);
            }
        }
        last
    }

    pub(crate) fn set_for_time(&mut self, t: f32, target: &mut Actor) -> BehaviorValue {
        let mut last = BehaviorValue::None;
        for child in self.behaviors.iter_mut() {
            last = child.set_for_time(t, target);
        }
        last
    }

    /// Expires every child that has not expired yet, at container-local `time`.
    pub(crate) fn expire_children(&mut self, target: &mut Actor, time: f64) {
        for child in self.behaviors.iter_mut().filter(|b| !b.is_expired()) {
            child.set_expired(target, time);
        }
    }
}
