//! Pointer and touch events routed to actors by hit-testing.

use crate::types::{ActorId, Point};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Down,
    Up,
    Move,
    /// Synthesized when `Up` lands on the actor that received `Down`.
    Click,
    /// Synthesized when the hovered actor changes.
    Enter,
    Exit,
    TouchStart,
    TouchMove,
    TouchEnd,
}

impl PointerKind {
    pub fn is_press(self) -> bool {
        matches!(self, PointerKind::Down | PointerKind::TouchStart)
    }

    pub fn is_release(self) -> bool {
        matches!(self, PointerKind::Up | PointerKind::TouchEnd)
    }
}

/// A pointer event delivered to a single actor.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Position in surface coordinates.
    pub screen: Point,
    /// Position in the receiving actor's local coordinates.
    pub local: Point,
    pub actor: ActorId,
    /// Global director time at dispatch.
    pub time: f64,
}

pub type PointerHandler = Box<dyn FnMut(&PointerEvent)>;

/// Hover and press tracking used to synthesize enter, exit and click events.
#[derive(Clone, Debug, Default)]
pub(crate) struct PointerState {
    pub hover: Option<ActorId>,
    pub pressed: Option<ActorId>,
}
