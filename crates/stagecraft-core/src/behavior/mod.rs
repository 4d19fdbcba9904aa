//! # Behaviors
//!
//! Time-bounded property mutators applied to an actor at a given scene time.
//!
//! ## Responsibilities
//! - **Time model**: start/duration windows, cycling, delayed starts and
//!   fractional offsets (see [`Timing`]).
//! - **Status machine**: `NotStarted -> Started -> Expired`, with
//!   `Started`, `Applied` and `Expired` events fired to listeners in
//!   registration order.
//! - **Value computation**: each [`BehaviorKind`] turns an eased time in
//!   `[0, 1]` into a value and (unless value application is disabled)
//!   writes it to the target actor.
//!
//! Behaviors never reach back into their owner. A discardable behavior that
//! expires is dropped by the owning actor's sweep at the end of its pass.

mod alpha;
mod color;
mod container;
mod generic;
mod path;
mod rotate;
mod scale;
mod timing;

pub use alpha::AlphaBehavior;
pub use color::ColorBehavior;
pub use container::ContainerBehavior;
pub use generic::{GenericBehavior, GenericTarget};
pub use path::{Facing, PathBehavior};
pub use rotate::RotateBehavior;
pub use scale::{Axis, Scale1Behavior, ScaleBehavior};
pub use timing::{BehaviorStatus, Timing};
pub(crate) use timing::TimeCheck;

use crate::actor::Actor;
use crate::interpolator::Interpolator;
use crate::types::{Color, Point};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Process-unique behavior identifier.
pub type BehaviorId = u64;

static NEXT_BEHAVIOR_ID: AtomicU64 = AtomicU64::new(1);

fn next_behavior_id() -> BehaviorId {
    NEXT_BEHAVIOR_ID.fetch_add(1, Ordering::Relaxed)
}

/// Value computed by a behavior for a given time.
#[derive(Clone, Debug, PartialEq)]
pub enum BehaviorValue {
    None,
    Scalar(f32),
    Scale { x: f32, y: f32 },
    Point(Point),
    Color(Color),
}

impl BehaviorValue {
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            BehaviorValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            BehaviorValue::Point(p) => Some(*p),
            _ => None,
        }
    }
}

/// Lifecycle notification delivered to behavior listeners.
#[derive(Clone, Debug, PartialEq)]
pub enum BehaviorEvent {
    Started {
        time: f64,
    },
    /// `time` is the scene time handed to `apply`, `normalized` the eased time.
    Applied {
        time: f64,
        normalized: f32,
        value: BehaviorValue,
    },
    Expired {
        time: f64,
    },
}

pub type BehaviorListener = Box<dyn FnMut(BehaviorId, &BehaviorEvent)>;

/// The closed set of behavior variants.
#[derive(Clone, Debug)]
pub enum BehaviorKind {
    Alpha(AlphaBehavior),
    Rotate(RotateBehavior),
    Scale(ScaleBehavior),
    Scale1(Scale1Behavior),
    Path(PathBehavior),
    Color(ColorBehavior),
    Generic(GenericBehavior),
    Container(ContainerBehavior),
}

macro_rules! impl_from_kind {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(impl From<$ty> for BehaviorKind {
            fn from(value: $ty) -> Self {
                BehaviorKind::$variant(value)
            }
        })*
    };
}

impl_from_kind! {
    Alpha => AlphaBehavior,
    Rotate => RotateBehavior,
    Scale => ScaleBehavior,
    Scale1 => Scale1Behavior,
    Path => PathBehavior,
    Color => ColorBehavior,
    Generic => GenericBehavior,
    Container => ContainerBehavior,
}

/// A time-driven property animation bound to a target actor at apply time.
pub struct Behavior {
    id: BehaviorId,
    pub timing: Timing,
    /// Drop from the owning actor once expired.
    pub discardable: bool,
    /// When false, values are computed and reported but the target is left untouched.
    pub do_value_application: bool,
    kind: BehaviorKind,
    listeners: Vec<BehaviorListener>,
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("id", &self.id)
            .field("timing", &self.timing)
            .field("discardable", &self.discardable)
            .field("kind", &self.kind)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Behavior {
    pub fn new(kind: impl Into<BehaviorKind>) -> Self {
        Self {
            id: next_behavior_id(),
            timing: Timing::default(),
            discardable: false,
            do_value_application: true,
            kind: kind.into(),
            listeners: Vec::new(),
        }
    }

    pub fn alpha(start: f32, end: f32) -> Self {
        Self::new(AlphaBehavior::new(start, end))
    }

    pub fn rotate(start_angle: f32, end_angle: f32) -> Self {
        Self::new(RotateBehavior::new(start_angle, end_angle))
    }

    pub fn scale(start_x: f32, end_x: f32, start_y: f32, end_y: f32) -> Self {
        Self::new(ScaleBehavior::new(start_x, end_x, start_y, end_y))
    }

    pub fn container() -> Self {
        Self::new(ContainerBehavior::new())
    }

    pub fn with_frame_time(mut self, start_time: f64, duration: f64) -> Self {
        self.set_frame_time(start_time, duration);
        self
    }

    pub fn with_delay_time(mut self, delay: f64, duration: f64) -> Self {
        self.set_delay_time(delay, duration);
        self
    }

    pub fn with_cycle(mut self, cycle: bool) -> Self {
        self.timing.cycle = cycle;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.timing.interpolator = interpolator;
        self
    }

    pub fn with_time_offset(mut self, offset: f64) -> Self {
        self.timing.time_offset = offset;
        self
    }

    pub fn with_discardable(mut self, discardable: bool) -> Self {
        self.discardable = discardable;
        self
    }

    pub fn with_value_application(mut self, apply: bool) -> Self {
        self.do_value_application = apply;
        self
    }

    pub fn with_listener(mut self, listener: impl FnMut(BehaviorId, &BehaviorEvent) + 'static) -> Self {
        self.add_listener(listener);
        self
    }

    pub fn id(&self) -> BehaviorId {
        self.id
    }

    pub fn kind(&self) -> &BehaviorKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut BehaviorKind {
        &mut self.kind
    }

    pub fn status(&self) -> BehaviorStatus {
        self.timing.status()
    }

    pub fn is_expired(&self) -> bool {
        self.timing.status() == BehaviorStatus::Expired
    }

    /// Re-arms the behavior with an absolute window.
    pub fn set_frame_time(&mut self, start_time: f64, duration: f64) -> &mut Self {
        self.timing.set_frame_time(start_time, duration);
        self
    }

    /// Re-arms the behavior to start `delay` ms after the first time it is applied.
    pub fn set_delay_time(&mut self, delay: f64, duration: f64) -> &mut Self {
        self.timing.set_delay_time(delay, duration);
        self
    }

    /// Cancels permanently.
    pub fn set_out_of_frame_time(&mut self) -> &mut Self {
        self.timing.set_out_of_frame_time();
        self
    }

    pub fn set_cycle(&mut self, cycle: bool) -> &mut Self {
        self.timing.cycle = cycle;
        self
    }

    pub fn set_interpolator(&mut self, interpolator: Interpolator) -> &mut Self {
        self.timing.interpolator = interpolator;
        self
    }

    pub(crate) fn set_status(&mut self, status: BehaviorStatus) {
        self.timing.set_status(status);
    }

    pub fn add_listener(&mut self, listener: impl FnMut(BehaviorId, &BehaviorEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn empty_listener_list(&mut self) {
        self.listeners.clear();
    }

    fn fire(&mut self, event: &BehaviorEvent) {
        let id = self.id;
        for listener in self.listeners.iter_mut() {
            listener(id, event);
        }
    }

    /// Advances the behavior to scene time `time` against `target`.
    ///
    /// Returns the value computed on this call: the interpolated value while
    /// in time, the final value on the call that expires it, or `None` when
    /// the behavior is inactive.
    pub fn apply(&mut self, time: f64, target: &mut Actor) -> Option<BehaviorValue> {
        self.timing.solve(time);
        let time = self.timing.offset(time);

        match self.timing.check(time) {
            TimeCheck::Inactive => None,
            TimeCheck::Expire { started } => {
                if started {
                    self.fire(&BehaviorEvent::Started { time });
                }
                Some(self.set_expired(target, time))
            }
            TimeCheck::InTime { started } => {
                if started {
                    self.fire(&BehaviorEvent::Started { time });
                }
                if let BehaviorKind::Container(container) = &mut self.kind {
                    let local = self.timing.local_time(time);
                    return container.apply_children(local, self.timing.cycle, target);
                }
                let normalized = self.timing.normalize(time);
                let value = self.set_for_time(normalized, target);
                self.fire(&BehaviorEvent::Applied {
                    time,
                    normalized,
                    value: value.clone(),
                });
                Some(value)
            }
        }
    }

    /// Computes the value for eased time `t`, writing it to `target` when
    /// value application is enabled.
    pub fn set_for_time(&mut self, t: f32, target: &mut Actor) -> BehaviorValue {
        let apply = self.do_value_application;
        match &mut self.kind {
            BehaviorKind::Alpha(b) => b.set_for_time(t, target, apply),
            BehaviorKind::Rotate(b) => b.set_for_time(t, target, apply),
            BehaviorKind::Scale(b) => b.set_for_time(t, target, apply),
            BehaviorKind::Scale1(b) => b.set_for_time(t, target, apply),
            BehaviorKind::Path(b) => b.set_for_time(t, target, apply),
            BehaviorKind::Color(b) => b.set_for_time(t, target, apply),
            BehaviorKind::Generic(b) => b.set_for_time(t, target, apply),
            BehaviorKind::Container(b) => b.set_for_time(t, target),
        }
    }

    /// Expires now, snapping the target to the final value.
    pub fn set_expired(&mut self, target: &mut Actor, time: f64) -> BehaviorValue {
        self.timing.set_status(BehaviorStatus::Expired);
        let value = self.set_for_time(self.timing.final_value(), target);
        if let BehaviorKind::Container(container) = &mut self.kind {
            container.expire_children(target, time - self.timing.start_time);
        }
        debug!(behavior = self.id, time, "behavior expired");
        self.fire(&BehaviorEvent::Expired { time });
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<BehaviorEvent>>>, impl FnMut(BehaviorId, &BehaviorEvent)) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        (events, move |_, e: &BehaviorEvent| sink.borrow_mut().push(e.clone()))
    }

    #[test]
    fn alpha_runs_start_to_end() {
        let mut actor = Actor::new();
        let (events, listener) = recorder();
        let mut b = Behavior::alpha(0.0, 1.0)
            .with_frame_time(0.0, 1000.0)
            .with_listener(listener);

        assert_eq!(b.apply(0.0, &mut actor), Some(BehaviorValue::Scalar(0.0)));
        assert_eq!(b.apply(500.0, &mut actor), Some(BehaviorValue::Scalar(0.5)));
        assert_eq!(actor.alpha, 0.5);
        assert_eq!(b.apply(1000.0, &mut actor), Some(BehaviorValue::Scalar(1.0)));
        assert_eq!(b.status(), BehaviorStatus::Expired);
        assert_eq!(b.apply(1500.0, &mut actor), None);

        let expired = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, BehaviorEvent::Expired { .. }))
            .count();
        assert_eq!(expired, 1);
        assert!(matches!(events.borrow()[0], BehaviorEvent::Started { .. }));
    }

    #[test]
    fn value_application_can_be_disabled() {
        let mut actor = Actor::new();
        let mut b = Behavior::rotate(0.0, 2.0)
            .with_frame_time(0.0, 100.0)
            .with_value_application(false);
        assert_eq!(b.apply(50.0, &mut actor), Some(BehaviorValue::Scalar(1.0)));
        assert_eq!(actor.rotation_angle, 0.0);
    }

    #[test]
    fn time_offset_pre_shifts() {
        let mut actor = Actor::new();
        let mut b = Behavior::alpha(0.0, 1.0)
            .with_frame_time(0.0, 1000.0)
            .with_time_offset(0.25);
        assert_eq!(b.apply(0.0, &mut actor), Some(BehaviorValue::Scalar(0.25)));
    }

    #[test]
    fn delay_time_resolves_against_first_apply() {
        let mut actor = Actor::new();
        let mut b = Behavior::alpha(0.0, 1.0).with_delay_time(100.0, 100.0);
        assert_eq!(b.apply(1000.0, &mut actor), None);
        assert_eq!(b.timing.start_time, 1100.0);
        assert_eq!(b.apply(1150.0, &mut actor), Some(BehaviorValue::Scalar(0.5)));
    }

    #[test]
    fn set_frame_time_rearms_an_expired_behavior() {
        let mut actor = Actor::new();
        let mut b = Behavior::alpha(0.0, 1.0).with_frame_time(0.0, 10.0);
        b.apply(20.0, &mut actor);
        assert!(b.is_expired());
        b.set_frame_time(100.0, 10.0);
        assert_eq!(b.status(), BehaviorStatus::NotStarted);
        assert!(b.apply(105.0, &mut actor).is_some());
    }

    #[test]
    fn cancelled_behavior_never_applies() {
        let mut actor = Actor::new();
        let mut b = Behavior::alpha(0.0, 1.0).with_frame_time(0.0, 10.0);
        b.set_out_of_frame_time();
        assert_eq!(b.apply(5.0, &mut actor), None);
        assert_eq!(actor.alpha, 1.0);
    }
}
