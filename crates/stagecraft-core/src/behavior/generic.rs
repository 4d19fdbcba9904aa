use super::BehaviorValue;
use crate::actor::Actor;
use crate::types::Property;
use std::fmt;
use std::rc::Rc;

/// Where a [`GenericBehavior`] writes its value.
#[derive(Clone, Default)]
pub enum GenericTarget {
    /// Compute only.
    #[default]
    None,
    Property(Property),
    Callback(Rc<dyn Fn(f32, &mut Actor)>),
}

impl fmt::Debug for GenericTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericTarget::None => f.write_str("None"),
            GenericTarget::Property(p) => f.debug_tuple("Property").field(p).finish(),
            GenericTarget::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Interpolates a number between two values and hands it to a property or callback.
#[derive(Clone, Debug, Default)]
pub struct GenericBehavior {
    pub start: f32,
    pub end: f32,
    pub target: GenericTarget,
}

impl GenericBehavior {
    pub fn new(start: f32, end: f32, target: GenericTarget) -> Self {
        Self { start, end, target }
    }

    pub fn property(start: f32, end: f32, property: Property) -> Self {
        Self::new(start, end, GenericTarget::Property(property))
    }

    pub fn callback(start: f32, end: f32, f: impl Fn(f32, &mut Actor) + 'static) -> Self {
        Self::new(start, end, GenericTarget::Callback(Rc::new(f)))
    }

    pub(crate) fn set_for_time(&self, t: f32, target: &mut Actor, apply: bool) -> BehaviorValue {
        let value = self.start + t * (self.end - self.start);
        if apply {
            match &self.target {
                GenericTarget::None => {}
                GenericTarget::Property(p) => target.set_property(*p, value),
                GenericTarget::Callback(f) => f(value, target),
            }
        }
        BehaviorValue::Scalar(value)
    }
}
