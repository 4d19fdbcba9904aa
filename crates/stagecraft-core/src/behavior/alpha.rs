use super::BehaviorValue;
use crate::actor::Actor;

/// Linear fade between two opacity values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AlphaBehavior {
    pub start_alpha: f32,
    pub end_alpha: f32,
}

impl Default for AlphaBehavior {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl AlphaBehavior {
    pub fn new(start_alpha: f32, end_alpha: f32) -> Self {
        Self {
            start_alpha,
            end_alpha,
        }
    }

    pub fn set_values(&mut self, start_alpha: f32, end_alpha: f32) -> &mut Self {
        self.start_alpha = start_alpha;
        self.end_alpha = end_alpha;
        self
    }

    pub(crate) fn set_for_time(&self, t: f32, target: &mut Actor, apply: bool) -> BehaviorValue {
        let alpha = self.start_alpha + t * (self.end_alpha - self.start_alpha);
        if apply {
            target.set_alpha(alpha);
        }
        BehaviorValue::Scalar(alpha)
    }
}
