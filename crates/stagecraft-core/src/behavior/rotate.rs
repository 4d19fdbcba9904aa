use super::BehaviorValue;
use crate::actor::Actor;

/// Rotation between two angles (radians) around an anchor.
///
/// The anchor is a fraction of the target's size, so `(0.5, 0.5)` pivots
/// around the center regardless of how large the actor is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RotateBehavior {
    pub start_angle: f32,
    pub end_angle: f32,
    pub anchor_x: f32,
    pub anchor_y: f32,
}

impl Default for RotateBehavior {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl RotateBehavior {
    pub fn new(start_angle: f32, end_angle: f32) -> Self {
        Self {
            start_angle,
            end_angle,
            anchor_x: 0.5,
            anchor_y: 0.5,
        }
    }

    pub fn with_anchor(mut self, anchor_x: f32, anchor_y: f32) -> Self {
        self.anchor_x = anchor_x;
        self.anchor_y = anchor_y;
        self
    }

    pub fn set_values(&mut self, start_angle: f32, end_angle: f32, anchor_x: f32, anchor_y: f32) -> &mut Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self.anchor_x = anchor_x;
        self.anchor_y = anchor_y;
        self
    }

    /// Sets the anchor from a pixel position inside a `width` x `height` actor.
    pub fn set_anchor_absolute(&mut self, width: f32, height: f32, x: f32, y: f32) -> &mut Self {
        self.anchor_x = if width != 0.0 { x / width } else { 0.0 };
        self.anchor_y = if height != 0.0 { y / height } else { 0.0 };
        self
    }

    pub fn anchor_absolute(&self, width: f32, height: f32) -> (f32, f32) {
        (self.anchor_x * width, self.anchor_y * height)
    }

    pub(crate) fn set_for_time(&self, t: f32, target: &mut Actor, apply: bool) -> BehaviorValue {
        let angle = self.start_angle + t * (self.end_angle - self.start_angle);
        if apply {
            target.set_rotation_anchored(angle, self.anchor_x, self.anchor_y);
        }
        BehaviorValue::Scalar(angle)
    }
}
