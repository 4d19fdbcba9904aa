use super::BehaviorValue;
use crate::actor::Actor;
use serde::{Deserialize, Serialize};

/// A zero scale makes the model-view matrix singular and breaks hit-testing.
fn non_zero(v: f32) -> f32 {
    if v == 0.0 {
        0.01_f32.copysign(v)
    } else {
        v
    }
}

/// Scales both axes between start and end factors around an anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScaleBehavior {
    pub start_scale_x: f32,
    pub end_scale_x: f32,
    pub start_scale_y: f32,
    pub end_scale_y: f32,
    pub anchor_x: f32,
    pub anchor_y: f32,
}

impl Default for ScaleBehavior {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

impl ScaleBehavior {
    pub fn new(start_scale_x: f32, end_scale_x: f32, start_scale_y: f32, end_scale_y: f32) -> Self {
        Self {
            start_scale_x,
            end_scale_x,
            start_scale_y,
            end_scale_y,
            anchor_x: 0.5,
            anchor_y: 0.5,
        }
    }

    pub fn with_anchor(mut self, anchor_x: f32, anchor_y: f32) -> Self {
        self.anchor_x = anchor_x;
        self.anchor_y = anchor_y;
        self
    }

    pub fn set_anchor_absolute(&mut self, width: f32, height: f32, x: f32, y: f32) -> &mut Self {
        self.anchor_x = if width != 0.0 { x / width } else { 0.0 };
        self.anchor_y = if height != 0.0 { y / height } else { 0.0 };
        self
    }

    pub fn anchor_absolute(&self, width: f32, height: f32) -> (f32, f32) {
        (self.anchor_x * width, self.anchor_y * height)
    }

    pub(crate) fn set_for_time(&self, t: f32, target: &mut Actor, apply: bool) -> BehaviorValue {
        let x = non_zero(self.start_scale_x + t * (self.end_scale_x - self.start_scale_x));
        let y = non_zero(self.start_scale_y + t * (self.end_scale_y - self.start_scale_y));
        if apply {
            target.set_scale_anchored(x, y, self.anchor_x, self.anchor_y);
        }
        BehaviorValue::Scale { x, y }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    X,
    Y,
}

/// Scales a single axis, leaving the other untouched.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scale1Behavior {
    pub start_scale: f32,
    pub end_scale: f32,
    pub axis: Axis,
    pub anchor_x: f32,
    pub anchor_y: f32,
}

impl Scale1Behavior {
    pub fn new(start_scale: f32, end_scale: f32, axis: Axis) -> Self {
        Self {
            start_scale,
            end_scale,
            axis,
            anchor_x: 0.5,
            anchor_y: 0.5,
        }
    }

    pub fn with_anchor(mut self, anchor_x: f32, anchor_y: f32) -> Self {
        self.anchor_x = anchor_x;
        self.anchor_y = anchor_y;
        self
    }

    pub(crate) fn set_for_time(&self, t: f32, target: &mut Actor, apply: bool) -> BehaviorValue {
        let scale = non_zero(self.start_scale + t * (self.end_scale - self.start_scale));
        if apply {
            let (x, y) = match self.axis {
                Axis::X => (scale, target.scale_y),
                Axis::Y => (target.scale_x, scale),
            };
            target.set_scale_anchored(x, y, self.anchor_x, self.anchor_y);
        }
        BehaviorValue::Scalar(scale)
    }
}
