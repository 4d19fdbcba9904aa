use super::BehaviorValue;
use crate::actor::Actor;
use crate::types::Color;
use keyframe::CanTween;

/// Tweens the target's fill color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorBehavior {
    pub start: Color,
    pub end: Color,
}

impl ColorBehavior {
    pub fn new(start: Color, end: Color) -> Self {
        Self { start, end }
    }

    pub(crate) fn set_for_time(&self, t: f32, target: &mut Actor, apply: bool) -> BehaviorValue {
        let color = Color::ease(self.start, self.end, t);
        if apply {
            target.fill_color = Some(color);
        }
        BehaviorValue::Color(color)
    }
}
