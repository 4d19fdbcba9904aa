use super::BehaviorValue;
use crate::actor::Actor;
use crate::path::MotionPath;
use crate::types::{ImageTransform, Point};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Which way an auto-rotated sprite is allowed to face.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Faces right; mirrored horizontally while travelling leftwards.
    Right,
    /// Faces left; mirrored horizontally while travelling rightwards.
    Left,
    /// Follows the tangent without mirroring.
    #[default]
    Free,
}

/// Moves the target along a [`MotionPath`].
///
/// With `auto_rotate` the target is turned to follow the direction of travel
/// between consecutive samples.
#[derive(Clone, Debug, Default)]
pub struct PathBehavior {
    pub path: Option<MotionPath>,
    pub auto_rotate: bool,
    pub facing: Facing,
    /// Subtracted from every sampled point, typically the target's hotspot.
    pub translate_x: f32,
    pub translate_y: f32,
    prev: Option<Point>,
}

impl PathBehavior {
    pub fn new(path: MotionPath) -> Self {
        Self {
            path: Some(path),
            ..Self::default()
        }
    }

    pub fn with_auto_rotate(mut self, auto_rotate: bool, facing: Facing) -> Self {
        self.auto_rotate = auto_rotate;
        self.facing = facing;
        self
    }

    pub fn with_translation(mut self, x: f32, y: f32) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }

    pub fn set_path(&mut self, path: MotionPath) -> &mut Self {
        self.path = Some(path);
        self.prev = None;
        self
    }

    pub(crate) fn set_for_time(&mut self, t: f32, target: &mut Actor, apply: bool) -> BehaviorValue {
        let Some(path) = &self.path else {
            return BehaviorValue::Point(Point::new(target.x, target.y));
        };
        let point = path.get_position(t);

        if self.auto_rotate {
            if let Some(prev) = self.prev {
                let delta = point - prev;
                if delta != Point::ZERO {
                    let mut angle = delta.y.atan2(delta.x);
                    let moving_right = prev.x <= point.x;
                    let mirror = match self.facing {
                        Facing::Right if !moving_right => {
                            angle += PI;
                            ImageTransform::FlipHorizontal
                        }
                        Facing::Left if moving_right => ImageTransform::FlipHorizontal,
                        Facing::Left => {
                            angle -= PI;
                            ImageTransform::None
                        }
                        _ => ImageTransform::None,
                    };
                    if apply {
                        target.set_rotation(angle);
                        if self.facing != Facing::Free {
                            target.image_transform = mirror;
                        }
                    }
                }
            }
            self.prev = Some(point);
        }

        let location = point - Point::new(self.translate_x, self.translate_y);
        if apply {
            target.set_location(location.x, location.y);
        }
        BehaviorValue::Point(location)
    }
}
