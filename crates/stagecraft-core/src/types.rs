//! # Types Module
//!
//! Shared data types used across the engine.
//!
//! ## Responsibilities
//! - **Color**: RGBA color representation with tweening support.
//! - **Rect**: Axis-aligned rectangles for bounds, dirty regions and blits.
//! - **Property**: Named actor properties targeted by generic behaviors and keyframes.
//!
//! ## Key Types
//! - `Color`: Float-based RGBA color.
//! - `Rect`: `x, y, width, height` rectangle in `f32`.
//! - `ActorId`: Type alias for arena indices (`usize`).

use keyframe::CanTween;
use serde::{Deserialize, Serialize};

/// A unique identifier for an actor in the scene graph arena.
pub type ActorId = usize;

/// 2D point type used by hit-testing, paths and matrices.
pub type Point = glam::Vec2;

/// Represents a RGBA color in float format (0.0 - 1.0).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim_start_matches('#');
        let channel = |i: usize| -> Option<f32> {
            let byte = u8::from_str_radix(digits.get(i..i + 2)?, 16).ok()?;
            Some(byte as f32 / 255.0)
        };
        match digits.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 1.0)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Converts to 8-bit channels, clamping out-of-range values.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Returns the color with its alpha multiplied by `alpha`.
    pub fn with_alpha_factor(&self, alpha: f32) -> Self {
        Self {
            a: self.a * alpha,
            ..*self
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl CanTween for Color {
    fn ease(from: Self, to: Self, time: impl keyframe::num_traits::Float) -> Self {
        let t = time.to_f32().unwrap_or(0.0);
        Self {
            r: from.r + (to.r - from.r) * t,
            g: from.g + (to.g - from.g) * t,
            b: from.b + (to.b - from.b) * t,
            a: from.a + (to.a - from.a) * t,
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_wh(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.is_empty() || other.is_empty())
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Expands to whole-pixel edges.
    pub fn round_out(&self) -> Rect {
        let (x, y) = (self.x.floor(), self.y.floor());
        Rect::new(x, y, self.right().ceil() - x, self.bottom().ceil() - y)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Bounding box of a set of points. Empty input yields a zero rect.
    pub fn from_points(points: &[Point]) -> Rect {
        let Some(first) = points.first() else {
            return Rect::default();
        };
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// Actor properties addressable by name from generic behaviors and keyframe tracks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    X,
    Y,
    Width,
    Height,
    Rotation,
    ScaleX,
    ScaleY,
    Alpha,
}

impl Property {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "rotation" | "angle" => Some(Self::Rotation),
            "scale_x" => Some(Self::ScaleX),
            "scale_y" => Some(Self::ScaleY),
            "alpha" | "opacity" => Some(Self::Alpha),
            _ => None,
        }
    }
}

/// Mirroring applied to an actor's image content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageTransform {
    #[default]
    None,
    FlipHorizontal,
    FlipVertical,
    FlipAll,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        let c = Color::from_hex("#FF000080").unwrap();
        assert_eq!(c.to_rgba8(), [255, 0, 0, 128]);
        assert!(Color::from_hex("#12").is_none());
    }

    #[test]
    fn rect_union_ignores_empty() {
        let a = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert_eq!(a.union(&Rect::default()), a);
        let b = Rect::new(0.0, 12.0, 2.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 10.0, 15.0, 12.0));
    }

    #[test]
    fn color_tween_midpoint() {
        let mid = Color::ease(Color::BLACK, Color::WHITE, 0.5f32);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.a - 1.0).abs() < 1e-6);
    }
}
