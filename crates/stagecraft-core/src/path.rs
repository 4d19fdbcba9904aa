//! # Motion Paths
//!
//! Paths followed by [`PathBehavior`](crate::behavior::PathBehavior).
//!
//! A `MotionPath` wraps a `kurbo::BezPath` and is sampled by arc length,
//! so equal steps of normalized time cover equal distances along the path.

use crate::types::Point;
use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg};

const ARCLEN_ACCURACY: f64 = 1e-3;

#[derive(Clone, Debug)]
pub struct MotionPath {
    segments: Vec<PathSeg>,
    /// Cumulative length at the end of each segment.
    lengths: Vec<f64>,
    start: Point,
}

impl MotionPath {
    pub fn from_bez_path(path: &BezPath) -> Self {
        let segments: Vec<PathSeg> = path.segments().collect();
        let mut lengths = Vec::with_capacity(segments.len());
        let mut total = 0.0;
        for seg in &segments {
            total += seg.arclen(ARCLEN_ACCURACY);
            lengths.push(total);
        }
        let start = match path.elements().first() {
            Some(PathEl::MoveTo(p)) => Point::new(p.x as f32, p.y as f32),
            _ => Point::ZERO,
        };
        Self {
            segments,
            lengths,
            start,
        }
    }

    /// Straight segment from `(x0, y0)` to `(x1, y1)`.
    pub fn linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::polyline(&[Point::new(x0, y0), Point::new(x1, y1)], false)
    }

    pub fn polyline(points: &[Point], closed: bool) -> Self {
        let mut path = BezPath::new();
        for (i, p) in points.iter().enumerate() {
            let kp = (p.x as f64, p.y as f64);
            if i == 0 {
                path.move_to(kp);
            } else {
                path.line_to(kp);
            }
        }
        if closed && points.len() > 2 {
            path.close_path();
        }
        Self::from_bez_path(&path)
    }

    pub fn quadratic(p0: Point, p1: Point, p2: Point) -> Self {
        let mut path = BezPath::new();
        path.move_to((p0.x as f64, p0.y as f64));
        path.quad_to((p1.x as f64, p1.y as f64), (p2.x as f64, p2.y as f64));
        Self::from_bez_path(&path)
    }

    pub fn cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        let mut path = BezPath::new();
        path.move_to((p0.x as f64, p0.y as f64));
        path.curve_to(
            (p1.x as f64, p1.y as f64),
            (p2.x as f64, p2.y as f64),
            (p3.x as f64, p3.y as f64),
        );
        Self::from_bez_path(&path)
    }

    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0) as f32
    }

    /// Position at normalized distance `t` along the path.
    ///
    /// `t` is clamped to `[0, 1]`; an empty path always yields its start point.
    pub fn get_position(&self, t: f32) -> Point {
        let total = self.lengths.last().copied().unwrap_or(0.0);
        if self.segments.is_empty() || total <= 0.0 {
            return self.start;
        }
        let target = (t.clamp(0.0, 1.0) as f64) * total;
        let index = self
            .lengths
            .partition_point(|&l| l < target)
            .min(self.segments.len() - 1);
        let seg = &self.segments[index];
        let seg_start = if index == 0 { 0.0 } else { self.lengths[index - 1] };
        let seg_len = self.lengths[index] - seg_start;
        let local = if seg_len > 0.0 {
            seg.inv_arclen(target - seg_start, ARCLEN_ACCURACY)
        } else {
            0.0
        };
        let p = seg.eval(local);
        Point::new(p.x as f32, p.y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_midpoint() {
        let path = MotionPath::linear(0.0, 0.0, 100.0, 0.0);
        assert!((path.length() - 100.0).abs() < 1e-3);
        let p = path.get_position(0.5);
        assert!((p.x - 50.0).abs() < 1e-3 && p.y.abs() < 1e-3);
    }

    #[test]
    fn polyline_is_sampled_by_distance() {
        // 100 right then 300 down: the halfway mark lies on the second leg.
        let path = MotionPath::polyline(
            &[
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 300.0),
            ],
            false,
        );
        let p = path.get_position(0.5);
        assert!((p.x - 100.0).abs() < 1e-2, "{p:?}");
        assert!((p.y - 100.0).abs() < 1e-2, "{p:?}");
    }

    #[test]
    fn empty_path_is_inert() {
        let path = MotionPath::polyline(&[Point::new(7.0, 9.0)], false);
        assert_eq!(path.get_position(0.7), Point::new(7.0, 9.0));
        assert_eq!(path.length(), 0.0);
    }

    #[test]
    fn cubic_endpoints() {
        let path = MotionPath::cubic(
            Point::new(0.0, 0.0),
            Point::new(0.0, 50.0),
            Point::new(100.0, 50.0),
            Point::new(100.0, 0.0),
        );
        let end = path.get_position(1.0);
        assert!((end.x - 100.0).abs() < 1e-2 && end.y.abs() < 1e-2);
    }
}
