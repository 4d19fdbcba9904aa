//! # Affine Transforms
//!
//! `Matrix` is a 3x3 homogeneous 2D transform stored row-major:
//!
//! ```text
//! | m[0] m[1] m[2] |     | a c tx |
//! | m[3] m[4] m[5] |  =  | b d ty |
//! | m[6] m[7] m[8] |     | 0 0 1  |
//! ```
//!
//! Rotation follows the raster convention (y axis pointing down), so a
//! positive angle turns clockwise on screen: rotating `(1, 0)` by `PI / 2`
//! yields `(0, 1)`.
//!
//! `Matrix3` is the 4x4 counterpart for 3D composition, backed by `glam::Mat4`.
//! `MatrixStack` accumulates a node's world transform from root to leaf.

use crate::types::Point;
use glam::{Mat4, Vec3};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix {
    pub m: [f32; 9],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn rotate(angle: f32) -> Self {
        let mut m = Self::identity();
        m.set_rotation(angle);
        m
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        let mut m = Self::identity();
        m.set_scale(sx, sy);
        m
    }

    pub fn translate(x: f32, y: f32) -> Self {
        let mut m = Self::identity();
        m.set_translate(x, y);
        m
    }

    /// Overwrites this matrix with a pure rotation.
    pub fn set_rotation(&mut self, angle: f32) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.m = [c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0];
        self
    }

    pub fn set_scale(&mut self, sx: f32, sy: f32) -> &mut Self {
        self.m = [sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0];
        self
    }

    pub fn set_translate(&mut self, x: f32, y: f32) -> &mut Self {
        self.m = [1.0, 0.0, x, 0.0, 1.0, y, 0.0, 0.0, 1.0];
        self
    }

    /// Right-multiplies in place: `self = self * other`.
    pub fn multiply(&mut self, other: &Matrix) -> &mut Self {
        self.m = product(&self.m, &other.m);
        self
    }

    /// Left-multiplies in place: `self = other * self`.
    pub fn premultiply(&mut self, other: &Matrix) -> &mut Self {
        self.m = product(&other.m, &self.m);
        self
    }

    pub fn multiply_scalar(&mut self, s: f32) -> &mut Self {
        for v in self.m.iter_mut() {
            *v *= s;
        }
        self
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// Closed-form inverse through the adjugate.
    ///
    /// Returns `None` when the determinant is zero.
    pub fn get_inverse(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let m = &self.m;
        let adj = [
            m[4] * m[8] - m[5] * m[7],
            m[2] * m[7] - m[1] * m[8],
            m[1] * m[5] - m[2] * m[4],
            m[5] * m[6] - m[3] * m[8],
            m[0] * m[8] - m[2] * m[6],
            m[2] * m[3] - m[0] * m[5],
            m[3] * m[7] - m[4] * m[6],
            m[1] * m[6] - m[0] * m[7],
            m[0] * m[4] - m[1] * m[3],
        ];
        let mut inv = Matrix { m: adj };
        inv.multiply_scalar(1.0 / det);
        Some(inv)
    }

    /// Transforms `point` in place and returns it.
    ///
    /// Callers that need the original point must copy it first.
    pub fn transform_coord<'a>(&self, point: &'a mut Point) -> &'a mut Point {
        let (x, y) = (point.x, point.y);
        point.x = x * self.m[0] + y * self.m[1] + self.m[2];
        point.y = x * self.m[3] + y * self.m[4] + self.m[5];
        point
    }

    /// Convenience wrapper over [`Matrix::transform_coord`] for value points.
    pub fn transform_point(&self, mut point: Point) -> Point {
        self.transform_coord(&mut point);
        point
    }

    /// The `(a, b, c, d, e, f)` tuple expected by 2D canvas `setTransform`.
    pub fn to_canvas(&self) -> [f32; 6] {
        [
            self.m[0], self.m[3], self.m[1], self.m[4], self.m[2], self.m[5],
        ]
    }

    pub fn approx_eq(&self, other: &Matrix, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

fn product(a: &[f32; 9], b: &[f32; 9]) -> [f32; 9] {
    let mut out = [0.0; 9];
    for row in 0..3 {
        for col in 0..3 {
            out[row * 3 + col] = (0..3).map(|k| a[row * 3 + k] * b[k * 3 + col]).sum();
        }
    }
    out
}

/// 4x4 transform for 3D composition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix3 {
    pub mat: Mat4,
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3 {
    pub fn identity() -> Self {
        Self {
            mat: Mat4::IDENTITY,
        }
    }

    /// Rotation around the x, y and z axes, applied in that order.
    pub fn rotate(x: f32, y: f32, z: f32) -> Self {
        Self {
            mat: Mat4::from_rotation_z(z) * Mat4::from_rotation_y(y) * Mat4::from_rotation_x(x),
        }
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            mat: Mat4::from_scale(Vec3::new(sx, sy, sz)),
        }
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self {
            mat: Mat4::from_translation(Vec3::new(x, y, z)),
        }
    }

    pub fn multiply(&mut self, other: &Matrix3) -> &mut Self {
        self.mat *= other.mat;
        self
    }

    pub fn premultiply(&mut self, other: &Matrix3) -> &mut Self {
        self.mat = other.mat * self.mat;
        self
    }

    pub fn determinant(&self) -> f32 {
        self.mat.determinant()
    }

    /// Returns `None` when the determinant is zero.
    pub fn get_inverse(&self) -> Option<Matrix3> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Self {
            mat: self.mat.inverse(),
        })
    }

    pub fn transform_coord<'a>(&self, point: &'a mut Vec3) -> &'a mut Vec3 {
        *point = self.mat.transform_point3(*point);
        point
    }

    /// Drops the z row and column, keeping the 2D affine part.
    pub fn to_matrix(&self) -> Matrix {
        let c = self.mat.to_cols_array_2d();
        Matrix {
            m: [
                c[0][0], c[1][0], c[3][0], c[0][1], c[1][1], c[3][1], 0.0, 0.0, 1.0,
            ],
        }
    }
}

/// Ordered stack of matrices with index-based checkpoints.
///
/// `save` records the current depth and `restore` pops back to it.
#[derive(Clone, Debug, Default)]
pub struct MatrixStack {
    stack: Vec<Matrix>,
    saved: Vec<usize>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_matrix(&mut self, matrix: Matrix) -> &mut Self {
        self.stack.push(matrix);
        self
    }

    pub fn pop_matrix(&mut self) -> Option<Matrix> {
        self.stack.pop()
    }

    pub fn save(&mut self) -> &mut Self {
        self.saved.push(self.stack.len());
        self
    }

    pub fn restore(&mut self) -> &mut Self {
        if let Some(len) = self.saved.pop() {
            while self.stack.len() > len {
                self.stack.pop();
            }
        }
        self
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Left-to-right product of every pushed matrix.
    pub fn get_matrix(&self) -> Matrix {
        let mut out = Matrix::identity();
        for m in &self.stack {
            out.multiply(m);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: Point, b: Point) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn rotation_is_clockwise_on_screen() {
        let m = Matrix::rotate(PI / 2.0);
        let mut p = Point::new(1.0, 0.0);
        m.transform_coord(&mut p);
        assert!(close(p, Point::new(0.0, 1.0)), "{p:?}");
    }

    #[test]
    fn inverse_round_trip() {
        let mut m = Matrix::translate(30.0, -12.0);
        m.multiply(&Matrix::rotate(0.7)).multiply(&Matrix::scale(2.0, 0.5));
        let inv = m.get_inverse().unwrap();
        let original = Point::new(3.5, -8.0);
        let mut p = original;
        inv.transform_coord(m.transform_coord(&mut p));
        assert!(close(p, original));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Matrix::scale(0.0, 1.0).get_inverse().is_none());
    }

    #[test]
    fn premultiply_reverses_order() {
        let mut a = Matrix::translate(10.0, 0.0);
        a.premultiply(&Matrix::scale(2.0, 2.0));
        // scale(translate(p))
        assert!(close(a.transform_point(Point::ZERO), Point::new(20.0, 0.0)));

        let mut b = Matrix::translate(10.0, 0.0);
        b.multiply(&Matrix::scale(2.0, 2.0));
        // translate(scale(p))
        assert!(close(b.transform_point(Point::new(1.0, 0.0)), Point::new(12.0, 0.0)));
    }

    #[test]
    fn stack_restore_pops_to_checkpoint() {
        let mut stack = MatrixStack::new();
        stack.push_matrix(Matrix::translate(5.0, 5.0));
        stack.save();
        stack.push_matrix(Matrix::scale(2.0, 2.0));
        stack.push_matrix(Matrix::rotate(1.0));
        assert_eq!(stack.depth(), 3);
        stack.restore();
        assert_eq!(stack.depth(), 1);
        assert!(stack.get_matrix().approx_eq(&Matrix::translate(5.0, 5.0), 1e-6));
    }

    #[test]
    fn matrix3_inverse_and_projection() {
        let mut m = Matrix3::translate(1.0, 2.0, 3.0);
        m.multiply(&Matrix3::rotate(0.0, 0.0, PI / 2.0));
        let mut p = Vec3::new(1.0, 0.0, 0.0);
        m.transform_coord(&mut p);
        assert!((p - Vec3::new(1.0, 3.0, 3.0)).length() < 1e-4);

        let inv = m.get_inverse().unwrap();
        inv.transform_coord(&mut p);
        assert!((p - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-4);

        assert!(Matrix3::scale(1.0, 0.0, 1.0).get_inverse().is_none());

        let flat = m.to_matrix();
        assert!(close(flat.transform_point(Point::new(1.0, 0.0)), Point::new(1.0, 3.0)));
    }
}
