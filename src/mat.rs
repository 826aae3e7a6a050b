//! 4x4 affine transforms used to drive anchor particles.

use crate::float::Float;
use crate::vec::Vec3;
use core::ops::Mul;

/// Column-major 4x4 matrix.
///
/// Only the affine part matters to the cloth: points are transformed as
/// `M * (p, 1)` and the resulting `w` is dropped, the same convention a
/// scene graph uses when it hands a node's world transform to its children.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mat4<F: Float> {
    pub cols: [[F; 4]; 4],
}

impl<F: Float> Mat4<F> {
    pub fn identity() -> Self {
        let (o, z) = (F::one(), F::zero());
        Mat4 {
            cols: [
                [o, z, z, z],
                [z, o, z, z],
                [z, z, o, z],
                [z, z, z, o],
            ],
        }
    }

    /// Build from 16 values in column-major order.
    pub fn from_cols_array(m: [F; 16]) -> Self {
        Mat4 {
            cols: [
                [m[0], m[1], m[2], m[3]],
                [m[4], m[5], m[6], m[7]],
                [m[8], m[9], m[10], m[11]],
                [m[12], m[13], m[14], m[15]],
            ],
        }
    }

    pub fn from_translation(t: Vec3<F>) -> Self {
        let mut m = Self::identity();
        m.cols[3] = [t.x, t.y, t.z, F::one()];
        m
    }

    pub fn from_scale(s: Vec3<F>) -> Self {
        let mut m = Self::identity();
        m.cols[0][0] = s.x;
        m.cols[1][1] = s.y;
        m.cols[2][2] = s.z;
        m
    }

    /// Right-handed rotation about +Y by `angle` radians.
    pub fn from_rotation_y(angle: F) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let mut m = Self::identity();
        m.cols[0] = [c, F::zero(), -s, F::zero()];
        m.cols[2] = [s, F::zero(), c, F::zero()];
        m
    }

    /// Right-handed rotation about +Z by `angle` radians.
    pub fn from_rotation_z(angle: F) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let mut m = Self::identity();
        m.cols[0] = [c, s, F::zero(), F::zero()];
        m.cols[1] = [-s, c, F::zero(), F::zero()];
        m
    }

    pub fn transform_point(&self, p: Vec3<F>) -> Vec3<F> {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        )
    }
}

impl<F: Float> Default for Mat4<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> Mul for Mat4<F> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [[F::zero(); 4]; 4];
        for (col, out_col) in out.iter_mut().enumerate() {
            for (row, cell) in out_col.iter_mut().enumerate() {
                let mut acc = F::zero();
                for k in 0..4 {
                    acc = acc + self.cols[k][row] * rhs.cols[col][k];
                }
                *cell = acc;
            }
        }
        Mat4 { cols: out }
    }
}

#[cfg(feature = "glam")]
impl From<glam::Mat4> for Mat4<f32> {
    fn from(m: glam::Mat4) -> Self {
        Mat4::from_cols_array(m.to_cols_array())
    }
}

#[cfg(feature = "glam")]
impl From<glam::DMat4> for Mat4<f64> {
    fn from(m: glam::DMat4) -> Self {
        Mat4::from_cols_array(m.to_cols_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3<f32>, b: Vec3<f32>) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5
    }

    #[test]
    fn identity_leaves_points_alone() {
        let p = Vec3::new(1.0f32, -2.0, 3.5);
        assert_eq!(Mat4::identity().transform_point(p), p);
    }

    #[test]
    fn translation_then_rotation_composes_right_to_left() {
        let t = Mat4::from_translation(Vec3::new(1.0f32, 0.0, 0.0));
        let r = Mat4::from_rotation_z(core::f32::consts::FRAC_PI_2);
        // rotate first, then translate
        let p = (t * r).transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(close(p, Vec3::new(1.0, 1.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn rotation_y_maps_x_to_negative_z() {
        let r = Mat4::from_rotation_y(core::f32::consts::FRAC_PI_2);
        let p = r.transform_point(Vec3::new(1.0f32, 0.0, 0.0));
        assert!(close(p, Vec3::new(0.0, 0.0, -1.0)), "got {:?}", p);
    }
}
