use glam::{Affine3A, Mat3, Mat4, Vec3};

/// Maps local geometry (contour plane at z = 0) into the output space.
pub trait Transform {
    fn transform_point(&self, point: Vec3) -> Vec3;

    /// Maps a direction and returns it normalized (zero if degenerate).
    fn transform_normal(&self, normal: Vec3) -> Vec3;
}

impl Transform for Mat4 {
    #[inline]
    fn transform_point(&self, point: Vec3) -> Vec3 {
        self.project_point3(point)
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        (Mat3::from_mat4(*self).inverse().transpose() * normal).normalize_or_zero()
    }
}

impl Transform for Affine3A {
    #[inline]
    fn transform_point(&self, point: Vec3) -> Vec3 {
        self.transform_point3(point)
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        (self.matrix3.inverse().transpose() * normal).normalize_or_zero()
    }
}

impl<T: Transform + ?Sized> Transform for &T {
    #[inline]
    fn transform_point(&self, point: Vec3) -> Vec3 {
        (**self).transform_point(point)
    }

    #[inline]
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        (**self).transform_normal(normal)
    }
}
