use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the 4x4 matrices the canvas composes onto its matrix stack.
/// Right-handed, OpenGL conventions: eye space looks down -Z, NDC is [-1, 1]^3.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Rotation about an arbitrary axis (Rodrigues):
    /// R = uu^T + cos(a) (I - uu^T) + sin(a) [u]x, with u the normalized axis.
    pub fn rotation(axis: &Vector3<f32>, angle_rad: f32) -> Matrix4<f32> {
        let u = axis.normalize();
        let uut: Matrix3<f32> = u * u.transpose();
        let r = uut
            + (Matrix3::identity() - uut) * angle_rad.cos()
            + u.cross_matrix() * angle_rad.sin();
        r.to_homogeneous()
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Look-at view matrix: world space to eye space.
    pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        // In RHS, camera looks down -Z
        let z_axis = (eye - target).normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis);

        let rotation = Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, 0.0,
            y_axis.x, y_axis.y, y_axis.z, 0.0,
            z_axis.x, z_axis.y, z_axis.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        );

        rotation * Self::translation(&-eye.coords)
    }

    /// Symmetric perspective projection. `fov_y_rad` is the full vertical field of view.
    pub fn perspective(fov_y_rad: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let f = 1.0 / (fov_y_rad / 2.0).tan();
        let nf = 1.0 / (near - far);

        Matrix4::new(
            f / aspect_ratio, 0.0, 0.0,               0.0,
            0.0,              f,   0.0,               0.0,
            0.0,              0.0, (far + near) * nf, 2.0 * far * near * nf,
            0.0,              0.0, -1.0,              0.0,
        )
    }

    /// General (possibly off-axis) perspective frustum.
    pub fn frustum(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (near - far);

        Matrix4::new(
            2.0 * near * rl, 0.0,             (right + left) * rl, 0.0,
            0.0,             2.0 * near * tb, (top + bottom) * tb, 0.0,
            0.0,             0.0,             (far + near) * nf,   2.0 * far * near * nf,
            0.0,             0.0,             -1.0,                0.0,
        )
    }

    /// Orthographic projection.
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (near - far);

        Matrix4::new(
            2.0 * rl, 0.0,      0.0,      -(right + left) * rl,
            0.0,      2.0 * tb, 0.0,      -(top + bottom) * tb,
            0.0,      0.0,      2.0 * nf, (far + near) * nf,
            0.0,      0.0,      0.0,      1.0,
        )
    }

    /// Viewport matrix mapping NDC onto the pixel rectangle and NDC z onto `[0, depth_range]`.
    pub fn viewport(left: f32, bottom: f32, right: f32, top: f32, depth_range: f32) -> Matrix4<f32> {
        Matrix4::new(
            (right - left) / 2.0, 0.0,                  0.0,               (right + left) / 2.0,
            0.0,                  (top - bottom) / 2.0, 0.0,               (top + bottom) / 2.0,
            0.0,                  0.0,                  depth_range / 2.0, depth_range / 2.0,
            0.0,                  0.0,                  0.0,               1.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division: Clip Space -> NDC.
/// A vanishing `w` yields the origin rather than infinities.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        Point3::new(clip.x / w, clip.y / w, clip.z / w)
    } else {
        Point3::origin()
    }
}

/// Lifts a point into homogeneous coordinates (w = 1).
#[inline]
pub fn homogenize(p: &Point3<f32>) -> Vector4<f32> {
    p.to_homogeneous()
}
