use crate::core::clipper::FrustumPlanes;
use crate::core::error::CanvasError;
use crate::core::math::transform::{TransformFactory, apply_perspective_division};
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use serde::Deserialize;

/// Full range of the 16-bit depth buffer. NDC z = -1 maps to 0, z = 1 to this value.
pub const DEPTH_RANGE: f32 = u16::MAX as f32;

/// The named matrices of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixId {
    #[default]
    ModelView,
    Projection,
    Viewport,
    /// Transpose of the inverse model-view; derived, see [`MatrixStack::recompute_normal_matrix`].
    Normal,
    Texture,
}

impl MatrixId {
    #[inline]
    fn slot(self) -> usize {
        match self {
            MatrixId::ModelView => 0,
            MatrixId::Projection => 1,
            MatrixId::Viewport => 2,
            MatrixId::Normal => 3,
            MatrixId::Texture => 4,
        }
    }
}

/// Fixed set of named 4x4 transforms, mutated in place by stack-style operations
/// on the active matrix.
///
/// There is no push/pop; callers snapshot a matrix with [`get`](Self::get) and
/// put it back with [`set`](Self::set).
#[derive(Debug, Clone)]
pub struct MatrixStack {
    matrices: [Matrix4<f32>; 5],
    active: MatrixId,
}

impl MatrixStack {
    /// All matrices identity except the viewport, which covers `width` x `height` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        let mut stack = Self {
            matrices: [Matrix4::identity(); 5],
            active: MatrixId::ModelView,
        };
        stack.compute_viewport(0, 0, width as i32, height as i32);
        stack
    }

    pub fn active(&self) -> MatrixId {
        self.active
    }

    /// Selects which matrix subsequent operations mutate.
    pub fn set_active(&mut self, id: MatrixId) {
        self.active = id;
    }

    #[inline]
    pub fn get(&self, id: MatrixId) -> &Matrix4<f32> {
        &self.matrices[id.slot()]
    }

    /// Replaces a matrix wholesale (restoring a snapshot, for instance).
    pub fn set(&mut self, id: MatrixId, matrix: Matrix4<f32>) {
        self.matrices[id.slot()] = matrix;
    }

    #[inline]
    fn active_mut(&mut self) -> &mut Matrix4<f32> {
        &mut self.matrices[self.active.slot()]
    }

    fn post_multiply(&mut self, m: Matrix4<f32>) {
        let active = self.active_mut();
        *active *= m;
    }

    fn pre_multiply(&mut self, m: Matrix4<f32>) {
        let active = self.active_mut();
        *active = m * *active;
    }

    pub fn load_identity(&mut self) {
        *self.active_mut() = Matrix4::identity();
    }

    /// Right-multiplies a rotation of `angle` radians about `axis`.
    pub fn rotate(&mut self, angle: f32, axis: &Vector3<f32>) {
        self.post_multiply(TransformFactory::rotation(axis, angle));
    }

    pub fn translate(&mut self, offset: &Vector3<f32>) {
        self.post_multiply(TransformFactory::translation(offset));
    }

    pub fn scale(&mut self, factors: &Vector3<f32>) {
        self.post_multiply(TransformFactory::scaling(factors));
    }

    /// Left-multiplies a perspective projection. Load identity first to replace instead.
    pub fn perspective(&mut self, fov_y_rad: f32, aspect: f32, near: f32, far: f32) {
        self.pre_multiply(TransformFactory::perspective(fov_y_rad, aspect, near, far));
    }

    pub fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.pre_multiply(TransformFactory::frustum(left, right, bottom, top, near, far));
    }

    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.pre_multiply(TransformFactory::orthographic(left, right, bottom, top, near, far));
    }

    pub fn look_at(&mut self, eye: &Point3<f32>, at: &Point3<f32>, up: &Vector3<f32>) {
        self.pre_multiply(TransformFactory::look_at(eye, at, up));
    }

    /// Rebuilds the viewport matrix for the given pixel bounds.
    pub fn compute_viewport(&mut self, left: i32, bottom: i32, right: i32, top: i32) {
        let vp = TransformFactory::viewport(
            left as f32,
            bottom as f32,
            right as f32,
            top as f32,
            DEPTH_RANGE,
        );
        self.set(MatrixId::Viewport, vp);
    }

    /// Sets the normal matrix to transpose(inverse(model-view)).
    ///
    /// Must run after every model-view change and before any shading that reads it.
    pub fn recompute_normal_matrix(&mut self) -> Result<(), CanvasError> {
        let inverse = self
            .get(MatrixId::ModelView)
            .try_inverse()
            .ok_or(CanvasError::SingularModelView)?;
        self.set(MatrixId::Normal, inverse.transpose());
        Ok(())
    }

    /// Projection x model-view.
    pub fn model_view_projection(&self) -> Matrix4<f32> {
        self.get(MatrixId::Projection) * self.get(MatrixId::ModelView)
    }

    /// The six clip planes in object space for the current projection and model-view.
    pub fn frustum_planes(&self) -> FrustumPlanes {
        FrustumPlanes::from_matrix(&self.model_view_projection())
    }

    /// Clip space to window coordinates: perspective divide, then viewport.
    #[inline]
    pub fn to_window(&self, clip: &Vector4<f32>) -> Vector3<f32> {
        let ndc = apply_perspective_division(clip);
        (self.get(MatrixId::Viewport) * ndc.to_homogeneous()).xyz()
    }

    /// Object space to window coordinates through the full matrix set.
    pub fn project(&self, point: &Point3<f32>) -> Vector3<f32> {
        self.to_window(&(self.model_view_projection() * point.to_homogeneous()))
    }

    /// Window coordinates back to object space; inverse of [`project`](Self::project).
    pub fn unproject(&self, window: &Vector3<f32>) -> Result<Point3<f32>, CanvasError> {
        let inv_viewport = self
            .get(MatrixId::Viewport)
            .try_inverse()
            .ok_or(CanvasError::SingularProjection)?;
        let inv_mvp = self
            .model_view_projection()
            .try_inverse()
            .ok_or(CanvasError::SingularProjection)?;
        let ndc = inv_viewport * window.push(1.0);
        let object = inv_mvp * Vector4::new(ndc.x, ndc.y, ndc.z, 1.0);
        Point3::from_homogeneous(object).ok_or(CanvasError::SingularProjection)
    }

    /// NDC of a pixel center (buffer convention, row 0 at the bottom) on the far plane.
    ///
    /// Unprojecting the result gives the far end of the pick ray through that pixel.
    pub fn pixel_to_ndc(&self, x: i32, y: i32) -> Result<Vector3<f32>, CanvasError> {
        let inv_viewport = self
            .get(MatrixId::Viewport)
            .try_inverse()
            .ok_or(CanvasError::SingularProjection)?;
        let ndc = inv_viewport * Vector4::new(x as f32 + 0.5, y as f32 + 0.5, 0.0, 1.0);
        Ok(Vector3::new(ndc.x, ndc.y, 1.0))
    }
}
