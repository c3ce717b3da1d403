use crate::core::math::matrix_stack::{MatrixId, MatrixStack};
use crate::core::math::transform::TransformFactory;
use nalgebra::{Point3, Vector3, Vector4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionType {
    Perspective { fov_y_rad: f32, aspect_ratio: f32 },
    Frustum { left: f32, right: f32, bottom: f32, top: f32 },
    Orthographic { left: f32, right: f32, bottom: f32, top: f32 },
}

impl ProjectionType {
    pub fn perspective() -> Self {
        Self::Perspective {
            fov_y_rad: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 1.0,
        }
    }

    pub fn frustum() -> Self {
        Self::Frustum {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
        }
    }

    pub fn orthographic() -> Self {
        Self::Orthographic {
            left: -10.0,
            right: 10.0,
            bottom: -10.0,
            top: 10.0,
        }
    }
}

/// Loads the projection and view matrices into a [`MatrixStack`].
///
/// Without a focus the camera is a free transform (position + Euler orientation).
/// With a focus it orbits that point at `radius`, its orientation rotating the
/// offset and the up vector.
#[derive(Debug, Clone)]
pub struct Camera {
    pub projection: ProjectionType,
    pub near: f32,
    pub far: f32,
    pub position: Point3<f32>,
    pub orientation: Vector3<f32>,
    pub focus: Option<Point3<f32>>,
    pub radius: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(ProjectionType::perspective())
    }
}

impl Camera {
    pub fn new(projection: ProjectionType) -> Self {
        Self {
            projection,
            near: 2.0,
            far: 101.0,
            position: Point3::origin(),
            orientation: Vector3::zeros(),
            focus: Some(Point3::origin()),
            radius: 10.0,
        }
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Point3<f32> {
        match self.focus {
            Some(focus) => focus + self.rotate(&Vector3::new(0.0, 0.0, self.radius)),
            None => self.position,
        }
    }

    fn rotate(&self, v: &Vector3<f32>) -> Vector3<f32> {
        let o = &self.orientation;
        let m = TransformFactory::rotation(&Vector3::x(), o.x)
            * TransformFactory::rotation(&Vector3::y(), o.y)
            * TransformFactory::rotation(&Vector3::z(), o.z);
        (m * Vector4::new(v.x, v.y, v.z, 0.0)).xyz()
    }

    /// Replaces the projection matrix. Leaves the model-view matrix active.
    pub fn project(&self, stack: &mut MatrixStack) {
        stack.set_active(MatrixId::Projection);
        stack.load_identity();
        match self.projection {
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            } => stack.perspective(fov_y_rad, aspect_ratio, self.near, self.far),
            ProjectionType::Frustum {
                left,
                right,
                bottom,
                top,
            } => stack.frustum(left, right, bottom, top, self.near, self.far),
            ProjectionType::Orthographic {
                left,
                right,
                bottom,
                top,
            } => stack.ortho(left, right, bottom, top, self.near, self.far),
        }
        stack.set_active(MatrixId::ModelView);
    }

    /// Replaces the model-view matrix with the view transform.
    pub fn view(&self, stack: &mut MatrixStack) {
        stack.set_active(MatrixId::ModelView);
        stack.load_identity();
        match self.focus {
            None => {
                stack.rotate(-self.orientation.x, &Vector3::x());
                stack.rotate(-self.orientation.y, &Vector3::y());
                stack.rotate(-self.orientation.z, &Vector3::z());
                stack.translate(&-self.position.coords);
            }
            Some(focus) => {
                let up = self.rotate(&Vector3::y());
                stack.look_at(&self.eye(), &focus, &up);
            }
        }
    }
}
