use crate::scene::object::Placement;
use nalgebra::{Matrix4, Vector3, Vector4};

/// Inverse-quadratic distance falloff `1 / (k0 + k1 d + k2 d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.14,
            quadratic: 0.7,
        }
    }
}

impl Attenuation {
    #[inline]
    pub fn factor(&self, distance: f32) -> f32 {
        let denom = self.constant + self.linear * distance + self.quadratic * distance * distance;
        if denom > f32::EPSILON { 1.0 / denom } else { 1.0 }
    }
}

/// Variant-specific parameters of a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Infinitely far away; rays are parallel to its local -z axis.
    Directional,
    /// Radiates in all directions from its local origin.
    Point { attenuation: Attenuation },
    /// A point light restricted to a cone around its local -z axis.
    Spot {
        attenuation: Attenuation,
        /// Cosine threshold on the angle between the light axis and the ray.
        cutoff: f32,
        exponent: f32,
    },
}

/// Ambient, diffuse and specular terms a light adds at one surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl Contribution {
    pub fn zero() -> Self {
        Self {
            ambient: Vector3::zeros(),
            diffuse: Vector3::zeros(),
            specular: Vector3::zeros(),
        }
    }
}

/// A light source in the scene.
///
/// The constant parameters are set at construction. The eye-space position and
/// direction are derived once per frame by [`Light::update`] from the model-view
/// in effect after the light's own placement was applied.
#[derive(Debug, Clone)]
pub struct Light {
    pub kind: LightKind,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    /// Where the light sits in the world, applied on top of the view transform.
    pub placement: Placement,
    eye_position: Vector3<f32>,
    eye_direction: Vector3<f32>,
}

impl Light {
    fn with_kind(kind: LightKind, placement: Placement) -> Self {
        Self {
            kind,
            ambient: Vector3::repeat(0.1),
            diffuse: Vector3::repeat(0.5),
            specular: Vector3::repeat(1.0),
            placement,
            eye_position: placement.position.coords,
            eye_direction: -Vector3::z(),
        }
    }

    pub fn new_directional(placement: Placement) -> Self {
        Self::with_kind(LightKind::Directional, placement)
    }

    pub fn new_point(placement: Placement) -> Self {
        Self::with_kind(
            LightKind::Point {
                attenuation: Attenuation::default(),
            },
            placement,
        )
    }

    pub fn new_spot(placement: Placement) -> Self {
        Self::with_kind(
            LightKind::Spot {
                attenuation: Attenuation::default(),
                cutoff: 0.5,
                exponent: 1.0,
            },
            placement,
        )
    }

    /// Builder-style override of the three color terms.
    pub fn with_colors(mut self, ambient: Vector3<f32>, diffuse: Vector3<f32>, specular: Vector3<f32>) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    pub fn eye_position(&self) -> &Vector3<f32> {
        &self.eye_position
    }

    pub fn eye_direction(&self) -> &Vector3<f32> {
        &self.eye_direction
    }

    /// Recomputes the eye-space position and direction from `model_view`.
    ///
    /// Directional lights only use its rotation part; point lights transform the
    /// local origin; spot lights need both.
    pub fn update(&mut self, model_view: &Matrix4<f32>) {
        let rotate_axis = |m: &Matrix4<f32>| {
            let d = m.fixed_view::<3, 3>(0, 0) * -Vector3::z();
            d.try_normalize(1e-12).unwrap_or(-Vector3::z())
        };
        let origin = |m: &Matrix4<f32>| (m * Vector4::new(0.0, 0.0, 0.0, 1.0)).xyz();

        match self.kind {
            LightKind::Directional => self.eye_direction = rotate_axis(model_view),
            LightKind::Point { .. } => self.eye_position = origin(model_view),
            LightKind::Spot { .. } => {
                self.eye_direction = rotate_axis(model_view);
                self.eye_position = origin(model_view);
            }
        }
    }

    /// Blinn-Phong contribution at eye-space `vertex` with unit `normal`.
    pub fn shade(&self, vertex: &Vector3<f32>, normal: &Vector3<f32>, shininess: f32) -> Contribution {
        let (to_light, attenuation) = match self.kind {
            LightKind::Directional => (-self.eye_direction, 1.0),
            LightKind::Point { attenuation } => {
                let offset = self.eye_position - vertex;
                let distance = offset.norm();
                (offset.try_normalize(1e-12).unwrap_or(*normal), attenuation.factor(distance))
            }
            LightKind::Spot {
                attenuation,
                cutoff,
                exponent,
            } => {
                let offset = self.eye_position - vertex;
                let distance = offset.norm();
                let l = offset.try_normalize(1e-12).unwrap_or(*normal);
                let alignment = (-l).dot(&self.eye_direction);
                if alignment <= cutoff {
                    return Contribution::zero();
                }
                (l, attenuation.factor(distance) * alignment.powf(exponent))
            }
        };

        let n_dot_l = normal.dot(&to_light).max(0.0);
        let specular = if n_dot_l > 0.0 {
            let to_eye = (-vertex).try_normalize(1e-12).unwrap_or(Vector3::z());
            let half = (to_light + to_eye).try_normalize(1e-12).unwrap_or(*normal);
            normal.dot(&half).max(0.0).powf(shininess)
        } else {
            0.0
        };

        Contribution {
            ambient: self.ambient * attenuation,
            diffuse: self.diffuse * (n_dot_l * attenuation),
            specular: self.specular * (specular * attenuation),
        }
    }
}
