use crate::core::pipeline::Interpolatable;
use crate::scene::light::Light;
use nalgebra::{Vector2, Vector3};
use std::ops::{Add, Mul};

/// Constant reflectance terms of a lit surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceCoefficients {
    pub emission: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
}

impl Default for SurfaceCoefficients {
    fn default() -> Self {
        Self {
            emission: Vector3::zeros(),
            ambient: Vector3::repeat(0.1),
            diffuse: Vector3::repeat(1.0),
            specular: Vector3::repeat(1.0),
            shininess: 1.0,
        }
    }
}

impl SurfaceCoefficients {
    pub fn with_diffuse(diffuse: Vector3<f32>) -> Self {
        Self {
            diffuse,
            ..Self::default()
        }
    }
}

/// Sums every light at one eye-space point and clamps the result to `[0, 1]`.
///
/// `emission + ambient * sum(a) + diffuse * sum(d) + specular * sum(s)`
pub fn illuminate(
    lights: &[Light],
    surface: &SurfaceCoefficients,
    eye_position: &Vector3<f32>,
    eye_normal: &Vector3<f32>,
) -> Vector3<f32> {
    let mut ambient = Vector3::zeros();
    let mut diffuse = Vector3::zeros();
    let mut specular = Vector3::zeros();
    for light in lights {
        let c = light.shade(eye_position, eye_normal, surface.shininess);
        ambient += c.ambient;
        diffuse += c.diffuse;
        specular += c.specular;
    }

    let color = surface.emission
        + surface.ambient.component_mul(&ambient)
        + surface.diffuse.component_mul(&diffuse)
        + surface.specular.component_mul(&specular);
    color.map(|c| c.clamp(0.0, 1.0))
}

/// Varying of the lit materials. Its layout follows the shading model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadedVarying {
    /// Color resolved in the vertex stage (none, flat, gouraud).
    Lit {
        color: Vector3<f32>,
        texcoord: Vector2<f32>,
    },
    /// Eye-space geometry for per-pixel lighting (phong).
    Deferred {
        position: Vector3<f32>,
        normal: Vector3<f32>,
        texcoord: Vector2<f32>,
    },
}

impl ShadedVarying {
    pub fn texcoord(&self) -> &Vector2<f32> {
        match self {
            ShadedVarying::Lit { texcoord, .. } | ShadedVarying::Deferred { texcoord, .. } => texcoord,
        }
    }
}

impl Add for ShadedVarying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        match (self, other) {
            (
                ShadedVarying::Lit { color: c0, texcoord: t0 },
                ShadedVarying::Lit { color: c1, texcoord: t1 },
            ) => ShadedVarying::Lit {
                color: c0 + c1,
                texcoord: t0 + t1,
            },
            (
                ShadedVarying::Deferred {
                    position: p0,
                    normal: n0,
                    texcoord: t0,
                },
                ShadedVarying::Deferred {
                    position: p1,
                    normal: n1,
                    texcoord: t1,
                },
            ) => ShadedVarying::Deferred {
                position: p0 + p1,
                normal: n0 + n1,
                texcoord: t0 + t1,
            },
            // One draw call uses one shading model, so the layouts always agree.
            (lhs, _) => {
                debug_assert!(false, "mixed varying layouts in one primitive");
                lhs
            }
        }
    }
}

impl Mul<f32> for ShadedVarying {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        match self {
            ShadedVarying::Lit { color, texcoord } => ShadedVarying::Lit {
                color: color * s,
                texcoord: texcoord * s,
            },
            ShadedVarying::Deferred {
                position,
                normal,
                texcoord,
            } => ShadedVarying::Deferred {
                position: position * s,
                normal: normal * s,
                texcoord: texcoord * s,
            },
        }
    }
}

impl Interpolatable for ShadedVarying {}
