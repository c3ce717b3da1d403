use crate::core::geometry::Vertex;
use crate::core::pipeline::{Shader, ShadingContext, ShadingModel};
use crate::pipeline::shaders::lighting::{illuminate, ShadedVarying, SurfaceCoefficients};
use nalgebra::{Vector2, Vector3, Vector4};

/// Lit material with constant coefficients.
///
/// Flat and gouraud evaluate the lights per vertex and carry a color; phong carries
/// eye-space position and normal and lights every fragment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolidShader {
    pub surface: SurfaceCoefficients,
}

impl SolidShader {
    pub fn new(surface: SurfaceCoefficients) -> Self {
        Self { surface }
    }
}

/// Shared vertex stage of the lit materials.
pub(crate) fn lit_vertex(
    ctx: &ShadingContext<'_>,
    surface: &SurfaceCoefficients,
    vertex: &Vertex,
    texcoord: Vector2<f32>,
) -> (Vector4<f32>, ShadedVarying) {
    let eye = ctx.eye_position(&vertex.position);
    let clip = ctx.project(&eye);
    let varying = if ctx.shading_model.lights_per_vertex() {
        ShadedVarying::Lit {
            color: illuminate(ctx.lights, surface, &eye, &ctx.eye_normal(&vertex.normal)),
            texcoord,
        }
    } else if ctx.shading_model == ShadingModel::Phong {
        ShadedVarying::Deferred {
            position: eye,
            normal: ctx.eye_normal(&vertex.normal),
            texcoord,
        }
    } else {
        ShadedVarying::Lit {
            color: surface.diffuse,
            texcoord,
        }
    };
    (clip, varying)
}

/// Shared fragment stage of the lit materials.
pub(crate) fn lit_fragment(
    ctx: &ShadingContext<'_>,
    surface: &SurfaceCoefficients,
    varying: &ShadedVarying,
) -> Vector3<f32> {
    match varying {
        ShadedVarying::Lit { color, .. } => *color,
        ShadedVarying::Deferred { position, normal, .. } => {
            // Interpolated normals shrink between vertices.
            let n = normal.try_normalize(1e-12).unwrap_or(*normal);
            illuminate(ctx.lights, surface, position, &n)
        }
    }
}

impl Shader for SolidShader {
    type Varying = ShadedVarying;

    fn shade_vertex(&self, ctx: &ShadingContext<'_>, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        lit_vertex(ctx, &self.surface, vertex, vertex.texcoord)
    }

    fn shade_fragment(&self, ctx: &ShadingContext<'_>, varying: &Self::Varying) -> Vector3<f32> {
        lit_fragment(ctx, &self.surface, varying)
    }
}
