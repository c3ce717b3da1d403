use crate::core::geometry::Vertex;
use crate::core::pipeline::{Shader, ShadingContext};
use nalgebra::{Vector3, Vector4};

/// Visualizes eye-space normals as colors. Useful for debugging geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalShader;

impl Shader for NormalShader {
    type Varying = Vector3<f32>;

    fn shade_vertex(&self, ctx: &ShadingContext<'_>, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        let eye = ctx.eye_position(&vertex.position);
        (ctx.project(&eye), ctx.eye_normal(&vertex.normal))
    }

    fn shade_fragment(&self, _ctx: &ShadingContext<'_>, varying: &Self::Varying) -> Vector3<f32> {
        // [-1, 1] -> [0, 1]
        (varying.try_normalize(1e-12).unwrap_or(*varying) + Vector3::repeat(1.0)) * 0.5
    }
}
