use crate::core::geometry::Vertex;
use crate::core::pipeline::{Shader, ShadingContext};
use nalgebra::{Vector3, Vector4};

/// One constant color, never lit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformShader {
    pub color: Vector3<f32>,
}

impl UniformShader {
    pub fn new(color: Vector3<f32>) -> Self {
        Self { color }
    }
}

impl Default for UniformShader {
    fn default() -> Self {
        Self::new(Vector3::repeat(1.0))
    }
}

impl Shader for UniformShader {
    type Varying = Vector3<f32>;

    fn shade_vertex(&self, ctx: &ShadingContext<'_>, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        let eye = ctx.eye_position(&vertex.position);
        (ctx.project(&eye), self.color)
    }

    fn shade_fragment(&self, _ctx: &ShadingContext<'_>, varying: &Self::Varying) -> Vector3<f32> {
        *varying
    }
}
