use crate::core::geometry::Vertex;
use crate::core::pipeline::{Shader, ShadingContext};
use crate::pipeline::shaders::lighting::{ShadedVarying, SurfaceCoefficients};
use crate::pipeline::shaders::solid::{lit_fragment, lit_vertex};
use crate::scene::texture::Texture;
use nalgebra::{Vector3, Vector4};
use std::sync::Arc;

/// Lit material modulated by a texture sampled through the texture matrix.
#[derive(Debug, Clone)]
pub struct TexturedShader {
    pub surface: SurfaceCoefficients,
    pub texture: Arc<Texture>,
}

impl TexturedShader {
    pub fn new(surface: SurfaceCoefficients, texture: Arc<Texture>) -> Self {
        Self { surface, texture }
    }
}

impl Shader for TexturedShader {
    type Varying = ShadedVarying;

    fn shade_vertex(&self, ctx: &ShadingContext<'_>, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        lit_vertex(ctx, &self.surface, vertex, ctx.texcoord(&vertex.texcoord))
    }

    fn shade_fragment(&self, ctx: &ShadingContext<'_>, varying: &Self::Varying) -> Vector3<f32> {
        let uv = varying.texcoord();
        let texel = self.texture.sample(uv.x, uv.y);
        lit_fragment(ctx, &self.surface, varying).component_mul(&texel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::matrix_stack::{MatrixId, MatrixStack};
    use crate::core::pipeline::ShadingModel;
    use nalgebra::Vector2;

    #[test]
    fn texcoords_pass_through_the_texture_matrix() {
        let mut stack = MatrixStack::new(8, 8);
        stack.set_active(MatrixId::Texture);
        stack.translate(&Vector3::new(0.25, 0.5, 0.0));
        let ctx = ShadingContext::new(&stack, &[], ShadingModel::None);

        let shader = TexturedShader::new(SurfaceCoefficients::default(), Arc::new(Texture::checker(2, 1)));
        let mut vertex = Vertex::at(0.0, 0.0, -1.0);
        vertex.texcoord = Vector2::new(0.5, 0.25);
        let (_, varying) = shader.shade_vertex(&ctx, &vertex);
        assert!((varying.texcoord() - Vector2::new(0.75, 0.75)).norm() < 1e-6);
    }
}
