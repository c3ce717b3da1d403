use crate::pipeline::shaders::lighting::SurfaceCoefficients;
use crate::pipeline::shaders::normal::NormalShader;
use crate::pipeline::shaders::solid::SolidShader;
use crate::pipeline::shaders::textured::TexturedShader;
use crate::pipeline::shaders::uniform::UniformShader;
use crate::scene::texture::Texture;
use nalgebra::Vector3;
use std::sync::Arc;

/// Defines how a rigid batch is shaded. Each variant owns the shader it draws with.
#[derive(Debug, Clone)]
pub enum Material {
    /// Constant color, unaffected by lights.
    Uniform(UniformShader),
    /// Lit with constant coefficients.
    Solid(SolidShader),
    /// Lit and modulated by a texture.
    Textured(TexturedShader),
    /// Eye-space normals as colors.
    Normal(NormalShader),
}

impl Default for Material {
    fn default() -> Self {
        Material::Uniform(UniformShader::default())
    }
}

impl Material {
    pub fn uniform(color: Vector3<f32>) -> Self {
        Material::Uniform(UniformShader::new(color))
    }

    pub fn solid(surface: SurfaceCoefficients) -> Self {
        Material::Solid(SolidShader::new(surface))
    }

    pub fn textured(surface: SurfaceCoefficients, texture: Arc<Texture>) -> Self {
        Material::Textured(TexturedShader::new(surface, texture))
    }

    /// Lit brick texture.
    pub fn brick() -> Self {
        Self::textured(SurfaceCoefficients::default(), Arc::new(Texture::brick(64, 64)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Material::Uniform(_) => "uniform",
            Material::Solid(_) => "solid",
            Material::Textured(_) => "textured",
            Material::Normal(_) => "normal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_material_is_white_uniform() {
        let material = Material::default();
        assert_eq!(material.kind(), "uniform");
        match material {
            Material::Uniform(shader) => assert_eq!(shader.color, Vector3::repeat(1.0)),
            other => panic!("unexpected {}", other.kind()),
        }
    }

    #[test]
    fn constructors_pick_their_variant() {
        assert_eq!(Material::solid(SurfaceCoefficients::default()).kind(), "solid");
        assert_eq!(Material::brick().kind(), "textured");
        assert_eq!(Material::Normal(NormalShader).kind(), "normal");
    }
}
