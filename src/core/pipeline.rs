use crate::core::geometry::Vertex;
use crate::core::math::matrix_stack::{MatrixId, MatrixStack};
use crate::scene::light::Light;
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use serde::Deserialize;
use std::ops::{Add, Mul};

/// Trait for fixed-layout records that can be linearly interpolated across a primitive.
///
/// - Copy: varyings are stored per processed vertex and handed out by value.
/// - Add + Mul<f32>: linear combinations `a * (1 - t) + b * t` along edges and spans.
pub trait Interpolatable: Copy + Add<Output = Self> + Mul<f32, Output = Self> {}

impl Interpolatable for f32 {}
impl Interpolatable for Vector2<f32> {}
impl Interpolatable for Vector3<f32> {}
impl Interpolatable for Vector4<f32> {}

/// When lighting is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingModel {
    /// Never: materials emit their unlit color.
    #[default]
    None,
    /// Once per primitive: per-vertex lighting, averaged over the primitive.
    Flat,
    /// Once per vertex, interpolated across the primitive.
    Gouraud,
    /// Once per pixel from interpolated eye-space position and normal.
    Phong,
}

impl ShadingModel {
    /// True when lighting is evaluated in the vertex stage.
    pub fn lights_per_vertex(self) -> bool {
        matches!(self, ShadingModel::Flat | ShadingModel::Gouraud)
    }
}

/// Everything a shader may read during one draw call.
///
/// Passed explicitly into both shading stages; shaders never reach into shared state.
#[derive(Clone, Copy)]
pub struct ShadingContext<'a> {
    pub matrices: &'a MatrixStack,
    pub lights: &'a [Light],
    pub shading_model: ShadingModel,
}

impl<'a> ShadingContext<'a> {
    pub fn new(matrices: &'a MatrixStack, lights: &'a [Light], shading_model: ShadingModel) -> Self {
        Self {
            matrices,
            lights,
            shading_model,
        }
    }

    /// Object-space position to eye space.
    #[inline]
    pub fn eye_position(&self, position: &Point3<f32>) -> Vector3<f32> {
        let p = self.matrices.get(MatrixId::ModelView) * position.to_homogeneous();
        p.xyz()
    }

    /// Object-space normal to eye space through the normal matrix.
    /// Only valid after the normal matrix was recomputed for the current model-view.
    #[inline]
    pub fn eye_normal(&self, normal: &Vector3<f32>) -> Vector3<f32> {
        let n = self.matrices.get(MatrixId::Normal).fixed_view::<3, 3>(0, 0) * normal;
        n.try_normalize(1e-12).unwrap_or(n)
    }

    /// Eye-space position to clip space.
    #[inline]
    pub fn project(&self, eye: &Vector3<f32>) -> Vector4<f32> {
        self.matrices.get(MatrixId::Projection) * eye.push(1.0)
    }

    /// Texture coordinate through the texture matrix.
    #[inline]
    pub fn texcoord(&self, texcoord: &Vector2<f32>) -> Vector2<f32> {
        let t = self.matrices.get(MatrixId::Texture) * Vector4::new(texcoord.x, texcoord.y, 0.0, 1.0);
        Vector2::new(t.x, t.y)
    }
}

/// The programmable stages of the pipeline (the material contract).
///
/// A shader is selected per draw call; `Varying` fixes the layout shared by its
/// vertex and fragment stages.
pub trait Shader {
    /// Per-vertex outputs interpolated by the rasterizer.
    type Varying: Interpolatable;

    /// Vertex stage: object-space vertex to clip space plus the varying payload.
    ///
    /// The canvas performs the perspective divide and viewport transform on the
    /// returned clip position.
    fn shade_vertex(&self, ctx: &ShadingContext<'_>, vertex: &Vertex) -> (Vector4<f32>, Self::Varying);

    /// Fragment stage: interpolated varying to an RGB color in `[0, 1]`.
    fn shade_fragment(&self, ctx: &ShadingContext<'_>, varying: &Self::Varying) -> Vector3<f32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_flat_and_gouraud_light_vertices() {
        assert!(ShadingModel::Flat.lights_per_vertex());
        assert!(ShadingModel::Gouraud.lights_per_vertex());
        assert!(!ShadingModel::Phong.lights_per_vertex());
        assert!(!ShadingModel::None.lights_per_vertex());
    }

    #[test]
    fn texture_matrix_moves_texcoords() {
        let mut stack = MatrixStack::new(4, 4);
        stack.set_active(MatrixId::Texture);
        stack.translate(&Vector3::new(0.5, 0.25, 0.0));
        assert_eq!(stack.active(), MatrixId::Texture);
        let ctx = ShadingContext::new(&stack, &[], ShadingModel::None);
        assert!((ctx.texcoord(&Vector2::new(0.0, 0.0)) - Vector2::new(0.5, 0.25)).norm() < 1e-6);
    }
}
