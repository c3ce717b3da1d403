use crate::core::clipper::{ClipVertex, clip_line, clip_point, clip_triangle};
use crate::core::error::CanvasError;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::{ScreenVertex, Vertex};
use crate::core::math::matrix_stack::{MatrixId, MatrixStack};
use crate::core::pipeline::{Shader, ShadingContext, ShadingModel};
use crate::core::rasterizer::{CullMode, PolygonMode, Rasterizer, face_normal};
use crate::scene::light::Light;
use log::{debug, warn};
use std::fmt;
use std::ops::AddAssign;

/// Work counters of one or more draw calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Vertex-stage invocations (unique indexed vertices plus synthesized ones).
    pub vertices_shaded: usize,
    /// Primitives submitted.
    pub primitives_in: usize,
    /// Submitted primitives that survived clipping and culling. A clipped triangle
    /// counts once even when drawn as a fan of several triangles.
    pub primitives_out: usize,
    /// Fragment-stage invocations, i.e. pixels that passed the depth test.
    pub fragments_shaded: usize,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, other: Self) {
        self.vertices_shaded += other.vertices_shaded;
        self.primitives_in += other.primitives_in;
        self.primitives_out += other.primitives_out;
        self.fragments_shaded += other.fragments_shaded;
    }
}

impl fmt::Display for DrawStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices shaded, {} of {} primitives drawn, {} fragments",
            self.vertices_shaded, self.primitives_out, self.primitives_in, self.fragments_shaded
        )
    }
}

/// Shaded, projected vertices of one draw call.
///
/// Indexed vertices are shaded at most once; synthesized clip vertices always
/// get a fresh slot.
struct VertexCache<V> {
    index_map: Vec<Option<usize>>,
    processed: Vec<ScreenVertex<V>>,
}

impl<V> VertexCache<V> {
    fn new(vertex_count: usize) -> Self {
        Self {
            index_map: vec![None; vertex_count],
            processed: Vec::new(),
        }
    }

    fn resolve<S>(&mut self, shader: &S, ctx: &ShadingContext<'_>, clip_vertex: &ClipVertex) -> usize
    where
        S: Shader<Varying = V>,
    {
        if let Some(slot) = clip_vertex.source.and_then(|i| self.index_map[i]) {
            return slot;
        }
        let (clip, varying) = shader.shade_vertex(ctx, &clip_vertex.vertex);
        let window = ctx.matrices.to_window(&clip);
        let slot = self.processed.len();
        self.processed.push(ScreenVertex::new(window, varying));
        if let Some(i) = clip_vertex.source {
            self.index_map[i] = Some(slot);
        }
        slot
    }

    fn shaded(&self) -> usize {
        self.processed.len()
    }
}

fn validate_indices(indices: &[u32], len: usize) -> Result<(), CanvasError> {
    match indices.iter().find(|&&i| i as usize >= len) {
        Some(&index) => Err(CanvasError::IndexOutOfRange { index, len }),
        None => Ok(()),
    }
}

/// The software canvas: matrix set, rasterizer state and the pixel buffers.
///
/// Every draw call runs to completion (clip, shade, rasterize, plot) before it
/// returns; the buffers are stable for read-back in between.
pub struct Canvas {
    pub matrices: MatrixStack,
    pub rasterizer: Rasterizer,
    framebuffer: FrameBuffer,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        Ok(Self {
            matrices: MatrixStack::new(width, height),
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height)?,
        })
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width()
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height()
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// Reallocates both buffers (contents are lost) and recomputes the viewport.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), CanvasError> {
        self.framebuffer.resize(width, height)?;
        self.matrices.compute_viewport(0, 0, width as i32, height as i32);
        Ok(())
    }

    pub fn clear_color(&mut self) {
        self.framebuffer.clear_color();
    }

    pub fn clear_depth(&mut self) {
        self.framebuffer.clear_depth();
    }

    pub fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.rasterizer.polygon_mode = mode;
    }

    pub fn set_shading_model(&mut self, model: ShadingModel) {
        self.rasterizer.shading_model = model;
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.rasterizer.cull_mode = mode;
    }

    pub fn set_active_matrix(&mut self, id: MatrixId) {
        self.matrices.set_active(id);
    }

    /// Draws every vertex inside the frustum as a single pixel.
    pub fn draw_points<S: Shader>(
        &mut self,
        shader: &S,
        lights: &[Light],
        vertices: &[Vertex],
    ) -> Result<DrawStats, CanvasError> {
        self.matrices.recompute_normal_matrix()?;
        let planes = self.matrices.frustum_planes();
        let ctx = ShadingContext::new(&self.matrices, lights, self.rasterizer.shading_model);

        let mut stats = DrawStats {
            primitives_in: vertices.len(),
            ..DrawStats::default()
        };
        let mut cache = VertexCache::new(vertices.len());
        let mut visible = Vec::new();
        for (i, vertex) in vertices.iter().enumerate() {
            if clip_point(&planes, vertex) {
                visible.push(cache.resolve(shader, &ctx, &ClipVertex::indexed(*vertex, i)));
            }
        }
        stats.primitives_out = visible.len();
        stats.vertices_shaded = cache.shaded();

        let rasterizer = self.rasterizer;
        let mut fragments = 0;
        let mut shade = |v: &S::Varying| {
            fragments += 1;
            shader.shade_fragment(&ctx, v)
        };
        for slot in visible {
            rasterizer.plot_point(&mut self.framebuffer, &cache.processed[slot], &mut shade);
        }
        stats.fragments_shaded = fragments;

        debug!("draw_points: {}", stats);
        Ok(stats)
    }

    /// Draws segments given as index pairs into `vertices`.
    pub fn draw_lines<S: Shader>(
        &mut self,
        shader: &S,
        lights: &[Light],
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<DrawStats, CanvasError> {
        validate_indices(indices, vertices.len())?;
        self.matrices.recompute_normal_matrix()?;
        let planes = self.matrices.frustum_planes();
        let ctx = ShadingContext::new(&self.matrices, lights, self.rasterizer.shading_model);

        let segments = indices.chunks_exact(2);
        if !segments.remainder().is_empty() {
            warn!("draw_lines: ignoring {} trailing index", segments.remainder().len());
        }

        let mut stats = DrawStats::default();
        let mut cache = VertexCache::new(vertices.len());
        let mut visible = Vec::new();
        for pair in segments {
            stats.primitives_in += 1;
            let [a, b] = [pair[0] as usize, pair[1] as usize];
            let Some((a, b)) = clip_line(
                &planes,
                ClipVertex::indexed(vertices[a], a),
                ClipVertex::indexed(vertices[b], b),
            ) else {
                continue;
            };
            visible.push((cache.resolve(shader, &ctx, &a), cache.resolve(shader, &ctx, &b)));
        }
        stats.primitives_out = visible.len();
        stats.vertices_shaded = cache.shaded();

        let rasterizer = self.rasterizer;
        let mut fragments = 0;
        let mut shade = |v: &S::Varying| {
            fragments += 1;
            shader.shade_fragment(&ctx, v)
        };
        for (a, b) in visible {
            let p = &cache.processed;
            rasterizer.plot_line(&mut self.framebuffer, &p[a], &p[b], &mut shade);
        }
        stats.fragments_shaded = fragments;

        debug!("draw_lines: {}", stats);
        Ok(stats)
    }

    /// Draws triangles given as index triples into `vertices`.
    ///
    /// Clipped polygons are split into a fan around their first vertex; culling
    /// tests each fan triangle's winding in window space.
    pub fn draw_triangles<S: Shader>(
        &mut self,
        shader: &S,
        lights: &[Light],
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<DrawStats, CanvasError> {
        validate_indices(indices, vertices.len())?;
        self.matrices.recompute_normal_matrix()?;
        let planes = self.matrices.frustum_planes();
        let ctx = ShadingContext::new(&self.matrices, lights, self.rasterizer.shading_model);
        let rasterizer = self.rasterizer;

        let triangles = indices.chunks_exact(3);
        if !triangles.remainder().is_empty() {
            warn!(
                "draw_triangles: ignoring {} trailing indices",
                triangles.remainder().len()
            );
        }

        let mut stats = DrawStats::default();
        let mut cache = VertexCache::new(vertices.len());
        let mut scratch = Vec::with_capacity(9);
        let mut visible = Vec::new();
        for tri in triangles {
            stats.primitives_in += 1;
            let input = [0, 1, 2].map(|k| {
                let i = tri[k] as usize;
                ClipVertex::indexed(vertices[i], i)
            });
            let polygon = clip_triangle(&planes, input, &mut scratch);
            if polygon.is_empty() {
                continue;
            }

            let slots: Vec<usize> = polygon.iter().map(|cv| cache.resolve(shader, &ctx, cv)).collect();
            let drawn = visible.len();
            for k in 1..slots.len() - 1 {
                let fan = [slots[0], slots[k], slots[k + 1]];
                let p = &cache.processed;
                let normal = face_normal(&p[fan[0]].position, &p[fan[1]].position, &p[fan[2]].position);
                if rasterizer.cull_mode.keeps(normal.z) {
                    visible.push(fan);
                }
            }
            if visible.len() > drawn {
                stats.primitives_out += 1;
            }
        }
        stats.vertices_shaded = cache.shaded();

        let mut fragments = 0;
        let mut shade = |v: &S::Varying| {
            fragments += 1;
            shader.shade_fragment(&ctx, v)
        };
        for [a, b, c] in visible {
            let p = &cache.processed;
            rasterizer.plot_triangle(&mut self.framebuffer, &p[a], &p[b], &p[c], &mut shade);
        }
        stats.fragments_shaded = fragments;

        debug!("draw_triangles: {}", stats);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::shaders::uniform::UniformShader;
    use nalgebra::Vector3;

    #[test]
    fn out_of_range_index_fails_fast() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        let verts = [Vertex::at(0.0, 0.0, 0.0)];
        let err = canvas
            .draw_triangles(&UniformShader::default(), &[], &verts, &[0, 0, 1])
            .unwrap_err();
        assert_eq!(err, CanvasError::IndexOutOfRange { index: 1, len: 1 });
        assert_eq!(canvas.framebuffer().covered_pixels(), 0);
    }

    #[test]
    fn singular_model_view_is_reported() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.matrices.scale(&Vector3::new(0.0, 1.0, 1.0));
        let err = canvas
            .draw_points(&UniformShader::default(), &[], &[Vertex::at(0.0, 0.0, 0.0)])
            .unwrap_err();
        assert_eq!(err, CanvasError::SingularModelView);
    }

    #[test]
    fn resize_reallocates_and_moves_the_viewport() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.resize(10, 6).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (10, 6));
        let w = canvas.matrices.project(&nalgebra::Point3::origin());
        assert!((w.x - 5.0).abs() < 1e-5 && (w.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn trailing_indices_are_ignored() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        let verts = [Vertex::at(-0.5, -0.5, 0.0), Vertex::at(0.5, -0.5, 0.0), Vertex::at(0.0, 0.5, 0.0)];
        let stats = canvas
            .draw_triangles(&UniformShader::default(), &[], &verts, &[0, 1, 2, 0])
            .unwrap();
        assert_eq!(stats.primitives_in, 1);
        assert_eq!(stats.primitives_out, 1);
    }

    #[test]
    fn clipped_triangle_counts_once() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        canvas.set_cull_mode(CullMode::None);
        // Two corners poke out through the right and top planes.
        let verts = [Vertex::at(-0.5, -0.5, 0.0), Vertex::at(3.0, -0.5, 0.0), Vertex::at(-0.5, 3.0, 0.0)];
        let stats = canvas
            .draw_triangles(&UniformShader::default(), &[], &verts, &[0, 1, 2])
            .unwrap();
        assert_eq!(stats.primitives_in, 1);
        assert_eq!(stats.primitives_out, 1);
        assert!(stats.vertices_shaded > 3);
        assert!(stats.to_string().contains("1 of 1 primitives drawn"));
    }

    #[test]
    fn stats_accumulate() {
        let mut total = DrawStats::default();
        total += DrawStats {
            vertices_shaded: 3,
            primitives_in: 1,
            primitives_out: 1,
            fragments_shaded: 10,
        };
        total += DrawStats {
            vertices_shaded: 2,
            ..DrawStats::default()
        };
        assert_eq!(total.vertices_shaded, 5);
        assert_eq!(total.fragments_shaded, 10);
    }
}
