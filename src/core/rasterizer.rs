use crate::core::framebuffer::{DEPTH_CLEAR, FrameBuffer};
use crate::core::geometry::ScreenVertex;
use crate::core::math::interpolation::{average2, average3, lerp, progress};
use crate::core::math::matrix_stack::DEPTH_RANGE;
use crate::core::pipeline::{Interpolatable, ShadingModel};
use nalgebra::Vector3;
use serde::Deserialize;

/// How triangles are drawn.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolygonMode {
    Point,
    Line,
    #[default]
    Fill,
}

/// Which screen-space winding is discarded. Front faces are counter-clockwise.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
pub enum CullMode {
    #[serde(rename = "disabled", alias = "none")]
    None,
    #[default]
    #[serde(rename = "backface", alias = "back")]
    Back,
    #[serde(rename = "frontface", alias = "front")]
    Front,
}

impl CullMode {
    /// Whether a primitive whose screen-space face normal has this z survives.
    #[inline]
    pub fn keeps(self, normal_z: f32) -> bool {
        match self {
            CullMode::None => true,
            CullMode::Back => normal_z >= 0.0,
            CullMode::Front => normal_z <= 0.0,
        }
    }
}

/// Screen-space face normal of a triangle given in window coordinates.
/// Positive z for counter-clockwise winding.
#[inline]
pub fn face_normal(a: &Vector3<f32>, b: &Vector3<f32>, c: &Vector3<f32>) -> Vector3<f32> {
    (b - a).cross(&(c - a))
}

/// Window-space depth to depth-buffer units, clamped to the 16-bit range.
/// NaN maps to the clear value and so never passes the depth test.
#[inline]
fn depth_value(z: f32) -> u16 {
    if z.is_nan() {
        return DEPTH_CLEAR;
    }
    z.clamp(0.0, DEPTH_RANGE) as u16
}

/// Incremental (Bresenham) walk along one edge between two integer pixels.
///
/// Every [`advance`](Self::advance) moves one pixel along the major axis and
/// possibly one along the minor axis, as the error term dictates.
#[derive(Debug, Clone)]
struct EdgeWalker {
    pos: [i32; 2],
    start: [i32; 2],
    end: [i32; 2],
    step: [i32; 2],
    delta: [i32; 2],
    major: usize,
    error: i32,
}

impl EdgeWalker {
    fn new(start: [i32; 2], end: [i32; 2]) -> Self {
        let dx = end[0] - start[0];
        let dy = end[1] - start[1];
        let major = usize::from(dy.abs() > dx.abs());
        let delta = [dx.abs(), dy.abs()];
        Self {
            pos: start,
            start,
            end,
            step: [dx.signum(), dy.signum()],
            delta,
            major,
            error: 2 * delta[1 - major] - delta[major],
        }
    }

    /// Zero-length edge: the walk has nowhere to go.
    #[inline]
    fn is_degenerate(&self) -> bool {
        self.step[self.major] == 0
    }

    #[inline]
    fn finished(&self) -> bool {
        let s = self.step[self.major];
        s * self.pos[self.major] >= s * self.end[self.major]
    }

    #[inline]
    fn advance(&mut self) {
        let (major, minor) = (self.major, 1 - self.major);
        if self.error > 0 {
            self.pos[minor] += self.step[minor];
            self.error += 2 * (self.delta[minor] - self.delta[major]);
        } else {
            self.error += 2 * self.delta[minor];
        }
        self.pos[major] += self.step[major];
    }

    /// Parametric progress along the edge, measured on the major axis.
    #[inline]
    fn t(&self) -> f32 {
        progress(self.start[self.major], self.end[self.major], self.pos[self.major])
    }
}

/// Converts projected primitives into pixels.
///
/// Fragment shading is injected as a closure and runs only inside [`plot`](Self::plot),
/// after the depth test passed.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    pub polygon_mode: PolygonMode,
    pub cull_mode: CullMode,
    pub shading_model: ShadingModel,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            polygon_mode: PolygonMode::Fill,
            cull_mode: CullMode::Back,
            shading_model: ShadingModel::None,
        }
    }

    #[inline]
    fn is_flat(&self) -> bool {
        self.shading_model == ShadingModel::Flat
    }

    /// Bounds check, depth test, fragment shading and color write for one pixel.
    ///
    /// Returns whether the pixel was written.
    #[inline]
    pub fn plot<V, F>(
        &self,
        framebuffer: &mut FrameBuffer,
        x: i32,
        y: i32,
        z: f32,
        varying: &V,
        shade: &mut F,
    ) -> bool
    where
        F: FnMut(&V) -> Vector3<f32>,
    {
        if !framebuffer.depth_test_and_update(x, y, depth_value(z)) {
            return false;
        }
        let color = shade(varying);
        framebuffer.set_pixel(x, y, color);
        true
    }

    pub fn plot_point<V, F>(&self, framebuffer: &mut FrameBuffer, v: &ScreenVertex<V>, shade: &mut F)
    where
        V: Interpolatable,
        F: FnMut(&V) -> Vector3<f32>,
    {
        let [x, y] = v.pixel();
        self.plot(framebuffer, x, y, v.position.z, &v.varying, shade);
    }

    /// Bresenham line including both endpoints.
    ///
    /// Depth and varying are interpolated by progress along the major axis; under
    /// flat shading the whole segment uses the average of its two endpoints.
    pub fn plot_line<V, F>(
        &self,
        framebuffer: &mut FrameBuffer,
        a: &ScreenVertex<V>,
        b: &ScreenVertex<V>,
        shade: &mut F,
    ) where
        V: Interpolatable,
        F: FnMut(&V) -> Vector3<f32>,
    {
        let (va, vb) = if self.is_flat() {
            let avg = average2(a.varying, b.varying);
            (avg, avg)
        } else {
            (a.varying, b.varying)
        };

        let start = a.pixel();
        let end = b.pixel();
        self.plot(framebuffer, start[0], start[1], a.position.z, &va, shade);

        let mut walker = EdgeWalker::new(start, end);
        if walker.is_degenerate() {
            return;
        }

        let dz = b.position.z - a.position.z;
        loop {
            walker.advance();
            if walker.finished() {
                break;
            }
            let t = walker.t();
            let varying = if self.is_flat() { va } else { lerp(va, vb, t) };
            let z = a.position.z + dz * t;
            self.plot(framebuffer, walker.pos[0], walker.pos[1], z, &varying, shade);
        }

        self.plot(framebuffer, end[0], end[1], b.position.z, &vb, shade);
    }

    /// Fills the part of a triangle reachable by walking from `v1` toward `v2` and `v3`.
    ///
    /// Two Bresenham walks leave the pivot `v1`; the second is kept on the same column
    /// as the first, and each matched pair of endpoints is joined by a vertical span.
    /// Vertices must be sorted by x so both walks travel in the same x direction.
    fn plot_half_triangle<V, F>(
        &self,
        framebuffer: &mut FrameBuffer,
        v1: &ScreenVertex<V>,
        v2: &ScreenVertex<V>,
        v3: &ScreenVertex<V>,
        shade: &mut F,
    ) where
        V: Interpolatable,
        F: FnMut(&V) -> Vector3<f32>,
    {
        let flat = self.is_flat();
        let s1 = v1.pixel();
        self.plot(framebuffer, s1[0], s1[1], v1.position.z, &v1.varying, shade);

        let mut e12 = EdgeWalker::new(s1, v2.pixel());
        let mut e13 = EdgeWalker::new(s1, v3.pixel());
        if e12.is_degenerate() || e13.is_degenerate() {
            return;
        }

        let dz12 = v2.position.z - v1.position.z;
        let dz13 = v3.position.z - v1.position.z;

        while !e12.finished() && !e13.finished() {
            e12.advance();
            while e13.pos[0] != e12.pos[0] && !e13.finished() {
                e13.advance();
            }

            let (t12, t13) = (e12.t(), e13.t());
            let mut a = (e12.pos, v1.position.z + dz12 * t12);
            let mut b = (e13.pos, v1.position.z + dz13 * t13);
            let (mut var_a, mut var_b) = if flat {
                (v1.varying, v1.varying)
            } else {
                (
                    lerp(v1.varying, v2.varying, t12),
                    lerp(v1.varying, v3.varying, t13),
                )
            };

            if a.0[1] > b.0[1] {
                std::mem::swap(&mut a, &mut b);
                std::mem::swap(&mut var_a, &mut var_b);
            }

            let x = a.0[0];
            for y in a.0[1]..=b.0[1] {
                let t = progress(a.0[1], b.0[1], y);
                let z = a.1 + (b.1 - a.1) * t;
                let varying = if flat { var_a } else { lerp(var_a, var_b, t) };
                self.plot(framebuffer, x, y, z, &varying, shade);
            }
            if b.0[0] != x {
                self.plot(framebuffer, b.0[0], b.0[1], b.1, &var_b, shade);
            }
        }
    }

    /// Draws a triangle according to the polygon mode.
    ///
    /// Fill mode draws the three edges first, so shared boundaries have no gaps,
    /// then fills two halves pivoting on the lowest-x and highest-x vertices.
    /// Ties on x are broken by y.
    pub fn plot_triangle<V, F>(
        &self,
        framebuffer: &mut FrameBuffer,
        v1: &ScreenVertex<V>,
        v2: &ScreenVertex<V>,
        v3: &ScreenVertex<V>,
        shade: &mut F,
    ) where
        V: Interpolatable,
        F: FnMut(&V) -> Vector3<f32>,
    {
        let mut verts = [*v1, *v2, *v3];
        if self.is_flat() {
            let avg = average3(v1.varying, v2.varying, v3.varying);
            for v in &mut verts {
                v.varying = avg;
            }
        }

        match self.polygon_mode {
            PolygonMode::Point => {
                for v in &verts {
                    self.plot_point(framebuffer, v, shade);
                }
            }
            PolygonMode::Line => {
                self.plot_line(framebuffer, &verts[0], &verts[1], shade);
                self.plot_line(framebuffer, &verts[1], &verts[2], shade);
                self.plot_line(framebuffer, &verts[2], &verts[0], shade);
            }
            PolygonMode::Fill => {
                self.plot_line(framebuffer, &verts[0], &verts[1], shade);
                self.plot_line(framebuffer, &verts[1], &verts[2], shade);
                self.plot_line(framebuffer, &verts[2], &verts[0], shade);

                verts.sort_by(|p, q| {
                    p.position
                        .x
                        .total_cmp(&q.position.x)
                        .then_with(|| p.position.y.total_cmp(&q.position.y))
                });

                let [a, b, c] = verts;
                self.plot_half_triangle(framebuffer, &a, &b, &c, shade);
                self.plot_half_triangle(framebuffer, &c, &a, &b, shade);
            }
        }
    }
}
