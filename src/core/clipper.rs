//! Clipping of object-space primitives against the six view-frustum planes.
//!
//! The planes are extracted from projection x model-view, so clipping happens
//! before shading and synthesized vertices carry interpolated attributes into
//! the vertex stage like any authored vertex.

use crate::core::geometry::Vertex;
use crate::core::math::transform::homogenize;
use nalgebra::{Matrix4, Vector4};

/// Parametric nudge applied to synthesized triangle vertices, toward the inside
/// endpoint of the clipped edge.
pub const CLIP_EPSILON: f32 = 1e-3;

/// Left, right, bottom, top, near, far. A homogeneous point `p` is inside a plane
/// when `dot(p, plane) >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumPlanes(pub [Vector4<f32>; 6]);

impl FrustumPlanes {
    /// Gribb/Hartmann extraction: `row3 + row0`, `row3 - row0`, `row3 + row1`, ...
    pub fn from_matrix(m: &Matrix4<f32>) -> Self {
        let w = m.row(3).transpose();
        let mut planes = [Vector4::zeros(); 6];
        for (i, plane) in planes.iter_mut().enumerate() {
            let row = m.row(i / 2).transpose();
            *plane = if i % 2 == 0 { w + row } else { w - row };
        }
        Self(planes)
    }

    /// Signed distances of a vertex position to all six planes.
    #[inline]
    pub fn distances(&self, vertex: &Vertex) -> [f32; 6] {
        let p = homogenize(&vertex.position);
        self.0.map(|plane| plane.dot(&p))
    }

    #[inline]
    pub fn contains(&self, vertex: &Vertex) -> bool {
        self.distances(vertex).iter().all(|&d| d >= 0.0)
    }
}

/// A vertex travelling through the clipper, remembering which input index it came from.
///
/// `source` is `None` for vertices synthesized on a plane; those are never
/// deduplicated and always get shaded fresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    pub vertex: Vertex,
    pub source: Option<usize>,
}

impl ClipVertex {
    pub fn indexed(vertex: Vertex, index: usize) -> Self {
        Self {
            vertex,
            source: Some(index),
        }
    }

    pub fn synthesized(vertex: Vertex) -> Self {
        Self {
            vertex,
            source: None,
        }
    }
}

/// Points are kept only when inside every plane; nothing is interpolated.
pub fn clip_point(planes: &FrustumPlanes, point: &Vertex) -> bool {
    planes.contains(point)
}

/// Shortens a segment to the part inside the frustum.
///
/// Each crossed plane replaces the outside endpoint with the exact intersection at
/// `t = -d0 / (d1 - d0)`. Returns `None` when the segment lies fully outside any plane.
pub fn clip_line(
    planes: &FrustumPlanes,
    a: ClipVertex,
    b: ClipVertex,
) -> Option<(ClipVertex, ClipVertex)> {
    let (mut a, mut b) = (a, b);
    for plane in &planes.0 {
        let d0 = plane.dot(&homogenize(&a.vertex.position));
        let d1 = plane.dot(&homogenize(&b.vertex.position));

        match (d0 >= 0.0, d1 >= 0.0) {
            (true, true) => {}
            (false, false) => return None,
            (true, false) => {
                let t = -d0 / (d1 - d0);
                b = ClipVertex::synthesized(a.vertex.lerp(&b.vertex, t));
            }
            (false, true) => {
                let t = -d0 / (d1 - d0);
                a = ClipVertex::synthesized(a.vertex.lerp(&b.vertex, t));
            }
        }
    }
    Some((a, b))
}

/// Sutherland–Hodgman clipping of a triangle against all six planes.
///
/// The result is a convex polygon (empty when fewer than three vertices survive).
/// `scratch` is reused between planes to avoid per-plane allocation.
pub fn clip_triangle(
    planes: &FrustumPlanes,
    triangle: [ClipVertex; 3],
    scratch: &mut Vec<ClipVertex>,
) -> Vec<ClipVertex> {
    let mut polygon: Vec<ClipVertex> = Vec::with_capacity(9);
    polygon.extend_from_slice(&triangle);

    for plane in &planes.0 {
        if polygon.len() < 3 {
            break;
        }
        clip_polygon_against_plane(&polygon, scratch, plane);
        std::mem::swap(&mut polygon, scratch);
    }

    if polygon.len() < 3 {
        polygon.clear();
    }
    polygon
}

/// One Sutherland–Hodgman stage. `output` is cleared before writing.
fn clip_polygon_against_plane(input: &[ClipVertex], output: &mut Vec<ClipVertex>, plane: &Vector4<f32>) {
    output.clear();

    let Some(&last) = input.last() else {
        return;
    };

    let mut prev = last;
    let mut d_prev = plane.dot(&homogenize(&prev.vertex.position));

    for &curr in input {
        let d_curr = plane.dot(&homogenize(&curr.vertex.position));

        match (d_prev >= 0.0, d_curr >= 0.0) {
            // IN -> IN
            (true, true) => output.push(curr),
            // IN -> OUT: intersection only, nudged back toward prev
            (true, false) => {
                let t = (-d_prev / (d_curr - d_prev) - CLIP_EPSILON).clamp(0.0, 1.0);
                output.push(ClipVertex::synthesized(prev.vertex.lerp(&curr.vertex, t)));
            }
            // OUT -> IN: intersection nudged toward curr, then curr
            (false, true) => {
                let t = (-d_prev / (d_curr - d_prev) + CLIP_EPSILON).clamp(0.0, 1.0);
                output.push(ClipVertex::synthesized(prev.vertex.lerp(&curr.vertex, t)));
                output.push(curr);
            }
            // OUT -> OUT
            (false, false) => {}
        }

        prev = curr;
        d_prev = d_curr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_planes() -> FrustumPlanes {
        FrustumPlanes::from_matrix(&Matrix4::identity())
    }

    #[test]
    fn identity_planes_describe_the_ndc_cube() {
        let planes = identity_planes();
        assert!(planes.contains(&Vertex::at(0.0, 0.0, 0.0)));
        assert!(planes.contains(&Vertex::at(1.0, -1.0, 1.0)));
        assert!(!planes.contains(&Vertex::at(1.5, 0.0, 0.0)));
        assert!(!planes.contains(&Vertex::at(0.0, 0.0, -1.01)));
    }

    #[test]
    fn points_outside_are_dropped() {
        let planes = identity_planes();
        assert!(clip_point(&planes, &Vertex::at(0.2, 0.2, 0.2)));
        assert!(!clip_point(&planes, &Vertex::at(0.2, 3.0, 0.2)));
    }

    #[test]
    fn line_fully_outside_one_plane_is_discarded() {
        let planes = identity_planes();
        let a = ClipVertex::indexed(Vertex::at(2.0, -0.5, 0.0), 0);
        let b = ClipVertex::indexed(Vertex::at(3.0, 0.5, 0.0), 1);
        assert!(clip_line(&planes, a, b).is_none());
    }

    #[test]
    fn line_crossing_right_plane_is_shortened_and_marked() {
        let planes = identity_planes();
        let mut v = Vertex::at(3.0, 0.0, 0.0);
        v.texcoord.x = 1.0;
        let a = ClipVertex::indexed(Vertex::at(-0.5, 0.0, 0.0), 0);
        let b = ClipVertex::indexed(v, 1);
        let (ca, cb) = clip_line(&planes, a, b).unwrap();
        assert_eq!(ca, a);
        assert_eq!(cb.source, None);
        assert!((cb.vertex.position.x - 1.0).abs() < 1e-6);
        // t = 1.5 / 3.5 along the segment
        assert!((cb.vertex.texcoord.x - 1.5 / 3.5).abs() < 1e-6);
    }

    #[test]
    fn triangle_inside_is_unchanged() {
        let planes = identity_planes();
        let tri = [
            ClipVertex::indexed(Vertex::at(-0.5, -0.5, 0.0), 0),
            ClipVertex::indexed(Vertex::at(0.5, -0.5, 0.0), 1),
            ClipVertex::indexed(Vertex::at(0.0, 0.5, 0.0), 2),
        ];
        let out = clip_triangle(&planes, tri, &mut Vec::new());
        assert_eq!(out, tri.to_vec());
    }

    #[test]
    fn triangle_with_one_corner_outside_becomes_quad() {
        let planes = identity_planes();
        let tri = [
            ClipVertex::indexed(Vertex::at(-0.5, -0.5, 0.0), 0),
            ClipVertex::indexed(Vertex::at(2.0, -0.5, 0.0), 1),
            ClipVertex::indexed(Vertex::at(-0.5, 0.5, 0.0), 2),
        ];
        let out = clip_triangle(&planes, tri, &mut Vec::new());
        assert_eq!(out.len(), 4);
        assert_eq!(out.iter().filter(|v| v.source.is_none()).count(), 2);
        for v in &out {
            assert!(v.vertex.position.x <= 1.0, "{:?}", v);
        }
    }

    #[test]
    fn synthesized_triangle_vertices_land_strictly_inside() {
        let planes = identity_planes();
        let tri = [
            ClipVertex::indexed(Vertex::at(-0.5, -0.5, 0.0), 0),
            ClipVertex::indexed(Vertex::at(2.0, -0.5, 0.0), 1),
            ClipVertex::indexed(Vertex::at(-0.5, 0.5, 0.0), 2),
        ];
        let out = clip_triangle(&planes, tri, &mut Vec::new());
        for v in out.iter().filter(|v| v.source.is_none()) {
            assert!(planes.distances(&v.vertex).iter().all(|&d| d > 0.0), "{:?}", v);
            // Right plane hit at x = 1, nudged back toward the inside corner.
            assert!(v.vertex.position.x < 1.0 && v.vertex.position.x > 0.99, "{:?}", v);
        }
    }

    #[test]
    fn triangle_fully_outside_yields_nothing() {
        let planes = identity_planes();
        let tri = [
            ClipVertex::indexed(Vertex::at(2.0, 2.0, 0.0), 0),
            ClipVertex::indexed(Vertex::at(3.0, 2.0, 0.0), 1),
            ClipVertex::indexed(Vertex::at(2.0, 3.0, 0.0), 2),
        ];
        assert!(clip_triangle(&planes, tri, &mut Vec::new()).is_empty());
    }
}
