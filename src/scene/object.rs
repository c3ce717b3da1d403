use crate::core::geometry::Vertex;
use crate::core::math::matrix_stack::MatrixStack;
use crate::scene::material::Material;
use nalgebra::{Point3, Vector2, Vector3};
use std::collections::HashMap;

/// Material key used by generated geometry.
pub const DEFAULT_MATERIAL_KEY: &str = "default";

/// Position, Euler orientation (radians about x, y, z) and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point3<f32>,
    pub orientation: Vector3<f32>,
    pub scale: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: Vector3::zeros(),
            scale: 1.0,
        }
    }
}

impl Placement {
    pub fn at(position: Point3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Post-multiplies `T * Rx * Ry * Rz * S` onto the active matrix.
    pub fn apply(&self, stack: &mut MatrixStack) {
        stack.translate(&self.position.coords);
        stack.rotate(self.orientation.x, &Vector3::x());
        stack.rotate(self.orientation.y, &Vector3::y());
        stack.rotate(self.orientation.z, &Vector3::z());
        stack.scale(&Vector3::repeat(self.scale));
    }
}

/// A named group of triangles drawn with one material.
#[derive(Debug, Clone)]
pub struct RigidBatch {
    pub name: String,
    /// Key into the owning object's material map.
    pub material: String,
    pub indices: Vec<u32>,
}

impl RigidBatch {
    pub fn new(name: impl Into<String>, material: impl Into<String>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            material: material.into(),
            indices,
        }
    }
}

/// Axis-aligned bounds in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn from_points<'a>(mut points: impl Iterator<Item = &'a Point3<f32>>) -> Option<Self> {
        let first = points.next()?;
        let mut bounds = Self {
            min: *first,
            max: *first,
        };
        for p in points {
            bounds.min = bounds.min.inf(p);
            bounds.max = bounds.max.sup(p);
        }
        Some(bounds)
    }

    /// The 12 box edges as a line list.
    pub fn wireframe(&self) -> (Vec<Vertex>, Vec<u32>) {
        let (lo, hi) = (self.min, self.max);
        let vertices = (0..8)
            .map(|i| {
                let x = if i & 1 == 0 { lo.x } else { hi.x };
                let y = if i & 2 == 0 { lo.y } else { hi.y };
                let z = if i & 4 == 0 { lo.z } else { hi.z };
                Vertex::at(x, y, z)
            })
            .collect();
        #[rustfmt::skip]
        let indices = vec![
            0, 1,  2, 3,  4, 5,  6, 7,
            0, 2,  1, 3,  4, 6,  5, 7,
            0, 4,  1, 5,  2, 6,  3, 7,
        ];
        (vertices, indices)
    }
}

/// Geometry shared by several rigid batches, plus the materials they refer to.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub batches: Vec<RigidBatch>,
    pub materials: HashMap<String, Material>,
    pub placement: Placement,
    pub show_bounds: bool,
    pub show_normals: bool,
}

impl Object {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, batches: Vec<RigidBatch>) -> Self {
        Self {
            name: name.into(),
            vertices,
            batches,
            materials: HashMap::new(),
            placement: Placement::default(),
            show_bounds: false,
            show_normals: false,
        }
    }

    pub fn with_material(mut self, key: impl Into<String>, material: Material) -> Self {
        self.materials.insert(key.into(), material);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Total number of triangles over all batches.
    pub fn triangle_count(&self) -> usize {
        self.batches.iter().map(|b| b.indices.len() / 3).sum()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.vertices.iter().map(|v| &v.position))
    }

    /// One segment per vertex along its normal, as a line list.
    pub fn normal_lines(&self, length: f32) -> (Vec<Vertex>, Vec<u32>) {
        let mut vertices = Vec::with_capacity(self.vertices.len() * 2);
        let mut indices = Vec::with_capacity(self.vertices.len() * 2);
        for v in &self.vertices {
            let tip = v.position + v.normal * length;
            let base = vertices.len() as u32;
            vertices.push(Vertex::new(v.position, v.normal, Vector2::zeros()));
            vertices.push(Vertex::new(tip, v.normal, Vector2::zeros()));
            indices.extend_from_slice(&[base, base + 1]);
        }
        (vertices, indices)
    }
}
