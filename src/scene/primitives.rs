//! Procedural geometry. Every face winds counter-clockwise seen from outside.

use crate::core::geometry::Vertex;
use crate::scene::object::{Object, RigidBatch, DEFAULT_MATERIAL_KEY};
use nalgebra::{Point3, Vector2, Vector3};
use std::f32::consts::PI;

/// Appends one quad centered at `center` spanning `±u`, `±v`, facing `u x v`.
fn push_quad(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    center: Vector3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
) {
    let normal = u.cross(&v).normalize();
    let base = vertices.len() as u32;
    for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let p = center + u * su + v * sv;
        let uv = Vector2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5);
        vertices.push(Vertex::new(Point3::from(p), normal, uv));
    }
    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Axis-aligned cube spanning `[-1, 1]` on every axis, four vertices per face.
pub fn cube() -> Object {
    #[rustfmt::skip]
    let faces: [(Vector3<f32>, Vector3<f32>); 6] = [
        (Vector3::new( 0.0,  0.0, -1.0), Vector3::new(0.0, 1.0,  0.0)), // +x
        (Vector3::new( 0.0,  0.0,  1.0), Vector3::new(0.0, 1.0,  0.0)), // -x
        (Vector3::new( 1.0,  0.0,  0.0), Vector3::new(0.0, 0.0, -1.0)), // +y
        (Vector3::new( 1.0,  0.0,  0.0), Vector3::new(0.0, 0.0,  1.0)), // -y
        (Vector3::new( 1.0,  0.0,  0.0), Vector3::new(0.0, 1.0,  0.0)), // +z
        (Vector3::new(-1.0,  0.0,  0.0), Vector3::new(0.0, 1.0,  0.0)), // -z
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (u, v) in faces {
        push_quad(&mut vertices, &mut indices, u.cross(&v), u, v);
    }
    Object::new("cube", vertices, vec![RigidBatch::new("faces", DEFAULT_MATERIAL_KEY, indices)])
}

/// Unit UV sphere with `stacks` rings from pole to pole and `slices` segments around y.
pub fn sphere(stacks: u32, slices: u32) -> Object {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    for i in 0..=stacks {
        let theta = PI * i as f32 / stacks as f32;
        for j in 0..=slices {
            let phi = 2.0 * PI * j as f32 / slices as f32;
            let n = Vector3::new(theta.sin() * phi.sin(), theta.cos(), theta.sin() * phi.cos());
            let uv = Vector2::new(j as f32 / slices as f32, 1.0 - i as f32 / stacks as f32);
            vertices.push(Vertex::new(Point3::from(n), n, uv));
        }
    }

    let row = slices + 1;
    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * row + j;
            let b = a + row;
            indices.extend_from_slice(&[a, b, b + 1, a, b + 1, a + 1]);
        }
    }
    Object::new("sphere", vertices, vec![RigidBatch::new("surface", DEFAULT_MATERIAL_KEY, indices)])
}

/// Square in the xz plane at y = 0, `size` wide, facing +y.
pub fn plane(size: f32) -> Object {
    let half = size * 0.5;
    let mut vertices = Vec::with_capacity(4);
    let mut indices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        &mut indices,
        Vector3::zeros(),
        Vector3::new(half, 0.0, 0.0),
        Vector3::new(0.0, 0.0, -half),
    );
    Object::new("plane", vertices, vec![RigidBatch::new("surface", DEFAULT_MATERIAL_KEY, indices)])
}
