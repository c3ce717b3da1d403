use canvas_rasterizer::core::clipper::{ClipVertex, FrustumPlanes, clip_triangle};
use canvas_rasterizer::core::framebuffer::FrameBuffer;
use canvas_rasterizer::core::geometry::Vertex;
use canvas_rasterizer::core::math::matrix_stack::{MatrixId, MatrixStack};
use canvas_rasterizer::core::pipeline::{Shader, ShadingContext, ShadingModel};
use canvas_rasterizer::core::rasterizer::{CullMode, Rasterizer};
use canvas_rasterizer::pipeline::canvas::Canvas;
use nalgebra::{Point3, Vector3, Vector4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;

/// Counts vertex-stage invocations; fragments are white.
#[derive(Default)]
struct CountingShader {
    calls: Cell<usize>,
}

impl Shader for CountingShader {
    type Varying = f32;

    fn shade_vertex(&self, ctx: &ShadingContext<'_>, vertex: &Vertex) -> (Vector4<f32>, f32) {
        self.calls.set(self.calls.get() + 1);
        (ctx.project(&ctx.eye_position(&vertex.position)), 1.0)
    }

    fn shade_fragment(&self, _ctx: &ShadingContext<'_>, varying: &f32) -> Vector3<f32> {
        Vector3::repeat(*varying)
    }
}

fn perspective_stack() -> MatrixStack {
    let mut stack = MatrixStack::new(64, 64);
    stack.set_active(MatrixId::Projection);
    stack.perspective(1.0, 1.0, 1.0, 20.0);
    stack.set_active(MatrixId::ModelView);
    stack
}

fn random_point(rng: &mut StdRng, extent: f32) -> Vertex {
    Vertex::at(
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent) - extent,
    )
}

#[test]
fn shared_vertices_are_shaded_once() {
    let mut canvas = Canvas::new(32, 32).unwrap();
    canvas.set_cull_mode(CullMode::None);
    let vertices = [
        Vertex::at(-0.5, -0.5, 0.0),
        Vertex::at(0.5, -0.5, 0.0),
        Vertex::at(0.5, 0.5, 0.0),
        Vertex::at(-0.5, 0.5, 0.0),
    ];
    // Vertex 0 and 2 appear in both triangles, and the quad is drawn twice over.
    let indices = [0, 1, 2, 0, 2, 3, 2, 1, 0, 3, 2, 0];
    let shader = CountingShader::default();

    let stats = canvas.draw_triangles(&shader, &[], &vertices, &indices).unwrap();
    assert_eq!(shader.calls.get(), 4);
    assert_eq!(stats.vertices_shaded, 4);
    assert_eq!(stats.primitives_out, 4);
}

#[test]
fn each_draw_call_starts_a_fresh_cache() {
    let mut canvas = Canvas::new(8, 8).unwrap();
    let vertices = [Vertex::at(0.0, 0.0, 0.0), Vertex::at(0.5, 0.5, 0.0)];
    let shader = CountingShader::default();
    canvas.draw_lines(&shader, &[], &vertices, &[0, 1, 1, 0]).unwrap();
    canvas.draw_lines(&shader, &[], &vertices, &[0, 1]).unwrap();
    assert_eq!(shader.calls.get(), 4);
}

#[test]
fn clipped_vertices_lie_inside_every_plane() {
    let stack = perspective_stack();
    let planes = stack.frustum_planes();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut scratch = Vec::new();
    let mut clipped_any = false;

    for _ in 0..500 {
        let tri = [0, 1, 2].map(|i| ClipVertex::indexed(random_point(&mut rng, 8.0), i));
        let polygon = clip_triangle(&planes, tri, &mut scratch);
        if polygon.len() > 3 {
            clipped_any = true;
        }
        assert!(polygon.is_empty() || polygon.len() >= 3);
        for v in &polygon {
            for d in planes.distances(&v.vertex) {
                assert!(d >= -1e-3, "distance {} for {:?}", d, v.vertex.position);
            }
        }
    }
    assert!(clipped_any);
}

#[test]
fn triangles_inside_the_frustum_pass_unchanged() {
    let planes = FrustumPlanes::from_matrix(&nalgebra::Matrix4::identity());
    let mut rng = StdRng::seed_from_u64(7);
    let mut scratch = Vec::new();

    for _ in 0..200 {
        let tri = [0, 1, 2].map(|i| {
            let v = Vertex::at(
                rng.random_range(-0.9..0.9),
                rng.random_range(-0.9..0.9),
                rng.random_range(-0.9..0.9),
            );
            ClipVertex::indexed(v, i)
        });
        let polygon = clip_triangle(&planes, tri, &mut scratch);
        assert_eq!(polygon, tri.to_vec());
    }
}

#[test]
fn nearer_fragments_win_and_farther_ones_never_overwrite() {
    let mut fb = FrameBuffer::new(8, 8).unwrap();
    let rasterizer = Rasterizer::new();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..2000 {
        let (x, y) = (rng.random_range(0..8), rng.random_range(0..8));
        let z: f32 = rng.random_range(0.0..65535.0);
        let before_depth = fb.get_depth(x as usize, y as usize).unwrap();
        let before_color = fb.get_pixel(x as usize, y as usize).unwrap();
        let shade = rng.random_range(0.0..1.0f32);

        let written = rasterizer.plot(&mut fb, x, y, z, &shade, &mut |s: &f32| Vector3::repeat(*s));

        let after_depth = fb.get_depth(x as usize, y as usize).unwrap();
        if (z as u16) < before_depth {
            assert!(written);
            assert_eq!(after_depth, z as u16);
        } else {
            assert!(!written);
            assert_eq!(after_depth, before_depth);
            assert_eq!(fb.get_pixel(x as usize, y as usize).unwrap(), before_color);
        }
    }
}

#[test]
fn off_screen_plots_are_dropped() {
    let mut fb = FrameBuffer::new(4, 4).unwrap();
    let rasterizer = Rasterizer::new();
    let mut shade = |_: &f32| Vector3::repeat(1.0);
    for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 4)] {
        assert!(!rasterizer.plot(&mut fb, x, y, 0.0, &0.0, &mut shade));
    }
    assert_eq!(fb.covered_pixels(), 0);
}

#[test]
fn project_then_unproject_returns_the_point() {
    let mut stack = perspective_stack();
    stack.look_at(&Point3::new(1.0, 2.0, 6.0), &Point3::new(0.0, 0.0, -4.0), &Vector3::y());
    stack.rotate(0.4, &Vector3::new(1.0, 1.0, 0.0));
    let planes = stack.frustum_planes();
    let mut rng = StdRng::seed_from_u64(99);

    let mut checked = 0;
    while checked < 100 {
        let v = random_point(&mut rng, 4.0);
        if !planes.contains(&v) {
            continue;
        }
        let window = stack.project(&v.position);
        let back = stack.unproject(&window).unwrap();
        assert!((back - v.position).norm() < 1e-2, "{:?} -> {:?}", v.position, back);
        checked += 1;
    }
}

#[test]
fn shading_model_switch_changes_fill_interpolation() {
    let vertices = [
        Vertex::at(-0.9, -0.9, 0.0),
        Vertex::at(0.9, -0.9, 0.0),
        Vertex::at(0.0, 0.9, 0.0),
    ];

    struct Ramp;
    impl Shader for Ramp {
        type Varying = f32;
        fn shade_vertex(&self, ctx: &ShadingContext<'_>, v: &Vertex) -> (Vector4<f32>, f32) {
            (ctx.project(&ctx.eye_position(&v.position)), (v.position.x + 1.0) * 0.5)
        }
        fn shade_fragment(&self, _ctx: &ShadingContext<'_>, t: &f32) -> Vector3<f32> {
            Vector3::repeat(*t)
        }
    }

    let mut canvas = Canvas::new(32, 32).unwrap();
    canvas.set_shading_model(ShadingModel::Gouraud);
    canvas.draw_triangles(&Ramp, &[], &vertices, &[0, 1, 2]).unwrap();
    let left = canvas.framebuffer().get_pixel(6, 3).unwrap()[0];
    let right = canvas.framebuffer().get_pixel(25, 3).unwrap()[0];
    assert!(left < right);

    canvas.clear_color();
    canvas.clear_depth();
    canvas.set_shading_model(ShadingModel::Flat);
    canvas.draw_triangles(&Ramp, &[], &vertices, &[0, 1, 2]).unwrap();
    let left = canvas.framebuffer().get_pixel(6, 3).unwrap()[0];
    let right = canvas.framebuffer().get_pixel(25, 3).unwrap()[0];
    assert_eq!(left, right);
}
