use canvas_rasterizer::core::clipper::{ClipVertex, clip_line};
use canvas_rasterizer::core::geometry::Vertex;
use canvas_rasterizer::core::math::matrix_stack::MatrixId;
use canvas_rasterizer::core::pipeline::ShadingModel;
use canvas_rasterizer::core::rasterizer::CullMode;
use canvas_rasterizer::pipeline::canvas::Canvas;
use canvas_rasterizer::pipeline::shaders::uniform::UniformShader;
use canvas_rasterizer::scene::light::Light;
use canvas_rasterizer::scene::object::Placement;
use nalgebra::{Matrix4, Point3, Vector3};

fn white() -> UniformShader {
    UniformShader::new(Vector3::repeat(1.0))
}

#[test]
fn single_point_lands_on_the_center_pixel() {
    let mut canvas = Canvas::new(4, 4).unwrap();
    canvas.set_shading_model(ShadingModel::Flat);

    let stats = canvas
        .draw_points(&white(), &[], &[Vertex::at(0.0, 0.0, 0.0)])
        .unwrap();

    let fb = canvas.framebuffer();
    assert_eq!(stats.fragments_shaded, 1);
    assert_eq!(fb.get_pixel(2, 2), Some([255, 255, 255]));
    assert!(fb.get_depth(2, 2).unwrap() < u16::MAX);
    assert_eq!(fb.covered_pixels(), 1);
}

/// Two triangles forming a quad in the z = 0 plane, wound as seen from +z.
fn quad(clockwise: bool) -> (Vec<Vertex>, Vec<u32>) {
    let vertices = vec![
        Vertex::at(-0.5, -0.5, 0.0),
        Vertex::at(0.5, -0.5, 0.0),
        Vertex::at(0.5, 0.5, 0.0),
        Vertex::at(-0.5, 0.5, 0.0),
    ];
    let indices = if clockwise {
        vec![0, 2, 1, 0, 3, 2]
    } else {
        vec![0, 1, 2, 0, 2, 3]
    };
    (vertices, indices)
}

#[test]
fn back_facing_quad_writes_nothing_under_backface_culling() {
    let mut canvas = Canvas::new(16, 16).unwrap();
    canvas.set_cull_mode(CullMode::Back);
    let (vertices, indices) = quad(true);

    let stats = canvas.draw_triangles(&white(), &[], &vertices, &indices).unwrap();
    assert_eq!(stats.primitives_in, 2);
    assert_eq!(stats.primitives_out, 0);
    assert_eq!(canvas.framebuffer().covered_pixels(), 0);

    let (vertices, indices) = quad(false);
    canvas.draw_triangles(&white(), &[], &vertices, &indices).unwrap();
    assert!(canvas.framebuffer().covered_pixels() > 0);
}

#[test]
fn front_face_culling_is_the_mirror_image() {
    let mut canvas = Canvas::new(16, 16).unwrap();
    canvas.set_cull_mode(CullMode::Front);
    let (vertices, indices) = quad(false);
    canvas.draw_triangles(&white(), &[], &vertices, &indices).unwrap();
    assert_eq!(canvas.framebuffer().covered_pixels(), 0);

    canvas.set_cull_mode(CullMode::None);
    canvas.draw_triangles(&white(), &[], &vertices, &indices).unwrap();
    assert_eq!(canvas.framebuffer().get_pixel(8, 8), Some([255, 255, 255]));
}

#[test]
fn line_through_the_near_plane_keeps_its_front_endpoint() {
    let mut canvas = Canvas::new(32, 32).unwrap();
    canvas.set_active_matrix(MatrixId::Projection);
    canvas.matrices.perspective(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 10.0);
    canvas.set_active_matrix(MatrixId::ModelView);

    let front = Vertex::at(0.5, 0.2, -5.0);
    let behind = Vertex::at(-0.2, 0.1, 1.0);
    let planes = canvas.matrices.frustum_planes();
    let (a, b) = clip_line(
        &planes,
        ClipVertex::indexed(front, 0),
        ClipVertex::indexed(behind, 1),
    )
    .unwrap();

    assert_eq!(a, ClipVertex::indexed(front, 0));
    assert!(b.source.is_none());
    // The near plane is z = -1 in eye space.
    let t = 4.0 / 6.0;
    let expected = front.position + (behind.position - front.position) * t;
    assert!((b.vertex.position - expected).norm() < 1e-4, "{:?}", b.vertex.position);

    let stats = canvas
        .draw_lines(&white(), &[], &[front, behind], &[0, 1])
        .unwrap();
    assert_eq!(stats.primitives_out, 1);
    assert_eq!(stats.vertices_shaded, 2);
    assert!(canvas.framebuffer().covered_pixels() > 0);
}

#[test]
fn point_light_at_eye_lights_a_facing_vertex() {
    let mut light = Light::new_point(Placement::default());
    light.update(&Matrix4::identity());

    let vertex = Vector3::new(0.0, 0.0, -5.0);
    let normal = Vector3::new(0.0, 0.0, 1.0);
    let shininess = 8.0;
    let c = light.shade(&vertex, &normal, shininess);

    let attenuation = 1.0 / (1.0 + 0.14 * 5.0 + 0.7 * 25.0);
    for term in [c.ambient, c.diffuse, c.specular] {
        assert!(term.iter().all(|v| v.is_finite() && *v >= 0.0));
    }
    assert!((c.ambient + c.diffuse).x > 0.0);
    // L, N and the eye direction coincide, so N.L = N.H = 1.
    assert!((c.diffuse.x - 0.5 * attenuation).abs() < 1e-6);
    assert!((c.specular.x - attenuation).abs() < 1e-6);
}

#[test]
fn perspective_scene_projects_through_the_camera() {
    let mut canvas = Canvas::new(20, 20).unwrap();
    canvas.set_active_matrix(MatrixId::Projection);
    canvas.matrices.perspective(std::f32::consts::FRAC_PI_4, 1.0, 2.0, 101.0);
    canvas.set_active_matrix(MatrixId::ModelView);
    canvas
        .matrices
        .look_at(&Point3::new(0.0, 0.0, 10.0), &Point3::origin(), &Vector3::y());

    let (vertices, indices) = quad(false);
    let stats = canvas.draw_triangles(&white(), &[], &vertices, &indices).unwrap();
    assert_eq!(stats.primitives_out, 2);
    assert_eq!(canvas.framebuffer().get_pixel(10, 10), Some([255, 255, 255]));
    assert_eq!(canvas.framebuffer().get_pixel(1, 1), Some([0, 0, 0]));
}
