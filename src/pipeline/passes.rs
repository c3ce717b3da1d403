use crate::core::error::CanvasError;
use crate::core::geometry::Vertex;
use crate::core::math::matrix_stack::MatrixId;
use crate::pipeline::canvas::{Canvas, DrawStats};
use crate::pipeline::shaders::uniform::UniformShader;
use crate::scene::light::Light;
use crate::scene::material::Material;
use crate::scene::object::Object;
use crate::scene::world::World;
use log::{debug, warn};
use nalgebra::Vector3;

const BOUNDS_COLOR: [f32; 3] = [1.0, 1.0, 0.0];
const NORMALS_COLOR: [f32; 3] = [0.0, 1.0, 1.0];

/// Draws a triangle batch with whichever shader the material carries.
pub fn draw_batch(
    canvas: &mut Canvas,
    material: &Material,
    lights: &[Light],
    vertices: &[Vertex],
    indices: &[u32],
) -> Result<DrawStats, CanvasError> {
    match material {
        Material::Uniform(shader) => canvas.draw_triangles(shader, lights, vertices, indices),
        Material::Solid(shader) => canvas.draw_triangles(shader, lights, vertices, indices),
        Material::Textured(shader) => canvas.draw_triangles(shader, lights, vertices, indices),
        Material::Normal(shader) => canvas.draw_triangles(shader, lights, vertices, indices),
    }
}

/// Moves every light into eye space under the current view transform.
///
/// The model-view is restored after each light.
pub fn update_lights(canvas: &mut Canvas, lights: &mut [Light]) {
    canvas.set_active_matrix(MatrixId::ModelView);
    let view = *canvas.matrices.get(MatrixId::ModelView);
    for light in lights.iter_mut() {
        light.placement.apply(&mut canvas.matrices);
        light.update(canvas.matrices.get(MatrixId::ModelView));
        canvas.matrices.set(MatrixId::ModelView, view);
    }
}

/// Draws one object under its placement; the model-view is restored afterwards,
/// also when a draw call fails.
pub fn draw_object(canvas: &mut Canvas, object: &Object, lights: &[Light]) -> Result<DrawStats, CanvasError> {
    canvas.set_active_matrix(MatrixId::ModelView);
    let saved = *canvas.matrices.get(MatrixId::ModelView);
    object.placement.apply(&mut canvas.matrices);
    let result = draw_placed_object(canvas, object, lights);
    canvas.matrices.set(MatrixId::ModelView, saved);
    result
}

fn draw_placed_object(canvas: &mut Canvas, object: &Object, lights: &[Light]) -> Result<DrawStats, CanvasError> {
    let fallback = Material::default();
    let mut stats = DrawStats::default();

    for batch in &object.batches {
        let material = match object.materials.get(&batch.material) {
            Some(material) => material,
            None => {
                warn!(
                    "{}/{}: no material '{}', using the default",
                    object.name, batch.name, batch.material
                );
                &fallback
            }
        };
        let batch_stats = draw_batch(canvas, material, lights, &object.vertices, &batch.indices)?;
        debug!("{}/{} ({}): {}", object.name, batch.name, material.kind(), batch_stats);
        stats += batch_stats;
    }

    let bounds = object.bounds();
    if object.show_bounds {
        if let Some(bounds) = bounds {
            let (vertices, indices) = bounds.wireframe();
            let shader = UniformShader::new(Vector3::from(BOUNDS_COLOR));
            stats += canvas.draw_lines(&shader, lights, &vertices, &indices)?;
        }
    }
    if object.show_normals {
        let length = bounds.map_or(0.1, |b| (b.max - b.min).norm() * 0.05);
        let (vertices, indices) = object.normal_lines(length);
        let shader = UniformShader::new(Vector3::from(NORMALS_COLOR));
        stats += canvas.draw_lines(&shader, lights, &vertices, &indices)?;
    }

    Ok(stats)
}

/// Renders a full frame: clear, camera, lights, then every object.
pub fn render_frame(canvas: &mut Canvas, world: &mut World) -> Result<DrawStats, CanvasError> {
    canvas.clear_color();
    canvas.clear_depth();

    world.camera.project(&mut canvas.matrices);
    world.camera.view(&mut canvas.matrices);
    update_lights(canvas, &mut world.lights);

    let mut stats = DrawStats::default();
    for object in &world.objects {
        let object_stats = draw_object(canvas, object, &world.lights)?;
        debug!("{}: {}", object.name, object_stats);
        stats += object_stats;
    }
    Ok(stats)
}
