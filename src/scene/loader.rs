use crate::io::config::{CameraConfig, Config, LightConfig, MaterialConfig, ObjectConfig};
use crate::io::obj_loader::load_obj;
use crate::pipeline::canvas::Canvas;
use crate::pipeline::shaders::lighting::SurfaceCoefficients;
use crate::pipeline::shaders::normal::NormalShader;
use crate::scene::camera::{Camera, ProjectionType};
use crate::scene::light::{Attenuation, Light, LightKind};
use crate::scene::material::Material;
use crate::scene::object::{DEFAULT_MATERIAL_KEY, Object, Placement};
use crate::scene::primitives;
use crate::scene::texture::Texture;
use crate::scene::world::World;
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

fn radians(degrees: [f32; 3]) -> Vector3<f32> {
    Vector3::from(degrees).map(f32::to_radians)
}

/// Copies the canvas options of the `[render]` section.
pub fn apply_render_options(canvas: &mut Canvas, config: &Config) {
    canvas.set_polygon_mode(config.render.polygon_mode);
    canvas.set_shading_model(config.render.shading_model);
    canvas.set_cull_mode(config.render.culling);
}

pub fn build_camera(config: &CameraConfig, aspect_ratio: f32) -> Result<Camera, String> {
    let bounds = |[left, right, bottom, top]: [f32; 4]| (left, right, bottom, top);
    let projection = match config.projection.as_str() {
        "perspective" => ProjectionType::Perspective {
            fov_y_rad: config.fovy.to_radians(),
            aspect_ratio: config.aspect.unwrap_or(aspect_ratio),
        },
        "frustum" => match config.bounds.map(bounds) {
            Some((left, right, bottom, top)) => ProjectionType::Frustum { left, right, bottom, top },
            None => ProjectionType::frustum(),
        },
        "ortho" => match config.bounds.map(bounds) {
            Some((left, right, bottom, top)) => ProjectionType::Orthographic { left, right, bottom, top },
            None => ProjectionType::orthographic(),
        },
        other => return Err(format!("Unknown camera projection '{}'", other)),
    };

    Ok(Camera {
        projection,
        near: config.near,
        far: config.far,
        position: Point3::from(config.position),
        orientation: radians(config.orientation),
        focus: config.orbit.then(|| Point3::from(config.focus)),
        radius: config.radius,
    })
}

pub fn build_light(config: &LightConfig) -> Result<Light, String> {
    let placement = Placement {
        position: Point3::from(config.position),
        orientation: radians(config.orientation),
        scale: 1.0,
    };
    let light = match config.r#type.as_str() {
        "directional" => Light::new_directional(placement),
        "point" => Light::new_point(placement),
        "spot" => Light::new_spot(placement),
        other => return Err(format!("Unknown light type '{}'", other)),
    };

    let ambient = config.ambient.map_or(light.ambient, Vector3::from);
    let diffuse = config.diffuse.map_or(light.diffuse, Vector3::from);
    let specular = config.specular.map_or(light.specular, Vector3::from);
    let mut light = light.with_colors(ambient, diffuse, specular);

    match &mut light.kind {
        LightKind::Directional => {}
        LightKind::Point { attenuation } => {
            if let Some([constant, linear, quadratic]) = config.attenuation {
                *attenuation = Attenuation { constant, linear, quadratic };
            }
        }
        LightKind::Spot {
            attenuation,
            cutoff,
            exponent,
        } => {
            if let Some([constant, linear, quadratic]) = config.attenuation {
                *attenuation = Attenuation { constant, linear, quadratic };
            }
            if let Some(c) = config.cutoff {
                *cutoff = c;
            }
            if let Some(e) = config.exponent {
                *exponent = e;
            }
        }
    }
    Ok(light)
}

pub fn build_material(config: &MaterialConfig) -> Result<Material, String> {
    let defaults = SurfaceCoefficients::default();
    let surface = SurfaceCoefficients {
        emission: config.emission.map_or(defaults.emission, Vector3::from),
        ambient: config.ambient.map_or(defaults.ambient, Vector3::from),
        diffuse: config.diffuse.map_or(defaults.diffuse, Vector3::from),
        specular: config.specular.map_or(defaults.specular, Vector3::from),
        shininess: config.shininess.unwrap_or(defaults.shininess),
    };

    Ok(match config.kind.as_str() {
        "uniform" => Material::uniform(config.color.map_or(Vector3::repeat(1.0), Vector3::from)),
        "solid" => Material::solid(surface),
        "brick" => Material::textured(surface, Arc::new(Texture::brick(64, 64))),
        "textured" => {
            let path = config
                .texture
                .as_ref()
                .ok_or_else(|| "Textured material needs a 'texture' path".to_string())?;
            Material::textured(surface, Arc::new(Texture::load(path)?))
        }
        "normal" => Material::Normal(NormalShader),
        other => return Err(format!("Unknown material kind '{}'", other)),
    })
}

pub fn build_object(config: &ObjectConfig) -> Result<Object, String> {
    let mut object = match (&config.primitive, &config.path) {
        (Some(_), Some(_)) => return Err("An object takes either 'primitive' or 'path', not both".to_string()),
        (Some(kind), None) => match kind.as_str() {
            "cube" => primitives::cube(),
            "sphere" => primitives::sphere(16, 24),
            "plane" => primitives::plane(2.0),
            other => return Err(format!("Unknown primitive '{}'", other)),
        },
        (None, Some(path)) => load_obj(path)?,
        (None, None) => return Err("An object needs a 'primitive' or a 'path'".to_string()),
    };

    // The configured material serves every batch left without one.
    let material = build_material(&config.material)?;
    for batch in &object.batches {
        if !object.materials.contains_key(&batch.material) {
            object.materials.insert(batch.material.clone(), material.clone());
        }
    }
    object.materials.entry(DEFAULT_MATERIAL_KEY.to_string()).or_insert(material);

    object.placement = Placement {
        position: Point3::from(config.position),
        orientation: radians(config.orientation),
        scale: config.scale,
    };
    Ok(object)
}

/// Builds the camera, lights and objects a config describes.
///
/// Lights and objects that fail to build are skipped with a warning.
pub fn build_world(config: &Config) -> Result<World, String> {
    let aspect_ratio = config.render.width as f32 / config.render.height.max(1) as f32;
    let mut world = World::new(build_camera(&config.camera, aspect_ratio)?);

    for (i, l) in config.lights.iter().enumerate() {
        match build_light(l) {
            Ok(light) => world.lights.push(light),
            Err(e) => warn!("Skipping light #{}: {}", i, e),
        }
    }

    for (i, o) in config.objects.iter().enumerate() {
        match build_object(o) {
            Ok(mut object) => {
                object.show_bounds = config.render.show_bounds;
                object.show_normals = config.render.show_normals;
                world.objects.push(object);
            }
            Err(e) => warn!("Skipping object #{}: {}", i, e),
        }
    }

    info!(
        "Scene: {} lights, {} objects, {} triangles",
        world.lights.len(),
        world.objects.len(),
        world.triangle_count()
    );
    Ok(world)
}
