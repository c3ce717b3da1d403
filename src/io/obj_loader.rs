use crate::core::geometry::Vertex;
use crate::pipeline::shaders::lighting::SurfaceCoefficients;
use crate::scene::material::Material;
use crate::scene::object::{DEFAULT_MATERIAL_KEY, Object, RigidBatch};
use crate::scene::texture::Texture;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Loads an OBJ file into one [`Object`], one rigid batch per OBJ group.
///
/// Batches refer to their MTL material by name; MTL materials become solid or
/// textured materials on the object. Groups without a material use the default key.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Object, String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()));
    }

    info!("Loading OBJ file: {}", path.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Unifies indices for position/normal/uv
        ..Default::default()
    };

    let (models, materials) =
        tobj::load_obj(path, &load_options).map_err(|e| format!("Failed to load OBJ: {}", e))?;
    let materials = materials.unwrap_or_else(|e| {
        warn!("{}: materials unavailable ({}), using defaults", path.display(), e);
        Vec::new()
    });

    let mut vertices = Vec::new();
    let mut batches = Vec::with_capacity(models.len());

    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;
        let base = vertices.len();
        let has_normals = mesh.normals.len() >= num_vertices * 3;
        let has_texcoords = mesh.texcoords.len() >= num_vertices * 2;

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(mesh.normals[i * 3], mesh.normals[i * 3 + 1], mesh.normals[i * 3 + 2])
            } else {
                Vector3::zeros()
            };
            let texcoord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };
            vertices.push(Vertex::new(position, normal, texcoord));
        }

        let indices: Vec<u32> = mesh.indices.iter().map(|&i| i + base as u32).collect();
        if !has_normals {
            warn!("Mesh '{}' has no normals; computing smooth normals", model.name);
            compute_smooth_normals(&mut vertices[base..], &mesh.indices);
        }

        let material = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .map_or(DEFAULT_MATERIAL_KEY.to_string(), |m| m.name.clone());
        batches.push(RigidBatch::new(model.name.clone(), material, indices));
    }

    let name = path
        .file_stem()
        .map_or_else(|| "obj".to_string(), |s| s.to_string_lossy().into_owned());
    let mut object = Object::new(name, vertices, batches);

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    for m in &materials {
        object.materials.insert(m.name.clone(), convert_material(m, base_dir));
    }

    info!(
        "OBJ loaded: {} vertices, {} triangles in {} batches",
        object.vertices.len(),
        object.triangle_count(),
        object.batches.len()
    );
    Ok(object)
}

fn convert_material(m: &tobj::Material, base_dir: &Path) -> Material {
    let defaults = SurfaceCoefficients::default();
    let surface = SurfaceCoefficients {
        emission: defaults.emission,
        ambient: m.ambient.map_or(defaults.ambient, Vector3::from),
        diffuse: m.diffuse.map_or(defaults.diffuse, Vector3::from),
        specular: m.specular.map_or(defaults.specular, Vector3::from),
        shininess: m.shininess.unwrap_or(defaults.shininess),
    };

    match &m.diffuse_texture {
        Some(file) => match Texture::load(base_dir.join(file)) {
            Ok(texture) => Material::textured(surface, Arc::new(texture)),
            Err(e) => {
                warn!("Material '{}': {}; drawing it untextured", m.name, e);
                Material::solid(surface)
            }
        },
        None => Material::solid(surface),
    }
}

/// Area-weighted average of the face normals around each vertex.
/// `indices` are local to `vertices`.
pub fn compute_smooth_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut sums: HashMap<usize, Vector3<f32>> = HashMap::new();
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let (pa, pb, pc) = (vertices[a].position, vertices[b].position, vertices[c].position);
        let face = (pb - pa).cross(&(pc - pa));
        for i in [a, b, c] {
            *sums.entry(i).or_insert_with(Vector3::zeros) += face;
        }
    }
    for (i, sum) in sums {
        vertices[i].normal = sum.try_normalize(1e-12).unwrap_or(Vector3::y());
    }
}
