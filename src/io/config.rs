use crate::core::pipeline::ShadingModel;
use crate::core::rasterizer::{CullMode, PolygonMode};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Render configuration, read from TOML. Every section and field is optional.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_lights")]
    pub lights: Vec<LightConfig>,
    #[serde(default = "default_objects")]
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            lights: default_lights(),
            objects: default_objects(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

fn default_lights() -> Vec<LightConfig> {
    vec![
        LightConfig {
            position: [0.0, 0.0, 0.0],
            orientation: [-30.0, 20.0, 0.0],
            ..LightConfig::new("directional")
        },
        LightConfig {
            position: [3.0, 4.0, 3.0],
            attenuation: Some([1.0, 0.05, 0.01]),
            ..LightConfig::new("point")
        },
    ]
}

fn default_objects() -> Vec<ObjectConfig> {
    vec![
        ObjectConfig {
            primitive: Some("sphere".to_string()),
            position: [-1.6, 0.0, 0.0],
            material: MaterialConfig {
                kind: "solid".to_string(),
                diffuse: Some([0.9, 0.3, 0.2]),
                shininess: Some(16.0),
                ..MaterialConfig::default()
            },
            ..ObjectConfig::default()
        },
        ObjectConfig {
            primitive: Some("cube".to_string()),
            position: [1.6, 0.0, 0.0],
            orientation: [20.0, 35.0, 0.0],
            scale: 0.9,
            material: MaterialConfig {
                kind: "brick".to_string(),
                ..MaterialConfig::default()
            },
            ..ObjectConfig::default()
        },
        ObjectConfig {
            primitive: Some("plane".to_string()),
            position: [0.0, -1.2, 0.0],
            scale: 3.0,
            material: MaterialConfig {
                kind: "solid".to_string(),
                diffuse: Some([0.6, 0.6, 0.6]),
                ..MaterialConfig::default()
            },
            ..ObjectConfig::default()
        },
    ]
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default)]
    pub polygon_mode: PolygonMode,
    #[serde(default = "default_shading_model")]
    pub shading_model: ShadingModel,
    #[serde(default)]
    pub culling: CullMode,
    /// Width of the terminal preview in characters.
    #[serde(default = "default_preview_columns")]
    pub preview_columns: usize,
    #[serde(default)]
    pub show_bounds: bool,
    #[serde(default)]
    pub show_normals: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            polygon_mode: PolygonMode::default(),
            shading_model: default_shading_model(),
            culling: CullMode::default(),
            preview_columns: default_preview_columns(),
            show_bounds: false,
            show_normals: false,
        }
    }
}

fn default_width() -> usize {
    160
}
fn default_height() -> usize {
    120
}
fn default_shading_model() -> ShadingModel {
    ShadingModel::Gouraud
}
fn default_preview_columns() -> usize {
    80
}

/// Camera section. Angles are in degrees.
#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_projection")]
    pub projection: String, // "perspective", "frustum", "ortho"
    #[serde(default = "default_fovy")]
    pub fovy: f32,
    /// Width over height; the render size is used when absent.
    pub aspect: Option<f32>,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// `[left, right, bottom, top]` for frustum and ortho projections.
    pub bounds: Option<[f32; 4]>,
    /// Orbit `focus` at `radius`; otherwise the camera is placed freely at `position`.
    #[serde(default = "default_true")]
    pub orbit: bool,
    #[serde(default)]
    pub focus: [f32; 3],
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_camera_orientation")]
    pub orientation: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            projection: default_projection(),
            fovy: default_fovy(),
            aspect: None,
            near: default_near(),
            far: default_far(),
            bounds: None,
            orbit: true,
            focus: [0.0, 0.0, 0.0],
            radius: default_radius(),
            position: [0.0, 0.0, 0.0],
            orientation: default_camera_orientation(),
        }
    }
}

fn default_projection() -> String {
    "perspective".to_string()
}
fn default_fovy() -> f32 {
    45.0
}
fn default_near() -> f32 {
    2.0
}
fn default_far() -> f32 {
    101.0
}
fn default_true() -> bool {
    true
}
fn default_radius() -> f32 {
    10.0
}
fn default_camera_orientation() -> [f32; 3] {
    [-20.0, 0.0, 0.0]
}

/// One `[[lights]]` entry. Colors left out keep the light kind's defaults.
#[derive(Debug, Deserialize)]
pub struct LightConfig {
    pub r#type: String, // "directional", "point", "spot"
    pub ambient: Option<[f32; 3]>,
    pub diffuse: Option<[f32; 3]>,
    pub specular: Option<[f32; 3]>,
    /// `[constant, linear, quadratic]`
    pub attenuation: Option<[f32; 3]>,
    pub cutoff: Option<f32>,
    pub exponent: Option<f32>,
    #[serde(default)]
    pub position: [f32; 3],
    /// Degrees about x, y, z. The light shines along its local -z.
    #[serde(default)]
    pub orientation: [f32; 3],
}

impl LightConfig {
    pub fn new(kind: &str) -> Self {
        Self {
            r#type: kind.to_string(),
            ambient: None,
            diffuse: None,
            specular: None,
            attenuation: None,
            cutoff: None,
            exponent: None,
            position: [0.0, 0.0, 0.0],
            orientation: [0.0, 0.0, 0.0],
        }
    }
}

/// One `[[objects]]` entry: either a generated primitive or an OBJ file.
#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    pub primitive: Option<String>, // "cube", "sphere", "plane"
    pub path: Option<String>,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    /// Degrees about x, y, z.
    #[serde(default)]
    pub orientation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Applies to every batch that has no material of its own.
    #[serde(default)]
    pub material: MaterialConfig,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            primitive: None,
            path: None,
            position: [0.0, 0.0, 0.0],
            orientation: [0.0, 0.0, 0.0],
            scale: default_scale(),
            material: MaterialConfig::default(),
        }
    }
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct MaterialConfig {
    #[serde(default = "default_material_kind")]
    pub kind: String, // "uniform", "solid", "textured", "brick", "normal"
    /// Uniform color.
    pub color: Option<[f32; 3]>,
    pub emission: Option<[f32; 3]>,
    pub ambient: Option<[f32; 3]>,
    pub diffuse: Option<[f32; 3]>,
    pub specular: Option<[f32; 3]>,
    pub shininess: Option<f32>,
    /// Image file for "textured".
    pub texture: Option<String>,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            kind: default_material_kind(),
            color: None,
            emission: None,
            ambient: None,
            diffuse: None,
            specular: None,
            shininess: None,
            texture: None,
        }
    }
}

fn default_material_kind() -> String {
    "uniform".to_string()
}
