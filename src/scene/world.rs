use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::object::Object;

/// Everything one frame draws: a camera, the lights and the objects.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub objects: Vec<Object>,
}

impl World {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            lights: Vec::new(),
            objects: Vec::new(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(Object::triangle_count).sum()
    }
}
