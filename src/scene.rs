pub mod camera;
pub mod light;
pub mod loader;
pub mod material;
pub mod object;
pub mod primitives;
pub mod texture;
pub mod world;
