pub mod canvas;
pub mod passes;
pub mod shaders;
