pub mod interpolation;
pub mod matrix_stack;
pub mod transform;
