//! Software canvas rasterizer.
//!
//! A matrix stack, homogeneous frustum clipping, Bresenham line and triangle
//! rasterization with a 16-bit depth buffer, and shading through the [`Shader`]
//! capability trait.
//!
//! [`Shader`]: core::pipeline::Shader

pub mod core;
pub mod io;
pub mod pipeline;
pub mod scene;
