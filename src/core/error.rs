use std::fmt;

/// Errors surfaced by the canvas core.
///
/// Off-screen pixels, failed depth tests and fully clipped primitives are the
/// normal rejection path of the rasterizer and never produce an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// The color or depth buffer could not be allocated for the requested size.
    Allocation { width: usize, height: usize },
    /// The model-view matrix has no inverse, so no normal matrix exists.
    SingularModelView,
    /// The combined projection and model-view (or the viewport) cannot be inverted.
    SingularProjection,
    /// An index buffer refers past the end of its vertex buffer.
    IndexOutOfRange { index: u32, len: usize },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::Allocation { width, height } => {
                write!(f, "failed to allocate {}x{} canvas buffers", width, height)
            }
            CanvasError::SingularModelView => {
                write!(f, "model-view matrix is not invertible; normal matrix undefined")
            }
            CanvasError::SingularProjection => {
                write!(f, "projection transform is not invertible")
            }
            CanvasError::IndexOutOfRange { index, len } => {
                write!(f, "vertex index {} out of range for {} vertices", index, len)
            }
        }
    }
}

impl std::error::Error for CanvasError {}
