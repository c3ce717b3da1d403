use crate::core::error::CanvasError;
use nalgebra::Vector3;

/// Depth value of a cleared pixel ("infinitely far").
pub const DEPTH_CLEAR: u16 = u16::MAX;

/// Bytes per pixel in the color buffer.
pub const CHANNELS: usize = 3;

/// Color (RGB8) and depth (u16) buffers of the canvas.
///
/// Both are dense and row-major. Row 0 is the bottom row of the image, matching
/// the viewport transform that maps NDC y = -1 to y = 0.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    color_buffer: Vec<u8>,
    depth_buffer: Vec<u16>,
}

impl FrameBuffer {
    /// Allocates both buffers: color cleared to black, depth to [`DEPTH_CLEAR`].
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let (color_buffer, depth_buffer) = Self::allocate(width, height)?;
        Ok(Self {
            width,
            height,
            color_buffer,
            depth_buffer,
        })
    }

    fn allocate(width: usize, height: usize) -> Result<(Vec<u8>, Vec<u16>), CanvasError> {
        let err = CanvasError::Allocation { width, height };
        let pixels = width.checked_mul(height).ok_or(err.clone())?;
        let bytes = pixels.checked_mul(CHANNELS).ok_or(err.clone())?;

        let mut color = Vec::new();
        color.try_reserve_exact(bytes).map_err(|_| err.clone())?;
        color.resize(bytes, 0);

        let mut depth = Vec::new();
        depth.try_reserve_exact(pixels).map_err(|_| err)?;
        depth.resize(pixels, DEPTH_CLEAR);

        Ok((color, depth))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocates both buffers, discarding their contents.
    ///
    /// On failure the old buffers are left untouched and the error is returned.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), CanvasError> {
        let (color, depth) = Self::allocate(width, height)?;
        self.width = width;
        self.height = height;
        self.color_buffer = color;
        self.depth_buffer = depth;
        Ok(())
    }

    /// Resets every pixel to black.
    pub fn clear_color(&mut self) {
        self.color_buffer.fill(0);
    }

    /// Resets every depth value to [`DEPTH_CLEAR`].
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(DEPTH_CLEAR);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Depth test and update. Nearer (strictly smaller) wins; off-screen never passes.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: i32, y: i32, depth: u16) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x as usize, y as usize);
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            true
        } else {
            false
        }
    }

    /// Writes a linear `[0, 1]` color, clamping and scaling each channel to a byte.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Vector3<f32>) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x as usize, y as usize) * CHANNELS;
        for (c, value) in color.iter().enumerate() {
            self.color_buffer[idx + c] = (value.clamp(0.0, 1.0) * 255.0) as u8;
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y) * CHANNELS;
        Some([
            self.color_buffer[idx],
            self.color_buffer[idx + 1],
            self.color_buffer[idx + 2],
        ])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)])
    }

    /// The raw color buffer: row-major, 3 bytes per pixel, bottom row first.
    pub fn color_bytes(&self) -> &[u8] {
        &self.color_buffer
    }

    pub fn depth_values(&self) -> &[u16] {
        &self.depth_buffer
    }

    /// Color rows from the top of the image down, for top-left-origin presenters.
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[u8]> {
        self.color_buffer
            .chunks_exact(self.width.max(1) * CHANNELS)
            .rev()
    }

    /// Number of pixels whose depth differs from the clear value.
    pub fn covered_pixels(&self) -> usize {
        self.depth_buffer.iter().filter(|&&d| d != DEPTH_CLEAR).count()
    }
}
