use crate::core::framebuffer::FrameBuffer;
use std::fmt::Write;

/// Luminance ramp from dark to bright.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

fn luminance(rgb: [u8; 3]) -> f32 {
    (0.2126 * rgb[0] as f32 + 0.7152 * rgb[1] as f32 + 0.0722 * rgb[2] as f32) / 255.0
}

fn glyph(rgb: [u8; 3]) -> char {
    let max = (RAMP.len() - 1) as f32;
    let i = (luminance(rgb) * max).round().clamp(0.0, max) as usize;
    RAMP[i] as char
}

/// Renders the color buffer as ASCII art at most `columns` characters wide,
/// top row first. Each character samples the pixel at the center of its cell.
pub fn render_ascii(framebuffer: &FrameBuffer, columns: usize) -> String {
    let (width, height) = (framebuffer.width(), framebuffer.height());
    if width == 0 || height == 0 || columns == 0 {
        return String::new();
    }

    let columns = columns.min(width);
    let cell_w = width as f32 / columns as f32;
    let cell_h = cell_w * CELL_ASPECT;
    let rows = ((height as f32 / cell_h).round() as usize).max(1);
    let cell_h = height as f32 / rows as f32;

    let mut out = String::with_capacity(rows * (columns + 1));
    for row in 0..rows {
        let from_top = ((row as f32 + 0.5) * cell_h) as usize;
        let y = height - 1 - from_top.min(height - 1);
        for col in 0..columns {
            let x = (((col as f32 + 0.5) * cell_w) as usize).min(width - 1);
            let rgb = framebuffer.get_pixel(x, y).unwrap_or([0, 0, 0]);
            out.push(glyph(rgb));
        }
        // Trailing spaces carry no information.
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        let _ = writeln!(out);
    }
    out
}
