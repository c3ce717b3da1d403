use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use log::info;
use nalgebra::Vector3;
use std::path::Path;
use std::sync::Arc;

/// A 2D texture map sampled with repeat wrapping.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: Arc<DynamicImage>,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|e| format!("Failed to load texture {:?}: {}", path_ref, e))?;
        if img.width() == 0 || img.height() == 0 {
            return Err(format!("Texture {:?} is empty", path_ref));
        }
        info!("Loaded texture: {:?} ({}x{})", path_ref, img.width(), img.height());
        Ok(Self::from_image(DynamicImage::ImageRgb8(img.to_rgb8())))
    }

    pub fn from_image(img: DynamicImage) -> Self {
        Self {
            width: img.width().max(1),
            height: img.height().max(1),
            image: Arc::new(img),
        }
    }

    /// Black and white checkerboard of `cells` x `cells` squares.
    pub fn checker(cells: u32, cell_size: u32) -> Self {
        let size = (cells * cell_size).max(1);
        let cell = cell_size.max(1);
        let img = RgbImage::from_fn(size, size, |x, y| {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        Self::from_image(DynamicImage::ImageRgb8(img))
    }

    /// Procedural running-bond brick pattern with mortar lines.
    pub fn brick(width: u32, height: u32) -> Self {
        const BRICK_W: u32 = 16;
        const BRICK_H: u32 = 8;
        const MORTAR: u32 = 1;
        let img = RgbImage::from_fn(width.max(1), height.max(1), |x, y| {
            let row = y / BRICK_H;
            let shifted = x + if row % 2 == 1 { BRICK_W / 2 } else { 0 };
            let mortar = y % BRICK_H < MORTAR || shifted % BRICK_W < MORTAR;
            if mortar {
                Rgb([200, 200, 190])
            } else {
                // Slight per-brick tint so rows read as separate bricks.
                let shade = ((shifted / BRICK_W + row * 7) % 5) as u8 * 8;
                Rgb([150 + shade, 50 + shade / 2, 40])
            }
        });
        Self::from_image(DynamicImage::ImageRgb8(img))
    }

    /// Bilinear sample at `(u, v)`, wrapping outside `[0, 1]`. `v = 0` is the bottom row.
    pub fn sample(&self, u: f32, v: f32) -> Vector3<f32> {
        let u = u - u.floor();
        let v = v - v.floor();

        // Pixel centers sit at +0.5.
        let x = u * self.width as f32 - 0.5;
        let y = (1.0 - v) * self.height as f32 - 0.5;

        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let wx = x - x.floor();
        let wy = y - y.floor();

        let c00 = self.get_pixel_wrapped(x0, y0);
        let c10 = self.get_pixel_wrapped(x0 + 1, y0);
        let c01 = self.get_pixel_wrapped(x0, y0 + 1);
        let c11 = self.get_pixel_wrapped(x0 + 1, y0 + 1);

        let top = c00 * (1.0 - wx) + c10 * wx;
        let bottom = c01 * (1.0 - wx) + c11 * wx;
        top * (1.0 - wy) + bottom * wy
    }

    fn get_pixel_wrapped(&self, x: i32, y: i32) -> Vector3<f32> {
        let x = x.rem_euclid(self.width as i32) as u32;
        let y = y.rem_euclid(self.height as i32) as u32;
        let pixel = self.image.get_pixel(x, y);
        Vector3::new(pixel[0] as f32, pixel[1] as f32, pixel[2] as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_a_texel_center_returns_it() {
        let tex = Texture::checker(2, 1);
        // Top-left texel (0, 0) is white; its center is at u = 0.25, v = 0.75.
        assert!((tex.sample(0.25, 0.75) - Vector3::repeat(1.0)).norm() < 1e-6);
        assert!((tex.sample(0.75, 0.75) - Vector3::zeros()).norm() < 1e-6);
    }

    #[test]
    fn sampling_wraps() {
        let tex = Texture::checker(4, 2);
        let a = tex.sample(0.3, 0.6);
        assert!((tex.sample(1.3, -0.4) - a).norm() < 1e-5);
    }

    #[test]
    fn brick_has_mortar_and_brick_colors() {
        let tex = Texture::brick(32, 16);
        let mortar = tex.get_pixel_wrapped(0, 0);
        let brick = tex.get_pixel_wrapped(4, 4);
        assert!(mortar.z > brick.z);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Texture::load("does/not/exist.png").is_err());
    }
}
