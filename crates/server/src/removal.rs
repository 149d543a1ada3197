//! Foreground extraction behind the remove-background route.

use image::{DynamicImage, Rgba, RgbaImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemovalError {
    #[error("image has no pixels")]
    EmptyImage,
}

/// Produces an RGBA cutout whose background pixels are transparent.
pub trait BackgroundRemover: Send + Sync {
    fn name(&self) -> &'static str;
    fn remove(&self, image: &DynamicImage) -> Result<RgbaImage, RemovalError>;
}

/// Keys out the dominant border color.
///
/// The background is estimated as the mean color of the outermost pixel
/// ring. Pixels within `tolerance` (Euclidean RGB distance) of it become fully
/// transparent, pixels beyond `tolerance + feather` keep their alpha, and the
/// band in between ramps linearly.
#[derive(Debug, Clone, Copy)]
pub struct BorderKeyRemover {
    pub tolerance: f32,
    pub feather: f32,
}

impl Default for BorderKeyRemover {
    fn default() -> Self {
        Self {
            tolerance: 48.0,
            feather: 32.0,
        }
    }
}

impl BorderKeyRemover {
    pub fn new(tolerance: f32, feather: f32) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
            feather: feather.max(0.0),
        }
    }

    fn key_alpha(&self, distance: f32) -> f32 {
        if distance <= self.tolerance {
            0.0
        } else if self.feather <= f32::EPSILON || distance >= self.tolerance + self.feather {
            1.0
        } else {
            (distance - self.tolerance) / self.feather
        }
    }
}

impl BackgroundRemover for BorderKeyRemover {
    fn name(&self) -> &'static str {
        "border-key"
    }

    fn remove(&self, image: &DynamicImage) -> Result<RgbaImage, RemovalError> {
        let mut rgba = image.to_rgba8();
        let key = estimate_border_color(&rgba).ok_or(RemovalError::EmptyImage)?;

        for pixel in rgba.pixels_mut() {
            let alpha = self.key_alpha(color_distance(*pixel, key));
            let keyed = (f32::from(pixel[3]) * alpha).round().clamp(0.0, 255.0) as u8;
            *pixel = if keyed == 0 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([pixel[0], pixel[1], pixel[2], keyed])
            };
        }

        Ok(rgba)
    }
}

fn estimate_border_color(image: &RgbaImage) -> Option<[f32; 3]> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let mut sum = [0f64; 3];
    let mut count = 0u64;
    for (x, y, pixel) in image.enumerate_pixels() {
        if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
            for (acc, channel) in sum.iter_mut().zip(pixel.0) {
                *acc += f64::from(channel);
            }
            count += 1;
        }
    }

    let n = count as f64;
    Some([
        (sum[0] / n) as f32,
        (sum[1] / n) as f32,
        (sum[2] / n) as f32,
    ])
}

fn color_distance(pixel: Rgba<u8>, key: [f32; 3]) -> f32 {
    pixel
        .0
        .iter()
        .zip(key)
        .map(|(&c, k)| (f32::from(c) - k).powi(2))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
#[path = "tests/removal_tests.rs"]
mod tests;
