//! Background construction and alpha compositing for the add-background route.

use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, ImageFormat, Rgba, RgbaImage};
use shared::domain::{DataUri, HexColor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("cannot identify image data: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode PNG: {0}")]
    Encode(image::ImageError),
}

/// What goes behind the cutout.
pub enum Backdrop {
    Solid(HexColor),
    Image(DynamicImage),
}

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ComposeError> {
    image::load_from_memory(bytes).map_err(ComposeError::Decode)
}

/// Fully opaque layer of the given size; image backdrops are stretched with
/// Lanczos resampling.
pub fn build_background(backdrop: &Backdrop, width: u32, height: u32) -> RgbaImage {
    match backdrop {
        Backdrop::Solid(color) => {
            let [r, g, b] = color.rgb();
            RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]))
        }
        Backdrop::Image(image) => image
            .resize_exact(width, height, FilterType::Lanczos3)
            .to_rgba8(),
    }
}

/// Porter-Duff "over": `foreground` on top of `background`. Both layers must
/// share dimensions.
pub fn alpha_composite(background: &RgbaImage, foreground: &RgbaImage) -> RgbaImage {
    debug_assert_eq!(background.dimensions(), foreground.dimensions());
    let (width, height) = foreground.dimensions();
    RgbaImage::from_fn(width, height, |x, y| {
        over(*background.get_pixel(x, y), *foreground.get_pixel(x, y))
    })
}

fn over(back: Rgba<u8>, front: Rgba<u8>) -> Rgba<u8> {
    let fa = f32::from(front[3]) / 255.0;
    let ba = f32::from(back[3]) / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    if out_a <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let fc = f32::from(front[i]);
        let bc = f32::from(back[i]);
        ((fc * fa + bc * ba * (1.0 - fa)) / out_a).round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Composite `foreground` over `backdrop`, drop the alpha channel and return
/// the PNG-encoded result.
pub fn compose_png(foreground: &DynamicImage, backdrop: &Backdrop) -> Result<Vec<u8>, ComposeError> {
    let foreground = foreground.to_rgba8();
    let (width, height) = foreground.dimensions();
    let background = build_background(backdrop, width, height);
    let composed = alpha_composite(&background, &foreground);
    encode_png(&DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(composed).to_rgb8()))
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ComposeError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(ComposeError::Encode)?;
    Ok(buffer.into_inner())
}

pub fn png_data_uri(image: &DynamicImage) -> Result<DataUri, ComposeError> {
    Ok(DataUri::png(&encode_png(image)?))
}

#[cfg(test)]
#[path = "tests/compose_tests.rs"]
mod tests;
