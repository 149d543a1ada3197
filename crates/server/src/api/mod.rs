use std::sync::Arc;

use image::DynamicImage;
use shared::{
    domain::{DataUri, HexColor, PayloadError},
    error::ApiError,
    protocol::AddBackgroundRequest,
};

use crate::{
    compose::{compose_png, decode_image, png_data_uri, Backdrop},
    removal::BackgroundRemover,
};

const MEBIBYTE: usize = 1024 * 1024;

#[derive(Clone)]
pub struct ApiContext {
    pub remover: Arc<dyn BackgroundRemover>,
    pub max_upload_bytes: usize,
}

/// Upload as it came off the multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

pub fn remove_background(ctx: &ApiContext, upload: Option<ImageUpload>) -> Result<DataUri, ApiError> {
    let upload = upload.ok_or_else(|| ApiError::validation("No image provided"))?;
    match upload.filename.as_deref() {
        None => return Err(ApiError::validation("No image provided")),
        Some("") => return Err(ApiError::validation("No image selected")),
        Some(_) => {}
    }
    if upload.bytes.len() > ctx.max_upload_bytes {
        return Err(too_large(ctx.max_upload_bytes));
    }

    let image = decode_image(&upload.bytes).map_err(internal)?;
    let cutout = ctx.remover.remove(&image).map_err(internal)?;
    tracing::debug!(
        remover = ctx.remover.name(),
        width = cutout.width(),
        height = cutout.height(),
        "background removed"
    );
    png_data_uri(&DynamicImage::ImageRgba8(cutout)).map_err(internal)
}

pub fn add_background(req: &AddBackgroundRequest) -> Result<DataUri, ApiError> {
    let foreground = req
        .foreground
        .as_deref()
        .ok_or_else(|| ApiError::validation("No foreground image provided"))?;
    let foreground = decode_payload(foreground, "Invalid foreground image format")?;

    let backdrop = if let Some(color) = non_empty(req.background_color.as_deref()) {
        let color = HexColor::parse(color).map_err(|e| ApiError::validation(e.to_string()))?;
        Backdrop::Solid(color)
    } else if let Some(background) = non_empty(req.background_image.as_deref()) {
        Backdrop::Image(decode_payload(background, "Invalid background image format")?)
    } else {
        return Err(ApiError::validation("No background color or image provided"));
    };

    let png = compose_png(&foreground, &backdrop).map_err(internal)?;
    Ok(DataUri::png(&png))
}

pub fn too_large(max_upload_bytes: usize) -> ApiError {
    ApiError::validation(format!(
        "File too large. Maximum size is {}MB",
        max_upload_bytes / MEBIBYTE
    ))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn decode_payload(raw: &str, format_message: &str) -> Result<DynamicImage, ApiError> {
    let bytes = DataUri::new(raw).decode().map_err(|e| match e {
        PayloadError::MissingSeparator => ApiError::validation(format_message),
        other => internal(other),
    })?;
    decode_image(&bytes).map_err(internal)
}

fn internal(err: impl std::fmt::Display) -> ApiError {
    ApiError::internal(err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
