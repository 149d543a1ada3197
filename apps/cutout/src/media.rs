use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::ImageFile;
use shared::domain::DataUri;

/// Load a local file the way a file input would hand it over: name, guessed
/// media type and raw bytes.
pub fn read_image_file(path: &Path) -> anyhow::Result<ImageFile> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(ImageFile::new(name, mime_type, bytes))
}

pub fn save_data_uri(dir: &Path, filename: &str, image: &DataUri) -> anyhow::Result<PathBuf> {
    let bytes = image
        .decode()
        .with_context(|| format!("image for {filename} is not a base64 data URI"))?;
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(filename);
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
#[path = "tests/media_tests.rs"]
mod tests;
