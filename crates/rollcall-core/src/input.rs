//! Image input boundary: filesystem paths and base64 data URIs.
//!
//! Malformed input of either kind yields an [`InputError`], never a
//! panic; the caller decides how to surface it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read image file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image bytes: {0}")]
    Decode(#[from] image::ImageError),
    #[error("malformed data URI: missing ';base64,' separator")]
    MalformedDataUri,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Read and decode a raster image from disk.
pub fn load_from_path(path: &Path) -> Result<DynamicImage, InputError> {
    let bytes = std::fs::read(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Decode an image from a `<mime>;base64,<payload>` data URI, with or
/// without the leading `data:` scheme.
pub fn decode_data_uri(uri: &str) -> Result<DynamicImage, InputError> {
    let trimmed = uri.trim();
    let trimmed = trimmed.strip_prefix("data:").unwrap_or(trimmed);
    let (_mime, payload) = trimmed
        .split_once(";base64,")
        .ok_or(InputError::MalformedDataUri)?;

    let bytes = BASE64.decode(payload.trim())?;
    Ok(image::load_from_memory(&bytes)?)
}
