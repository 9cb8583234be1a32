//! High-level image operations.
//!
//! These functions combine the decoder with layout calculations, and shrink
//! decoded pixels to the size they are actually drawn at.

use super::backend::{DecodeError, DecodedImage, Dimensions, ImageDecoder};
use super::calculations::{Layout, compute_layout};
use image::{ImageBuffer, Rgba};
use image::imageops::{self, FilterType};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// An image decoded and laid out for the current screen.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub image: DecodedImage,
    pub layout: Layout,
}

/// Decode `path` and fit it inside `max`, centered on `screen`.
pub fn prepare_for_display(
    decoder: &impl ImageDecoder,
    path: &Path,
    max: Dimensions,
    screen: Dimensions,
) -> Result<PreparedImage> {
    let image = decoder.decode(path)?;
    let layout = compute_layout(image.dimensions, max, screen);
    log::debug!(
        "{}: {} → {}x{} at scale {:.3}",
        path.display(),
        image.dimensions,
        layout.content_width,
        layout.content_height,
        layout.scale
    );
    Ok(PreparedImage { image, layout })
}

/// Shrink `image` to `target` before it is uploaded as a texture.
///
/// Returns the image untouched when it already has that size. Photos from
/// large sensors routinely exceed GPU texture limits, and only the fitted
/// content size is ever drawn.
pub fn resize_for_texture(image: DecodedImage, target: Dimensions) -> DecodedImage {
    if image.dimensions == target {
        return image;
    }
    let natural = image.dimensions;
    let Some(buffer) = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(
        natural.width,
        natural.height,
        image.rgba.as_slice(),
    ) else {
        log::warn!("pixel buffer does not match {natural}; uploading as decoded");
        return image;
    };
    let resized = imageops::resize(&buffer, target.width, target.height, FilterType::Triangle);
    log::debug!("resized {natural} → {target} for upload");
    DecodedImage {
        dimensions: target,
        rgba: resized.into_raw(),
    }
}
