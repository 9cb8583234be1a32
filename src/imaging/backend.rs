//! Image decoding trait and shared types.
//!
//! The [`ImageDecoder`] trait is the only thing the review session knows about
//! pixels: give it a path, get back the natural size and RGBA data, or an error.
//!
//! The production implementation is
//! [`RustDecoder`](super::rust_backend::RustDecoder), built on the `image`
//! crate. Tests use a mock that hands out canned dimensions.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Image has no pixels: {0}")]
    EmptyImage(PathBuf),
}

/// Pixel size of an image, a screen, or a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A decoded image ready to hand to a display.
///
/// `rgba` holds `width * height * 4` bytes, unpremultiplied, row-major.
/// Decoders that only report sizes (the test mock) leave it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub dimensions: Dimensions,
    pub rgba: Vec<u8>,
}

/// Trait for image decoders.
pub trait ImageDecoder {
    /// Decode the image at `path`. Both returned dimensions are non-zero.
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError>;

    /// Lowercase file extensions this decoder can read.
    fn supported_extensions(&self) -> &[&'static str];
}

impl<T: ImageDecoder + ?Sized> ImageDecoder for &T {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
        (**self).decode(path)
    }

    fn supported_extensions(&self) -> &[&'static str] {
        (**self).supported_extensions()
    }
}

/// Whether `path` has one of `extensions` (case-insensitive).
pub fn has_supported_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}
