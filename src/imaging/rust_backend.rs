//! Pure Rust image decoder built on the `image` crate.
//!
//! | Format | Decoder |
//! |---|---|
//! | JPEG, PNG, TIFF, WebP, GIF, BMP | `image` crate (pure Rust decoders) |
//!
//! Files are sniffed by content first and by extension second, so a PNG saved
//! as `.jpg` still decodes. Only the first frame of an animated GIF is shown.

use super::backend::{DecodeError, DecodedImage, Dimensions, ImageDecoder};
use image::{ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustDecoder;

impl RustDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for RustDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
        let io_error = |source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        };
        let image = ImageReader::open(path)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?
            .decode()
            .map_err(|e| DecodeError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let rgba = image.to_rgba8();
        let dimensions = Dimensions::new(rgba.width(), rgba.height());
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(DecodeError::EmptyImage(path.to_path_buf()));
        }
        Ok(DecodedImage {
            dimensions,
            rgba: rgba.into_raw(),
        })
    }

    fn supported_extensions(&self) -> &[&'static str] {
        supported_input_extensions()
    }
}
