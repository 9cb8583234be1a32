//! Image decoding and on-screen fitting.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` → RGBA8 |
//! | **Fit to screen** | [`compute_layout`], pure arithmetic |
//! | **Shrink for upload** | `image::imageops::resize` to [`texture_size`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for fit and centering math (unit testable)
//! - **Backend**: [`ImageDecoder`] trait + [`RustDecoder`]
//! - **Operations**: Decode + layout in one step for the session

pub mod backend;
mod calculations;
pub mod operations;
pub mod rust_backend;

pub use backend::{DecodeError, DecodedImage, Dimensions, ImageDecoder, has_supported_extension};
pub use calculations::{Layout, center_on_screen, compute_layout, max_bounds, texture_size};
pub use operations::{PreparedImage, prepare_for_display, resize_for_texture};
pub use rust_backend::{RustDecoder, supported_input_extensions};
