//! Shared test utilities for the photo-triage test suite.
//!
//! Provides fixture image writers and a scripted [`Display`] that replays a
//! fixed list of input events and records everything the session asks it to do.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let mut display = ScriptedDisplay::new(vec![accept, reject]);
//! let report = session.run(&mut display).unwrap();
//! assert_eq!(display.presented, vec!["a.jpg", "b.jpg"]);
//! ```

use std::collections::VecDeque;
use std::path::Path;

use image::{ImageEncoder, RgbImage};

use crate::display::{Display, InputEvent};
use crate::imaging::{DecodedImage, Dimensions, Layout};

// =========================================================================
// Fixture images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a small valid JPEG file with the given dimensions.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a small valid PNG file with the given dimensions.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

// =========================================================================
// Scripted display
// =========================================================================

/// Display that replays canned events and records what it was asked to show.
pub struct ScriptedDisplay {
    pub screen: Dimensions,
    events: VecDeque<InputEvent>,
    /// Paths passed to `present`, in order.
    pub presented: Vec<String>,
    /// Layouts passed to `configure_surface`, in order.
    pub configured: Vec<Layout>,
    pub closed: bool,
    pub close_calls: usize,
    pub frames: usize,
}

impl ScriptedDisplay {
    /// A 2020x1180 screen, so the default 100px padding leaves 1920x1080.
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self {
            screen: Dimensions::new(2020, 1180),
            events: events.into(),
            presented: Vec::new(),
            configured: Vec::new(),
            closed: false,
            close_calls: 0,
            frames: 0,
        }
    }

    pub fn remaining_events(&self) -> usize {
        self.events.len()
    }
}

impl Display for ScriptedDisplay {
    fn screen_size(&self) -> Dimensions {
        self.screen
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    fn configure_surface(&mut self, layout: &Layout) {
        self.configured.push(*layout);
    }

    fn present(&mut self, path: &str, _image: DecodedImage, _layout: &Layout) {
        assert!(!self.closed, "present after close: {path}");
        self.presented.push(path.to_string());
    }

    fn close(&mut self) {
        self.closed = true;
        self.close_calls += 1;
    }

    fn wait_frame(&mut self) {
        self.frames += 1;
        // Out of script: behave like a user closing the window.
        if self.events.is_empty() {
            self.events.push_back(InputEvent::Close);
        }
    }
}
