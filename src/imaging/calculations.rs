//! Pure calculation functions for fitting images on screen.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Where and how large an image is shown.
///
/// Recomputed for every image; the display surface is resized to exactly
/// `content_width × content_height` and moved to `(window_x, window_y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Uniform scale applied to both axes. Never greater than 1.0.
    pub scale: f64,
    pub content_width: u32,
    pub content_height: u32,
    /// Top-left corner that centers the content on the screen.
    pub window_x: i32,
    pub window_y: i32,
}

impl Layout {
    pub fn content_size(&self) -> Dimensions {
        Dimensions {
            width: self.content_width,
            height: self.content_height,
        }
    }
}

/// Largest area an image may occupy: the screen minus padding on each axis.
///
/// Never returns a zero dimension, even on a screen smaller than the padding.
///
/// # Examples
/// ```
/// # use photo_triage::imaging::{Dimensions, max_bounds};
/// let screen = Dimensions { width: 1920, height: 1080 };
/// let padding = Dimensions { width: 100, height: 100 };
/// assert_eq!(max_bounds(screen, padding), Dimensions { width: 1820, height: 980 });
/// ```
pub fn max_bounds(screen: Dimensions, padding: Dimensions) -> Dimensions {
    Dimensions {
        width: screen.width.saturating_sub(padding.width).max(1),
        height: screen.height.saturating_sub(padding.height).max(1),
    }
}

/// Fit `natural` inside `max` preserving aspect ratio, then center on `screen`.
///
/// Images that already fit are shown at scale 1.0; nothing is ever upscaled.
/// Otherwise the height-constrained fit is tried first and the
/// width-constrained fit is used when that would be too wide.
///
/// The constrained axis lands exactly on the bound. The other axis is
/// truncated toward zero, and centering uses floor division on both the
/// screen and the content, so odd sizes may sit one unit off center.
///
/// `natural` must have non-zero dimensions.
///
/// # Examples
/// ```
/// # use photo_triage::imaging::{Dimensions, compute_layout};
/// let screen = Dimensions { width: 2020, height: 1180 };
/// let layout = compute_layout(
///     Dimensions { width: 4000, height: 2000 },
///     Dimensions { width: 1920, height: 1080 },
///     screen,
/// );
/// assert_eq!((layout.content_width, layout.content_height), (1920, 960));
/// assert_eq!(layout.scale, 0.48);
/// ```
pub fn compute_layout(natural: Dimensions, max: Dimensions, screen: Dimensions) -> Layout {
    debug_assert!(natural.width > 0 && natural.height > 0);

    let (scale, content_width, content_height) =
        if natural.width <= max.width && natural.height <= max.height {
            (1.0, natural.width, natural.height)
        } else {
            let aspect = natural.width as f64 / natural.height as f64;
            let candidate_width = max.height as f64 * aspect;
            if candidate_width <= max.width as f64 {
                // Height-constrained
                let scale = max.height as f64 / natural.height as f64;
                (scale, truncate(scale, natural.width), max.height)
            } else {
                // Width-constrained
                let scale = max.width as f64 / natural.width as f64;
                (scale, max.width, truncate(scale, natural.height))
            }
        };

    let (window_x, window_y) = center_on_screen(
        Dimensions {
            width: content_width,
            height: content_height,
        },
        screen,
    );

    Layout {
        scale,
        content_width,
        content_height,
        window_x,
        window_y,
    }
}

/// Top-left corner placing `content` in the middle of `screen`.
///
/// Negative when the content is larger than the screen.
pub fn center_on_screen(content: Dimensions, screen: Dimensions) -> (i32, i32) {
    let x = (screen.width / 2) as i64 - (content.width / 2) as i64;
    let y = (screen.height / 2) as i64 - (content.height / 2) as i64;
    (x as i32, y as i32)
}

/// Pixel size to upload for an image shown at `layout`.
///
/// The content size, shrunk further when its longer side exceeds `max_side`
/// (the renderer's texture limit). Aspect ratio is kept the same way
/// [`compute_layout`] keeps it.
pub fn texture_size(layout: &Layout, max_side: u32) -> Dimensions {
    let content = layout.content_size();
    let max_side = max_side.max(1);
    let longest = content.width.max(content.height);
    if longest <= max_side {
        return content;
    }
    let scale = max_side as f64 / longest as f64;
    if content.width >= content.height {
        Dimensions {
            width: max_side,
            height: truncate(scale, content.height),
        }
    } else {
        Dimensions {
            width: truncate(scale, content.width),
            height: max_side,
        }
    }
}

fn truncate(scale: f64, natural: u32) -> u32 {
    ((scale * natural as f64) as u32).max(1)
}
