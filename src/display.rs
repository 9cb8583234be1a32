//! The display and input boundary.
//!
//! A review session never talks to a window system directly. It holds
//! something implementing [`Display`] and asks it for the screen size,
//! pending input, and to show an image at a computed [`Layout`].
//! The eframe frontend lives in [`crate::gui`]; tests use a scripted fake.

use crate::imaging::{DecodedImage, Dimensions, Layout};

/// A discrete input the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The window was closed by the user or the window manager.
    Close,
    /// A logical key was released.
    Key(LogicalKey),
}

/// Keys with a meaning during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    /// Stop reviewing (Escape).
    Quit,
    /// Like the current photo (Enter).
    Accept,
    /// Dislike the current photo (Backspace).
    Reject,
}

/// Capabilities a review session needs from a display surface.
pub trait Display {
    /// Size of the desktop the surface lives on.
    fn screen_size(&self) -> Dimensions;

    /// Next pending input event, in arrival order.
    fn poll_event(&mut self) -> Option<InputEvent>;

    /// Resize the surface to exactly the content size, move it to the
    /// layout position and reset the viewport to match.
    fn configure_surface(&mut self, layout: &Layout);

    /// Draw `image` scaled by `layout.scale`.
    fn present(&mut self, path: &str, image: DecodedImage, layout: &Layout);

    /// Close the surface. No further calls follow.
    fn close(&mut self);

    /// Block until the next frame tick. Event-driven displays may return at once.
    fn wait_frame(&mut self) {}
}
