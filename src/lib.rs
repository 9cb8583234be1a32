//! # Photo Triage
//!
//! Step through the photos in a directory one at a time and sort each into
//! "liked" or "disliked". Verdicts are kept in two plain text files in the
//! working directory, so the next run picks up where the last one stopped.
//!
//! # How a Session Flows
//!
//! ```text
//! ReviewCursor ──▶ ImageDecoder ──▶ compute_layout ──▶ Display
//!  (next undecided)  (natural size)   (fit + center)     (window sized to photo)
//!        ▲                                                  │
//!        └──────────── like / dislike / quit ◀──────────────┘
//! ```
//!
//! The window is resized to each photo instead of letterboxing it: photos
//! larger than the screen (minus padding) are scaled down preserving their
//! aspect ratio, smaller ones are shown 1:1, and the window is centered.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`review`] | Directory cursor that skips decided photos and saves decisions once |
//! | [`decisions`] | Path → verdict map and the flat-file format it is stored in |
//! | [`imaging`] | Decoding via the `image` crate and pure fit-to-screen math |
//! | [`session`] | Drives cursor, decoder and display; maps input to decisions |
//! | [`display`] | The capability trait a window system must provide |
//! | [`gui`] | eframe/egui implementation of the display |
//! | [`config`] | Optional `photo-triage.toml` loading and validation |
//! | [`output`] | End-of-session summary formatting |
//!
//! # Design Decisions
//!
//! ## One Verdict per Path
//!
//! Decisions are a single map from path to [`decisions::Decision`], so a
//! photo can never be both liked and disliked. On disk they are still two
//! lists, one path per line, which are easy to feed to `xargs` or a script.
//!
//! ## Saving on Every Exit Path
//!
//! The cursor saves from its `Drop` if nothing saved it earlier, so quitting,
//! closing the window, running out of photos and failing to decode all leave
//! the lists up to date.
//!
//! ## Display as a Trait
//!
//! The session holds a [`display::Display`] rather than being a window. The
//! review logic is tested headless with a scripted display; only [`gui`]
//! knows about egui.

pub mod config;
pub mod decisions;
pub mod display;
pub mod gui;
pub mod imaging;
pub mod output;
pub mod review;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
