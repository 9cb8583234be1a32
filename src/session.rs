//! A review session: show one photo at a time and react to input.
//!
//! The session composes a [`ReviewCursor`] with an [`ImageDecoder`] and drives
//! whatever [`Display`] it is given:
//!
//! ```text
//! start ──▶ cursor.first_file ──▶ decode ──▶ compute_layout ──▶ display
//!                                   ▲                              │
//!                                   └──── cursor.advance ◀── accept/reject
//! ```
//!
//! Input is consumed in arrival order on a single thread. The session ends on
//! quit, window close, exhaustion of the directory, or a decode failure under
//! [`DecodePolicy::Abort`]. Whichever way it ends, decisions are saved exactly
//! once and a [`SessionReport`] is left behind.

use crate::config::ViewerConfig;
use crate::decisions::{Decision, PersistReport};
use crate::display::{Display, InputEvent, LogicalKey};
use crate::imaging::{
    DecodeError, Dimensions, ImageDecoder, Layout, PreparedImage, max_bounds, prepare_for_display,
};
use crate::review::ReviewCursor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

/// What to do when a photo cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// End the session.
    #[default]
    Abort,
    /// Log a warning and move on to the next photo, leaving it undecided.
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Screen area kept free around the photo.
    pub padding: Dimensions,
    /// Accept/reject input is ignored for this long after the session is created.
    pub startup_grace: Duration,
    pub decode_policy: DecodePolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

impl SessionSettings {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            padding: config.padding(),
            startup_grace: config.startup_grace(),
            decode_policy: config.review.on_decode_error,
        }
    }
}

/// Why a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// Escape was pressed or the window was closed.
    Quit,
    /// No undecided photos are left.
    Exhausted,
    /// A photo could not be decoded under [`DecodePolicy::Abort`].
    DecodeFailed(DecodeError),
}

/// Summary left behind when a session ends.
#[derive(Debug)]
pub struct SessionReport {
    pub end: SessionEnd,
    /// Verdicts recorded during this session.
    pub decided_this_session: usize,
    /// Totals across this and earlier sessions.
    pub liked: usize,
    pub disliked: usize,
    /// `None` if the decisions had already been saved.
    pub persist: Option<PersistReport>,
}

/// Whether the caller should keep feeding the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Finished,
}

pub struct ViewerSession<D> {
    cursor: ReviewCursor,
    decoder: D,
    settings: SessionSettings,
    /// Set when the first photo is about to be shown.
    started_at: Option<Instant>,
    max: Option<Dimensions>,
    layout: Option<Layout>,
    finished: bool,
    report: Option<SessionReport>,
}

impl<D: ImageDecoder> ViewerSession<D> {
    pub fn new(cursor: ReviewCursor, decoder: D, settings: SessionSettings) -> Self {
        Self {
            cursor,
            decoder,
            settings,
            started_at: None,
            max: None,
            layout: None,
            finished: false,
            report: None,
        }
    }

    /// Whether there is at least one undecided photo to show.
    pub fn has_pending(&mut self) -> bool {
        self.cursor.first_file().is_some()
    }

    /// Fix the image bounds from the screen and show the first undecided photo.
    pub fn start<V: Display + ?Sized>(&mut self, display: &mut V) -> Flow {
        if self.is_finished() {
            return Flow::Finished;
        }
        self.started_at = Some(Instant::now());
        let screen = display.screen_size();
        let max = max_bounds(screen, self.settings.padding);
        self.max = Some(max);
        log::info!("screen {screen}, photos fit within {max}");

        match self.cursor.first_file() {
            Some(path) => self.load_and_display(path, display),
            None => {
                log::info!("nothing left to review");
                self.finish(SessionEnd::Exhausted, display)
            }
        }
    }

    /// React to one input event.
    pub fn handle_event<V: Display + ?Sized>(
        &mut self,
        event: InputEvent,
        display: &mut V,
    ) -> Flow {
        if self.is_finished() {
            return Flow::Finished;
        }
        let decision = match event {
            InputEvent::Close | InputEvent::Key(LogicalKey::Quit) => {
                return self.finish(SessionEnd::Quit, display);
            }
            InputEvent::Key(LogicalKey::Accept) => Decision::Liked,
            InputEvent::Key(LogicalKey::Reject) => Decision::Disliked,
        };

        if self.in_startup_grace() {
            log::debug!("ignoring {event:?} during startup grace period");
            return Flow::Continue;
        }

        if let Some(path) = self.cursor.current_file() {
            log::info!("{} {path}", decision.label());
        }
        self.cursor.decide(decision);
        match self.cursor.advance() {
            Some(next) => self.load_and_display(next, display),
            None => self.finish(SessionEnd::Exhausted, display),
        }
    }

    /// Drain every pending event from `display`.
    pub fn pump<V: Display + ?Sized>(&mut self, display: &mut V) -> Flow {
        while !self.is_finished() {
            let Some(event) = display.poll_event() else {
                break;
            };
            self.handle_event(event, display);
        }
        if self.is_finished() {
            Flow::Finished
        } else {
            Flow::Continue
        }
    }

    /// Run a whole session against a polling display.
    ///
    /// Returns the report once the session ends.
    pub fn run<V: Display + ?Sized>(mut self, display: &mut V) -> Option<SessionReport> {
        if self.start(display) == Flow::Continue {
            while self.pump(display) == Flow::Continue {
                display.wait_frame();
            }
        }
        self.into_report()
    }

    /// End the session without a display, e.g. when there is nothing to show.
    pub fn stop(&mut self, end: SessionEnd) {
        if self.is_finished() {
            return;
        }
        let persist = self.cursor.persist();
        let book = self.cursor.book();
        let report = SessionReport {
            end,
            decided_this_session: self.cursor.decided_this_session(),
            liked: book.count(Decision::Liked),
            disliked: book.count(Decision::Disliked),
            persist,
        };
        log::info!(
            "session ended ({:?}) after {} decisions",
            report.end,
            report.decided_this_session
        );
        self.finished = true;
        self.report = Some(report);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    /// Hand over the report. The session stays finished.
    pub fn take_report(&mut self) -> Option<SessionReport> {
        self.report.take()
    }

    pub fn into_report(mut self) -> Option<SessionReport> {
        self.take_report()
    }

    pub fn cursor(&self) -> &ReviewCursor {
        &self.cursor
    }

    /// Layout of the photo on screen, if one has been shown.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Decode `path`, lay it out and hand it to the display.
    ///
    /// Under [`DecodePolicy::Skip`] undecodable photos are passed over until
    /// one decodes or the directory runs out.
    fn load_and_display<V: Display + ?Sized>(&mut self, path: String, display: &mut V) -> Flow {
        let mut path = path;
        loop {
            let screen = display.screen_size();
            let max = match self.max {
                Some(max) => max,
                None => {
                    let max = max_bounds(screen, self.settings.padding);
                    self.max = Some(max);
                    max
                }
            };

            let error = match prepare_for_display(&self.decoder, Path::new(&path), max, screen) {
                Ok(PreparedImage { image, layout }) => {
                    display.configure_surface(&layout);
                    display.present(&path, image, &layout);
                    self.layout = Some(layout);
                    return Flow::Continue;
                }
                Err(e) => e,
            };

            match self.settings.decode_policy {
                DecodePolicy::Abort => {
                    log::error!("{error}");
                    return self.finish(SessionEnd::DecodeFailed(error), display);
                }
                DecodePolicy::Skip => {
                    log::warn!("{error}; skipping");
                    match self.cursor.advance() {
                        Some(next) => path = next,
                        None => return self.finish(SessionEnd::Exhausted, display),
                    }
                }
            }
        }
    }

    fn in_startup_grace(&self) -> bool {
        self.started_at
            .is_none_or(|t| t.elapsed() < self.settings.startup_grace)
    }

    fn finish<V: Display + ?Sized>(&mut self, end: SessionEnd, display: &mut V) -> Flow {
        self.stop(end);
        display.close();
        Flow::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decisions::{DecisionBook, DecisionFiles};
    use crate::imaging::backend::tests::MockDecoder;
    use crate::test_helpers::ScriptedDisplay;
    use std::fs;
    use tempfile::TempDir;

    const ACCEPT: InputEvent = InputEvent::Key(LogicalKey::Accept);
    const REJECT: InputEvent = InputEvent::Key(LogicalKey::Reject);
    const QUIT: InputEvent = InputEvent::Key(LogicalKey::Quit);

    fn settings() -> SessionSettings {
        SessionSettings {
            startup_grace: Duration::ZERO,
            ..SessionSettings::default()
        }
    }

    fn decoder_for(names: &[&str]) -> MockDecoder {
        names
            .iter()
            .fold(MockDecoder::new(), |d, n| d.with_image(n, 4000, 2000))
    }

    fn session(
        tmp: &TempDir,
        names: &[&str],
        book: DecisionBook,
        decoder: MockDecoder,
        settings: SessionSettings,
    ) -> ViewerSession<MockDecoder> {
        let files = DecisionFiles::in_dir(tmp.path(), "liked.txt", "disliked.txt");
        let entries: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let cursor = ReviewCursor::from_entries(entries, book, files);
        ViewerSession::new(cursor, decoder, settings)
    }

    fn read(tmp: &TempDir, name: &str) -> String {
        fs::read_to_string(tmp.path().join(name)).unwrap()
    }

    // =========================================================================
    // Review flow
    // =========================================================================

    #[test]
    fn accept_and_reject_walk_the_directory() {
        let tmp = TempDir::new().unwrap();
        let names = ["a.jpg", "b.jpg", "c.jpg"];
        let s = session(&tmp, &names, DecisionBook::new(), decoder_for(&names), settings());
        let mut display = ScriptedDisplay::new(vec![ACCEPT, REJECT, ACCEPT]);

        let report = s.run(&mut display).unwrap();

        assert!(matches!(report.end, SessionEnd::Exhausted));
        assert_eq!(display.presented, vec!["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!((report.liked, report.disliked), (2, 1));
        assert_eq!(report.decided_this_session, 3);
        assert!(display.closed);
        assert_eq!(read(&tmp, "liked.txt"), "a.jpg\nc.jpg\n");
        assert_eq!(read(&tmp, "disliked.txt"), "b.jpg\n");
    }

    #[test]
    fn previously_decided_photos_are_never_shown() {
        let tmp = TempDir::new().unwrap();
        let names = ["a.jpg", "b.jpg", "c.jpg"];
        let mut book = DecisionBook::new();
        book.record("b.jpg", Decision::Liked);
        let decoder = decoder_for(&names);
        let s = session(&tmp, &names, book, decoder, settings());
        let mut display = ScriptedDisplay::new(vec![REJECT, REJECT]);

        let report = s.run(&mut display).unwrap();

        assert_eq!(display.presented, vec!["a.jpg", "c.jpg"]);
        assert_eq!((report.liked, report.disliked), (1, 2));
    }

    #[test]
    fn quit_keeps_remaining_photos_undecided() {
        let tmp = TempDir::new().unwrap();
        let names = ["a.jpg", "b.jpg", "c.jpg"];
        let s = session(&tmp, &names, DecisionBook::new(), decoder_for(&names), settings());
        let mut display = ScriptedDisplay::new(vec![ACCEPT, QUIT, ACCEPT]);

        let report = s.run(&mut display).unwrap();

        assert!(matches!(report.end, SessionEnd::Quit));
        assert_eq!(display.presented, vec!["a.jpg", "b.jpg"]);
        assert_eq!(read(&tmp, "liked.txt"), "a.jpg\n");
        // The event after quit is never consumed
        assert_eq!(display.remaining_events(), 1);
    }

    #[test]
    fn window_close_ends_session() {
        let tmp = TempDir::new().unwrap();
        let names = ["a.jpg"];
        let s = session(&tmp, &names, DecisionBook::new(), decoder_for(&names), settings());
        let mut display = ScriptedDisplay::new(vec![InputEvent::Close]);

        let report = s.run(&mut display).unwrap();
        assert!(matches!(report.end, SessionEnd::Quit));
        assert_eq!(report.decided_this_session, 0);
    }

    #[test]
    fn all_decided_ends_immediately_and_still_persists() {
        let tmp = TempDir::new().unwrap();
        let names = ["a.jpg"];
        let mut book = DecisionBook::new();
        book.record("a.jpg", Decision::Disliked);
        let s = session(&tmp, &names, book, decoder_for(&names), settings());
        let mut display = ScriptedDisplay::new(vec![]);

        let report = s.run(&mut display).unwrap();

        assert!(matches!(report.end, SessionEnd::Exhausted));
        assert!(display.presented.is_empty());
        assert!(report.persist.unwrap().all_ok());
        assert_eq!(read(&tmp, "disliked.txt"), "a.jpg\n");
        assert_eq!(read(&tmp, "liked.txt"), "");
    }

    #[test]
    fn stop_without_display_persists() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp, &[], DecisionBook::new(), MockDecoder::new(), settings());

        assert!(!s.has_pending());
        s.stop(SessionEnd::Exhausted);
        s.stop(SessionEnd::Quit);

        let report = s.into_report().unwrap();
        assert!(matches!(report.end, SessionEnd::Exhausted));
        assert!(tmp.path().join("liked.txt").exists());
    }

    // =========================================================================
    // Layout and display configuration
    // =========================================================================

    #[test]
    fn surface_is_sized_to_fitted_content() {
        let tmp = TempDir::new().unwrap();
        let decoder = MockDecoder::new()
            .with_image("wide.jpg", 4000, 2000)
            .with_image("small.jpg", 800, 600);
        let s = session(
            &tmp,
            &["small.jpg", "wide.jpg"],
            DecisionBook::new(),
            decoder,
            settings(),
        );
        // 2020x1180 screen minus 100px padding → 1920x1080 bounds
        let mut display = ScriptedDisplay::new(vec![ACCEPT, QUIT]);

        s.run(&mut display);

        let sizes: Vec<(u32, u32)> = display
            .configured
            .iter()
            .map(|l| (l.content_width, l.content_height))
            .collect();
        assert_eq!(sizes, vec![(800, 600), (1920, 960)]);
        assert_eq!(
            (display.configured[1].window_x, display.configured[1].window_y),
            (50, 110)
        );
    }

    #[test]
    fn bounds_come_from_screen_minus_padding() {
        let tmp = TempDir::new().unwrap();
        let decoder = MockDecoder::new().with_image("a.jpg", 2000, 2000);
        let s = session(
            &tmp,
            &["a.jpg"],
            DecisionBook::new(),
            decoder,
            SessionSettings {
                padding: Dimensions::new(20, 180),
                ..settings()
            },
        );
        let mut display = ScriptedDisplay::new(vec![QUIT]);

        s.run(&mut display);

        // 1180 - 180 = 1000 high
        assert_eq!(display.configured[0].content_size(), Dimensions::new(1000, 1000));
    }

    // =========================================================================
    // Startup grace
    // =========================================================================

    #[test]
    fn decisions_ignored_during_startup_grace() {
        let tmp = TempDir::new().unwrap();
        let names = ["a.jpg", "b.jpg"];
        let s = session(
            &tmp,
            &names,
            DecisionBook::new(),
            decoder_for(&names),
            SessionSettings {
                startup_grace: Duration::from_secs(3600),
                ..settings()
            },
        );
        let mut display = ScriptedDisplay::new(vec![ACCEPT, REJECT, QUIT]);

        let report = s.run(&mut display).unwrap();

        assert!(matches!(report.end, SessionEnd::Quit));
        assert_eq!(display.presented, vec!["a.jpg"]);
        assert_eq!(report.decided_this_session, 0);
    }

    #[test]
    fn startup_grace_counts_from_start_not_construction() {
        let tmp = TempDir::new().unwrap();
        let names = ["a.jpg", "b.jpg"];
        let s = session(
            &tmp,
            &names,
            DecisionBook::new(),
            decoder_for(&names),
            SessionSettings {
                startup_grace: Duration::from_millis(500),
                ..settings()
            },
        );
        // Window setup happens between construction and start.
        std::thread::sleep(Duration::from_millis(700));
        let mut display = ScriptedDisplay::new(vec![ACCEPT, QUIT]);

        let report = s.run(&mut display).unwrap();

        assert_eq!(report.decided_this_session, 0);
        assert_eq!(display.presented, vec!["a.jpg"]);
    }

    #[test]
    fn input_before_start_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let names = ["a.jpg"];
        let mut s = session(&tmp, &names, DecisionBook::new(), decoder_for(&names), settings());
        let mut display = ScriptedDisplay::new(vec![]);

        assert_eq!(s.handle_event(ACCEPT, &mut display), Flow::Continue);
        assert_eq!(s.cursor().decided_this_session(), 0);
    }

    // =========================================================================
    // Decode failures
    // =========================================================================

    #[test]
    fn decode_failure_aborts_by_default() {
        let tmp = TempDir::new().unwrap();
        let decoder = MockDecoder::new().with_image("a.jpg", 100, 100);
        let s = session(
            &tmp,
            &["a.jpg", "broken.jpg", "c.jpg"],
            DecisionBook::new(),
            decoder,
            settings(),
        );
        let mut display = ScriptedDisplay::new(vec![ACCEPT, ACCEPT]);

        let report = s.run(&mut display).unwrap();

        assert!(matches!(report.end, SessionEnd::DecodeFailed(_)));
        assert_eq!(display.presented, vec!["a.jpg"]);
        assert!(display.closed);
        assert_eq!(read(&tmp, "liked.txt"), "a.jpg\n");
    }

    #[test]
    fn decode_failure_on_first_photo_aborts() {
        let tmp = TempDir::new().unwrap();
        let s = session(
            &tmp,
            &["broken.jpg"],
            DecisionBook::new(),
            MockDecoder::new(),
            settings(),
        );
        let mut display = ScriptedDisplay::new(vec![]);

        let report = s.run(&mut display).unwrap();
        assert!(matches!(report.end, SessionEnd::DecodeFailed(_)));
        assert!(report.persist.is_some());
    }

    #[test]
    fn skip_policy_moves_past_broken_photos_undecided() {
        let tmp = TempDir::new().unwrap();
        let decoder = MockDecoder::new()
            .with_image("a.jpg", 100, 100)
            .with_image("d.jpg", 100, 100);
        let s = session(
            &tmp,
            &["a.jpg", "b.jpg", "c.jpg", "d.jpg"],
            DecisionBook::new(),
            decoder,
            SessionSettings {
                decode_policy: DecodePolicy::Skip,
                ..settings()
            },
        );
        let mut display = ScriptedDisplay::new(vec![ACCEPT, REJECT]);

        let report = s.run(&mut display).unwrap();

        assert!(matches!(report.end, SessionEnd::Exhausted));
        assert_eq!(display.presented, vec!["a.jpg", "d.jpg"]);
        assert_eq!(read(&tmp, "liked.txt"), "a.jpg\n");
        assert_eq!(read(&tmp, "disliked.txt"), "d.jpg\n");
    }

    #[test]
    fn skip_policy_with_only_broken_photos_is_exhausted() {
        let tmp = TempDir::new().unwrap();
        let s = session(
            &tmp,
            &["x.jpg", "y.jpg"],
            DecisionBook::new(),
            MockDecoder::new(),
            SessionSettings {
                decode_policy: DecodePolicy::Skip,
                ..settings()
            },
        );
        let mut display = ScriptedDisplay::new(vec![]);

        let report = s.run(&mut display).unwrap();
        assert!(matches!(report.end, SessionEnd::Exhausted));
        assert!(display.presented.is_empty());
    }

    #[test]
    fn events_after_finish_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let names = ["a.jpg", "b.jpg"];
        let mut s = session(&tmp, &names, DecisionBook::new(), decoder_for(&names), settings());
        let mut display = ScriptedDisplay::new(vec![]);

        assert_eq!(s.start(&mut display), Flow::Continue);
        assert_eq!(s.handle_event(QUIT, &mut display), Flow::Finished);
        assert_eq!(s.handle_event(ACCEPT, &mut display), Flow::Finished);
        assert_eq!(s.cursor().book().len(), 0);
        assert_eq!(display.close_calls, 1);
    }
}
