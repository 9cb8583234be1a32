//! The review cursor: which photo is up next, and what has been decided.
//!
//! A [`ReviewCursor`] walks the image files directly inside one directory,
//! sorted by file name, and never stops on a path that already has a
//! [`Decision`]. The directory listing is read up front to sort it; checking
//! file types and extensions happens entry by entry as the cursor advances.
//!
//! Paths double as decision keys in a text file, so files whose names are not
//! valid UTF-8 are left out of the review with a warning.
//!
//! ```text
//! entries:  a.jpg   b.jpg   c.jpg   d.jpg
//! book:             liked   liked
//!           ^ first_file()
//!                           advance() ──────▶ d.jpg
//! ```
//!
//! Decisions are written back exactly once: by [`ReviewCursor::persist`] when
//! the session ends, or by `Drop` if the cursor goes away first.

use crate::decisions::{Decision, DecisionBook, DecisionFiles, PersistReport};
use crate::imaging::has_supported_extension;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type Entries = Box<dyn Iterator<Item = String>>;

pub struct ReviewCursor {
    entries: Entries,
    current: Option<String>,
    book: DecisionBook,
    files: DecisionFiles,
    decided_this_session: usize,
    persisted: bool,
}

impl ReviewCursor {
    /// Open `dir` for review and load earlier decisions from `files`.
    ///
    /// Only regular files whose extension is in `extensions` are offered.
    pub fn open(
        dir: &Path,
        extensions: &[&'static str],
        files: DecisionFiles,
    ) -> Result<Self, ReviewError> {
        let metadata = std::fs::metadata(dir).map_err(|source| ReviewError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(ReviewError::NotADirectory(dir.to_path_buf()));
        }

        let book = DecisionBook::load(&files);
        Ok(Self::from_entries(
            directory_entries(dir, extensions.to_vec()),
            book,
            files,
        ))
    }

    /// Build a cursor over an arbitrary entry sequence.
    pub fn from_entries<I>(entries: I, book: DecisionBook, files: DecisionFiles) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'static,
    {
        let mut entries: Entries = Box::new(entries.into_iter());
        let current = entries.next();
        Self {
            entries,
            current,
            book,
            files,
            decided_this_session: 0,
            persisted: false,
        }
    }

    /// The first undecided entry, or `None` if there is nothing to review.
    pub fn first_file(&mut self) -> Option<String> {
        let decided = self
            .current
            .as_deref()
            .is_some_and(|path| self.book.is_decided(path));
        if decided {
            self.advance()
        } else {
            self.current.clone()
        }
    }

    /// The entry under the cursor, `None` once the sequence is exhausted.
    pub fn current_file(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Step forward to the next undecided entry.
    pub fn advance(&mut self) -> Option<String> {
        loop {
            self.current = self.entries.next();
            match self.current.as_deref() {
                None => return None,
                Some(path) if self.book.is_decided(path) => continue,
                Some(path) => {
                    log::info!("looked at {} photos", self.book.len());
                    return Some(path.to_string());
                }
            }
        }
    }

    /// Record `decision` for the current entry.
    ///
    /// Returns `false` when the cursor is exhausted and nothing was recorded.
    pub fn decide(&mut self, decision: Decision) -> bool {
        let Some(path) = self.current.as_deref() else {
            return false;
        };
        if self.book.record(path, decision) {
            self.decided_this_session += 1;
        }
        true
    }

    pub fn like(&mut self) -> bool {
        self.decide(Decision::Liked)
    }

    pub fn dislike(&mut self) -> bool {
        self.decide(Decision::Disliked)
    }

    pub fn book(&self) -> &DecisionBook {
        &self.book
    }

    pub fn files(&self) -> &DecisionFiles {
        &self.files
    }

    /// Number of verdicts recorded since the cursor was opened.
    pub fn decided_this_session(&self) -> usize {
        self.decided_this_session
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Write both decision lists.
    ///
    /// Only the first call writes; later calls return `None`.
    pub fn persist(&mut self) -> Option<PersistReport> {
        if self.persisted {
            return None;
        }
        self.persisted = true;
        Some(self.book.save(&self.files))
    }
}

impl Drop for ReviewCursor {
    fn drop(&mut self) {
        if !self.persisted {
            log::debug!("review cursor dropped before session end, saving decisions");
            self.persist();
        }
    }
}

/// Supported image files directly inside `dir`, sorted by name.
///
/// The listing is read in full when iteration starts; filtering is lazy.
fn directory_entries(dir: &Path, extensions: Vec<&'static str>) -> Entries {
    let iter = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(move |entry| has_supported_extension(entry.path(), &extensions))
        .filter_map(|entry| match entry.path().to_str() {
            Some(path) => Some(path.to_string()),
            None => {
                log::warn!(
                    "skipping {}: file name is not valid UTF-8",
                    entry.path().display()
                );
                None
            }
        });
    Box::new(iter)
}
