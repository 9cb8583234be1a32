//! Like/dislike decisions and their flat-file persistence.
//!
//! Every reviewed path carries exactly one [`Decision`]. The book is a single
//! map from path to verdict, so a path can never be both liked and disliked;
//! "undecided" simply means the path is absent.
//!
//! ## On-disk format
//!
//! Two plain text files in the working directory, one path per line, no
//! header, no escaping:
//!
//! ```text
//! liked_photos.txt        disliked_photos.txt
//! photos/a.jpg            photos/b.jpg
//! photos/c.jpg
//! ```
//!
//! Files are written sorted. Reading tolerates any order and skips blank
//! lines. A missing or unreadable file is not an error: the book starts empty
//! for that verdict and a warning is logged. Write failures are reported per
//! file so one unwritable list never prevents the other from being saved.
//!
//! Lines that are not valid UTF-8 cannot match any reviewed path, but they
//! are carried along byte for byte and written back after the sorted entries,
//! so saving never drops what an earlier run or another tool put there.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Liked,
    Disliked,
}

impl Decision {
    pub const ALL: [Decision; 2] = [Decision::Liked, Decision::Disliked];

    pub fn label(self) -> &'static str {
        match self {
            Decision::Liked => "liked",
            Decision::Disliked => "disliked",
        }
    }
}

/// Locations of the two decision lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionFiles {
    pub liked: PathBuf,
    pub disliked: PathBuf,
}

impl DecisionFiles {
    pub fn new(liked: impl Into<PathBuf>, disliked: impl Into<PathBuf>) -> Self {
        Self {
            liked: liked.into(),
            disliked: disliked.into(),
        }
    }

    /// Both lists inside `dir`.
    pub fn in_dir(dir: &Path, liked_name: &str, disliked_name: &str) -> Self {
        Self::new(dir.join(liked_name), dir.join(disliked_name))
    }

    pub fn path_for(&self, decision: Decision) -> &Path {
        match decision {
            Decision::Liked => &self.liked,
            Decision::Disliked => &self.disliked,
        }
    }
}

/// Outcome of writing one decision list.
#[derive(Debug)]
pub struct ListWrite {
    pub decision: Decision,
    pub path: PathBuf,
    /// Number of entries written.
    pub result: Result<usize, PersistError>,
}

/// Outcome of saving the whole book.
#[derive(Debug)]
pub struct PersistReport {
    pub writes: Vec<ListWrite>,
}

impl PersistReport {
    pub fn all_ok(&self) -> bool {
        self.writes.iter().all(|w| w.result.is_ok())
    }
}

/// Every decision made so far, keyed by the exact path string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionBook {
    entries: BTreeMap<String, Decision>,
    /// Non-UTF-8 lines from the loaded lists, kept verbatim.
    opaque: Vec<(Decision, Vec<u8>)>,
}

/// Lines of one decision list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLines {
    pub paths: Vec<String>,
    /// Lines that are not valid UTF-8, in file order.
    pub opaque: Vec<Vec<u8>>,
}

impl DecisionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Decision> {
        self.entries.get(path).copied()
    }

    pub fn is_decided(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Record `decision` for `path`. Returns `true` if the book changed.
    ///
    /// A later verdict replaces an earlier one.
    pub fn record(&mut self, path: &str, decision: Decision) -> bool {
        match self.entries.get_mut(path) {
            Some(existing) if *existing == decision => false,
            Some(existing) => {
                *existing = decision;
                true
            }
            None => {
                self.entries.insert(path.to_string(), decision);
                true
            }
        }
    }

    /// Total number of decided paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, decision: Decision) -> usize {
        self.entries.values().filter(|&&d| d == decision).count()
    }

    /// Paths with the given verdict, sorted.
    pub fn paths(&self, decision: Decision) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |&(_, &d)| d == decision)
            .map(|(p, _)| p.as_str())
    }

    /// Load both lists. Never fails; problems are logged and skipped.
    ///
    /// The liked list is read first. A path present in both files keeps its
    /// liked verdict.
    pub fn load(files: &DecisionFiles) -> Self {
        let mut book = Self::new();
        for decision in Decision::ALL {
            let path = files.path_for(decision);
            let ListLines { paths, opaque } = match read_list(path) {
                Ok(lines) => lines,
                Err(e) => {
                    log::warn!("{e}; starting with no {} photos", decision.label());
                    continue;
                }
            };
            if !opaque.is_empty() {
                log::warn!(
                    "{}: {} lines are not valid UTF-8; keeping them as they are",
                    path.display(),
                    opaque.len()
                );
            }
            book.opaque.extend(opaque.into_iter().map(|line| (decision, line)));
            for line in paths {
                match book.get(&line) {
                    Some(existing) if existing != decision => log::warn!(
                        "{line} is listed as both {} and {}; keeping {}",
                        existing.label(),
                        decision.label(),
                        existing.label()
                    ),
                    Some(_) => {}
                    None => {
                        book.record(&line, decision);
                    }
                }
            }
        }
        log::info!(
            "loaded {} liked and {} disliked photos",
            book.count(Decision::Liked),
            book.count(Decision::Disliked)
        );
        book
    }

    /// Write both lists. Each file is attempted regardless of the other.
    pub fn save(&self, files: &DecisionFiles) -> PersistReport {
        let writes = Decision::ALL
            .into_iter()
            .map(|decision| {
                let path = files.path_for(decision).to_path_buf();
                let opaque = self
                    .opaque
                    .iter()
                    .filter(move |(d, _)| *d == decision)
                    .map(|(_, line)| line.as_slice());
                let entries = self.paths(decision).map(str::as_bytes).chain(opaque);
                let result = write_list(&path, entries);
                if let Err(e) = &result {
                    log::warn!("{e}");
                }
                ListWrite {
                    decision,
                    path,
                    result,
                }
            })
            .collect();
        PersistReport { writes }
    }
}

/// Read a decision list, one path per line, skipping blank lines.
///
/// Lines end at `\n`; a trailing `\r` is dropped.
pub fn read_list(path: &Path) -> Result<ListLines, PersistError> {
    let content = fs::read(path).map_err(|source| PersistError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut lines = ListLines::default();
    for line in content.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        match std::str::from_utf8(line) {
            Ok(text) => lines.paths.push(text.to_string()),
            Err(_) => lines.opaque.push(line.to_vec()),
        }
    }
    Ok(lines)
}

/// Write `entries` to `path`, one per line, replacing the file.
pub fn write_list<'a>(
    path: &Path,
    entries: impl IntoIterator<Item = &'a [u8]>,
) -> Result<usize, PersistError> {
    let write_error = |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    let mut count = 0;
    for entry in entries {
        writer.write_all(entry).map_err(write_error)?;
        writer.write_all(b"\n").map_err(write_error)?;
        count += 1;
    }
    writer.flush().map_err(write_error)?;
    Ok(count)
}
