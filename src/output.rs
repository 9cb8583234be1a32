//! CLI output formatting for the end-of-session summary.
//!
//! ```text
//! All photos reviewed
//! Reviewed 3 photos this session
//! Totals: 10 liked, 4 disliked
//!     liked_photos.txt: 10 entries written
//!     disliked_photos.txt: write failed (permission denied)
//! ```
//!
//! Each `format_*` function returns lines and does no I/O; the `print_*`
//! wrappers write them to stdout.

use crate::decisions::{ListWrite, PersistReport};
use crate::session::{SessionEnd, SessionReport};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// One-line reason the session ended.
pub fn format_end(end: &SessionEnd) -> String {
    match end {
        SessionEnd::Quit => "Stopped early".to_string(),
        SessionEnd::Exhausted => "All photos reviewed".to_string(),
        SessionEnd::DecodeFailed(e) => format!("Stopped: {e}"),
    }
}

fn format_list_write(write: &ListWrite) -> String {
    let name = write
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| write.path.display().to_string());
    match &write.result {
        Ok(n) => format!("{name}: {} written", plural(*n, "entry", "entries")),
        Err(e) => {
            let cause = std::error::Error::source(e)
                .map(|s| s.to_string())
                .unwrap_or_else(|| e.to_string());
            format!("{name}: write failed ({cause})")
        }
    }
}

/// Lines describing what happened to each decision list.
pub fn format_persist(report: &PersistReport) -> Vec<String> {
    report
        .writes
        .iter()
        .map(|w| format!("{}{}", indent(1), format_list_write(w)))
        .collect()
}

/// Full end-of-session summary.
pub fn format_session_summary(report: &SessionReport) -> Vec<String> {
    let mut lines = vec![format_end(&report.end)];
    lines.push(format!(
        "Reviewed {} this session",
        plural(report.decided_this_session, "photo", "photos")
    ));
    lines.push(format!(
        "Totals: {} liked, {} disliked",
        report.liked, report.disliked
    ));
    if let Some(persist) = &report.persist {
        lines.extend(format_persist(persist));
    }
    lines
}

pub fn print_session_summary(report: &SessionReport) {
    for line in format_session_summary(report) {
        println!("{line}");
    }
}
