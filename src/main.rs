use clap::{CommandFactory, Parser};
use photo_triage::config::{self, ViewerConfig};
use photo_triage::imaging::{ImageDecoder, RustDecoder};
use photo_triage::review::ReviewCursor;
use photo_triage::session::{SessionEnd, SessionSettings, ViewerSession};
use photo_triage::{gui, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "photo-triage")]
#[command(about = "Sort the photos in a directory into liked and disliked")]
#[command(long_about = "\
Sort the photos in a directory into liked and disliked

Each undecided photo is shown in a window sized to fit the screen.

Keys:
  Enter       like the photo and show the next one
  Backspace   dislike the photo and show the next one
  Escape      stop (decisions so far are kept)

Decisions are written to liked_photos.txt and disliked_photos.txt in the
working directory, one path per line. Photos already listed there are skipped
on the next run. Settings can be changed in photo-triage.toml.")]
#[command(version)]
struct Cli {
    /// Directory of photos to review
    photos_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            eprintln!("{}", Cli::command().render_usage());
            return ExitCode::FAILURE;
        }
    };

    match run(&cli.photos_dir) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(photos_dir: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let work_dir = std::env::current_dir()?;
    let config = config::load_config(&work_dir)?;
    let session = open_session(photos_dir, &work_dir, &config)?;

    let Some(report) = review(session, &config)? else {
        return Ok(ExitCode::SUCCESS);
    };
    output::print_session_summary(&report);

    let persisted = report.persist.as_ref().is_none_or(|p| p.all_ok());
    let code = match report.end {
        SessionEnd::DecodeFailed(_) => ExitCode::FAILURE,
        _ if !persisted => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    };
    Ok(code)
}

fn open_session(
    photos_dir: &Path,
    work_dir: &Path,
    config: &ViewerConfig,
) -> Result<ViewerSession<RustDecoder>, Box<dyn std::error::Error>> {
    let decoder = RustDecoder::new();
    let cursor = ReviewCursor::open(
        photos_dir,
        decoder.supported_extensions(),
        config.decision_files(work_dir),
    )?;
    Ok(ViewerSession::new(
        cursor,
        decoder,
        SessionSettings::from_config(config),
    ))
}

/// Run the session, skipping the window entirely when nothing is left to review.
fn review(
    mut session: ViewerSession<RustDecoder>,
    config: &ViewerConfig,
) -> Result<Option<photo_triage::session::SessionReport>, Box<dyn std::error::Error>> {
    if !session.has_pending() {
        println!("==> Nothing to review in this directory");
        session.stop(SessionEnd::Exhausted);
        return Ok(session.into_report());
    }
    Ok(gui::run(session, config)?)
}
