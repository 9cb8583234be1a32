//! Viewer configuration.
//!
//! Loaded from an optional `photo-triage.toml` in the working directory, next
//! to the decision lists. Every key has a default, so the file only needs the
//! values being changed.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [window]
//! title = "P H O T O S"
//! padding = [100, 100]            # Screen area kept free around the photo
//! frame_rate = 30                 # Redraw cap (frames per second)
//! startup_grace_ms = 250          # Like/dislike keys ignored right after launch
//! fallback_screen = [1920, 1080]  # Used when the monitor size is unknown
//!
//! [decisions]
//! liked_file = "liked_photos.txt"
//! disliked_file = "disliked_photos.txt"
//!
//! [review]
//! on_decode_error = "abort"       # "abort" ends the session, "skip" moves on
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::decisions::DecisionFiles;
use crate::imaging::Dimensions;
use crate::session::DecodePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "photo-triage.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub decisions: DecisionsConfig,
    pub review: ReviewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    /// Horizontal and vertical space subtracted from the screen size.
    pub padding: [u32; 2],
    pub frame_rate: u32,
    pub startup_grace_ms: u64,
    pub fallback_screen: [u32; 2],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "P H O T O S".to_string(),
            padding: [100, 100],
            frame_rate: 30,
            startup_grace_ms: 250,
            fallback_screen: [1920, 1080],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecisionsConfig {
    pub liked_file: String,
    pub disliked_file: String,
}

impl Default for DecisionsConfig {
    fn default() -> Self {
        Self {
            liked_file: "liked_photos.txt".to_string(),
            disliked_file: "disliked_photos.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReviewConfig {
    pub on_decode_error: DecodePolicy,
}

impl ViewerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.window;
        if !(1..=240).contains(&window.frame_rate) {
            return Err(ConfigError::Validation(format!(
                "window.frame_rate must be 1-240, got {}",
                window.frame_rate
            )));
        }
        if window.fallback_screen[0] <= window.padding[0]
            || window.fallback_screen[1] <= window.padding[1]
        {
            return Err(ConfigError::Validation(
                "window.fallback_screen must be larger than window.padding".into(),
            ));
        }
        let decisions = &self.decisions;
        if decisions.liked_file.trim().is_empty() || decisions.disliked_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "decisions.liked_file and decisions.disliked_file must not be empty".into(),
            ));
        }
        if decisions.liked_file == decisions.disliked_file {
            return Err(ConfigError::Validation(
                "decisions.liked_file and decisions.disliked_file must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn padding(&self) -> Dimensions {
        let [w, h] = self.window.padding;
        Dimensions::new(w, h)
    }

    pub fn fallback_screen(&self) -> Dimensions {
        let [w, h] = self.window.fallback_screen;
        Dimensions::new(w, h)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.window.frame_rate.max(1)
    }

    pub fn startup_grace(&self) -> Duration {
        Duration::from_millis(self.window.startup_grace_ms)
    }

    /// Decision list locations relative to `dir`.
    pub fn decision_files(&self, dir: &Path) -> DecisionFiles {
        DecisionFiles::in_dir(dir, &self.decisions.liked_file, &self.decisions.disliked_file)
    }
}

/// Load `photo-triage.toml` from `dir`, falling back to defaults if absent.
pub fn load_config(dir: &Path) -> Result<ViewerConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(ViewerConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: ViewerConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
