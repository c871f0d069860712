//! Viewer configuration
//!
//! Read from an optional JSON file; every field falls back to its default,
//! so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use grove_render::{RendererOptions, ViewMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "grove.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Usage(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub mode: ViewMode,
    /// JSON array of trees; a demo forest is generated when unset
    pub forest_file: Option<PathBuf>,
    pub demo_trees: usize,
    /// Fixed seed for the demo forest, random when unset
    pub demo_seed: Option<u64>,
    pub renderer: RendererOptions,
    /// Render once to this PNG instead of opening a window
    pub snapshot: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            mode: ViewMode::Forest,
            forest_file: None,
            demo_trees: 24,
            demo_seed: None,
            renderer: RendererOptions::default(),
            snapshot: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// Defaults when the file does not exist; errors only for unreadable or
    /// malformed files.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(forest) = &args.forest_file {
            self.forest_file = Some(forest.clone());
        }
        if let Some(snapshot) = &args.snapshot {
            self.snapshot = Some(snapshot.clone());
        }
    }
}

/// Command line overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub forest_file: Option<PathBuf>,
    pub mode: Option<ViewMode>,
    pub snapshot: Option<PathBuf>,
}

impl CliArgs {
    pub const USAGE: &'static str =
        "usage: grove_viewer [--config <file>] [--forest <file>] [--mode forest|main] [--snapshot <png>]";

    /// Parse everything after the program name
    pub fn parse<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || {
                args.next()
                    .ok_or_else(|| ConfigError::Usage(format!("{flag} needs a value\n{}", Self::USAGE)))
            };
            match flag.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value()?)),
                "--forest" => parsed.forest_file = Some(PathBuf::from(value()?)),
                "--snapshot" => parsed.snapshot = Some(PathBuf::from(value()?)),
                "--mode" => {
                    parsed.mode = Some(match value()?.as_str() {
                        "forest" => ViewMode::Forest,
                        "main" | "main_tree" => ViewMode::MainTree,
                        other => return Err(ConfigError::Usage(format!("unknown mode {other:?}\n{}", Self::USAGE))),
                    })
                }
                other => return Err(ConfigError::Usage(format!("unknown argument {other:?}\n{}", Self::USAGE))),
            }
        }
        Ok(parsed)
    }
}
