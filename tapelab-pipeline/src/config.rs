//! Run configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runner::DEFAULT_TOP_N;

/// Errors from loading a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a single pipeline run.
///
/// Every field has a default so a config file only needs to state what
/// it overrides; CLI flags take precedence over the file at the call
/// site. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Input CSV path. Optional here because the CLI may supply it.
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Directory artifacts are written under.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Row count for the top-volume views.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: None,
            output_dir: default_output_dir(),
            top_n: default_top_n(),
        }
    }
}

impl RunConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
