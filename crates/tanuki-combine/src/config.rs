// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Combine run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tanuki_similar::{SimilaritySource, DEFAULT_SCORE_THRESHOLD};
use thiserror::Error;

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Config file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not a valid configuration.
    #[error("invalid config {}: {source}", .path.display())]
    Serde {
        /// Config file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

fn default_threshold() -> f32 {
    DEFAULT_SCORE_THRESHOLD
}

const fn default_true() -> bool {
    true
}

/// Everything a combine run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombineConfig {
    /// Raw subject store (usually a directory).
    pub input: PathBuf,
    /// Blob to produce.
    pub output: PathBuf,
    /// Optional TOML override file.
    #[serde(default)]
    pub overrides: Option<PathBuf>,
    /// Similarity sources, applied in order.
    #[serde(default)]
    pub similarity: Vec<SimilaritySource>,
    /// Scored similarity pairs must exceed this to be kept.
    #[serde(default = "default_threshold")]
    pub score_threshold: f32,
    /// Sort amalgamation lists by level.
    #[serde(default = "default_true")]
    pub sort_amalgamations: bool,
}

impl CombineConfig {
    /// Defaults for everything but the two paths.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            overrides: None,
            similarity: Vec::new(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            sort_amalgamations: true,
        }
    }

    /// Loads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Serde {
            path: path.to_path_buf(),
            source,
        })
    }
}
