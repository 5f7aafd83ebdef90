//! Configuration loading and validation.
//!
//! The config file is JSON with explicit paths to the ONNX model and the
//! vocabulary, the model's input tensor shape, and the decoding bounds.
//! There is no default location; the path comes from the caller.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

fn default_max_caption_length() -> usize {
    20
}

fn default_beam_width() -> usize {
    5
}

/// Root configuration for a captioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the ONNX scoring model
    pub model_path: PathBuf,

    /// Path to the JSON vocabulary (ordered array of token strings)
    pub vocab_path: PathBuf,

    /// Model input tensor shape, NCHW
    pub input_shape: Vec<i64>,

    /// Maximum number of decoding steps
    #[serde(default = "default_max_caption_length")]
    pub max_caption_length: usize,

    /// Number of hypotheses tracked by the beam search
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,
}

impl Config {
    /// Load configuration from a JSON file and validate it.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::info!("Configuration loaded successfully from {}", path.display());
        Ok(config)
    }

    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "Model path cannot be empty".into(),
            ));
        }
        if self.vocab_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "Vocabulary path cannot be empty".into(),
            ));
        }
        if self.input_shape.len() != 4 {
            return Err(ConfigError::Validation(
                "Input shape must have 4 dimensions (N, C, H, W)".into(),
            ));
        }
        if self.max_caption_length == 0 {
            return Err(ConfigError::Validation(
                "Max caption length must be positive".into(),
            ));
        }
        if self.beam_width == 0 {
            return Err(ConfigError::Validation(
                "Beam width must be positive".into(),
            ));
        }
        Ok(())
    }
}
