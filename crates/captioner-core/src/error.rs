//! Error types for the captioning pipeline.
//!
//! Errors are organized by stage so messages carry the context a caller
//! needs (file paths, stage names, specific issues). Nothing in the core
//! retries; every failure propagates up through `Result`.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse JSON configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Top-level error type for caption generation, organized by stage.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The image file could not be read or decoded
    #[error("failed to load image: {}", path.display())]
    ImageLoad { path: PathBuf },

    /// Vocabulary load failure or data-integrity problem
    #[error("Vocabulary error: {0}")]
    Vocab(String),

    /// ONNX session creation or scoring failure
    #[error("Inference error: {0}")]
    Inference(String),

    /// Beam search finished with an empty hypothesis pool
    #[error("No valid caption generated")]
    EmptySearch,
}

/// Convenience type alias for captioning results.
pub type Result<T> = std::result::Result<T, CaptionError>;
