//! Error types shared across Posecraft crates.

use std::path::PathBuf;

/// Top-level error type for Posecraft operations.
///
/// The keypoint transforms themselves never fail; this type covers the
/// boundaries around them (files, parsing, configuration).
#[derive(Debug, thiserror::Error)]
pub enum PosecraftError {
    #[error("Pose model error: {message}")]
    Model { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PosecraftError.
pub type PosecraftResult<T> = Result<T, PosecraftError>;

impl PosecraftError {
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
