//! Error types shared across Vitrine crates.
//!
//! Runtime motion never fails; these errors only come out of parsing
//! layouts, input scripts, trigger strings, and configuration.

use std::path::PathBuf;

/// Top-level error type for Vitrine operations.
#[derive(Debug, thiserror::Error)]
pub enum VitrineError {
    #[error("Scene error: {message}")]
    Scene { message: String },

    #[error("Trigger error: {message}")]
    Trigger { message: String },

    #[error("Timeline error: {message}")]
    Timeline { message: String },

    #[error("Input script error: {message}")]
    Input { message: String },

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

/// Result type alias using VitrineError.
pub type VitrineResult<T> = Result<T, VitrineError>;

impl VitrineError {
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene {
            message: msg.into(),
        }
    }

    pub fn trigger(msg: impl Into<String>) -> Self {
        Self::Trigger {
            message: msg.into(),
        }
    }

    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline {
            message: msg.into(),
        }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
