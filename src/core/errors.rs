//! Categorized error types for driftmap analysis operations

use std::path::PathBuf;

/// Unified error type for analysis operations
#[derive(Debug, thiserror::Error)]
pub enum DriftmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {file}: {message}")]
    Parse { file: PathBuf, message: String },

    #[error("Snapshot error for ref '{reference}': {message}")]
    Snapshot { reference: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Analysis error: {0}")]
    Analysis(String),
}

impl DriftmapError {
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DriftmapError::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn snapshot(reference: impl Into<String>, message: impl Into<String>) -> Self {
        DriftmapError::Snapshot {
            reference: reference.into(),
            message: message.into(),
        }
    }
}

/// Result type alias
pub type DriftmapResult<T> = Result<T, DriftmapError>;
