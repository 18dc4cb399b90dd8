//! Error types for sleep risk assessment

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading artifacts or running an assessment
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// Artifact is present but corrupt, or its shape does not match the
    /// feature layout. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Artifact files are absent. Callers degrade instead of failing.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Failed to read artifact {path}: {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid health profile: {0}")]
    InvalidProfile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssessmentError {
    /// Whether the error should halt startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AssessmentError::Configuration(_) | AssessmentError::ArtifactRead { .. }
        )
    }
}
