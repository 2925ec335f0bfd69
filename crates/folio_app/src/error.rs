//! Error types for folio_app

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading content or configuration files
#[derive(Error, Debug)]
pub enum ContentError {
    /// Failed to read a file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML document is malformed or has the wrong shape
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The document parsed but its values are unusable
    #[error("{0}")]
    Invalid(String),
}

impl ContentError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ContentError::Invalid(message.into())
    }
}

/// Result type for folio_app operations
pub type Result<T> = std::result::Result<T, ContentError>;
