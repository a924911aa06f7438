//! Error types for the listing pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning alert emails or touching the store
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Failed to parse the email structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// Failed to decode email content
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// Filesystem access failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store document could not be read or written as JSON
    #[error("Invalid store document {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The mailbox could not be opened or listed
    #[error("Mailbox unavailable: {0}")]
    Mailbox(String),

    /// Invalid configuration value
    #[error("Invalid configuration for {key}: {details}")]
    Config { key: String, details: String },
}

impl ScrapeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, ScrapeError>;
