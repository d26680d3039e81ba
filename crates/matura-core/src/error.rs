//! Error types for the matura paper scraper
//!
//! Provides a single error enum with human-readable messages
//! and string serialization for JSON output.

use std::path::PathBuf;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all scraper and download operations
///
/// Every variant is terminal for one unit of work (a listing or a single
/// sitting) only. The pipeline turns them into outcomes instead of
/// aborting the run.
#[derive(Error, Debug)]
pub enum MaturaError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Detail page carries no link ending in `.pdf`
    #[error("No PDF link found on {0}")]
    PdfNotFound(String),

    /// Filesystem operation failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MaturaError {
    /// Wraps an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Serialize for MaturaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for matura scraper operations
pub type Result<T> = std::result::Result<T, MaturaError>;
