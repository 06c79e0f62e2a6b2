//! Error types and handling for the Bookstore API
//!
//! Lookup failures are ordinary results surfaced to the caller; storage
//! failures abort the in-flight request and surface as server errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Bookstore API
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage layer errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Lookup by id found no record of the given kind
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Price extremum requested over an empty book collection
    #[error("No books found")]
    NoBooks,

    /// Prometheus metrics errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// A blocking storage task panicked or was cancelled
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a [`DocumentStore`](crate::storage::DocumentStore)
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing medium is missing, unreadable or unwritable
    #[error("document unavailable at {}: {source}", .path.display())]
    Unavailable {
        /// Location of the document
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// The stored bytes do not parse as a bookstore document
    #[error("document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The in-memory document could not be encoded
    #[error("document could not be encoded: {0}")]
    Encode(serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error for the given record kind
    pub fn not_found(kind: &'static str) -> Self {
        Self::NotFound(kind)
    }

    /// Check if this is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::NoBooks)
    }

    /// Check if this is a server error (5xx equivalent)
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }
}
