//! Storage layer for the Bookstore API
//!
//! The whole dataset is one [`Document`]. A [`DocumentStore`] hands out a
//! fresh copy on every `load` and replaces everything on every `save`;
//! there is no partial read, no delta write and no cache between calls.

pub mod json_file;
pub mod mem_store;

use crate::core::error::StorageError;
use crate::core::types::Document;

pub use json_file::JsonFileStore;
pub use mem_store::MemStore;

/// Load/save boundary between handlers and durable storage
pub trait DocumentStore: Send + Sync + 'static {
    /// Read and parse the full document
    ///
    /// # Errors
    ///
    /// * `StorageError::Unavailable` - the medium is missing or unreadable
    /// * `StorageError::Corrupt` - the content does not parse
    fn load(&self) -> Result<Document, StorageError>;

    /// Serialize and write the full document, replacing prior content
    ///
    /// # Errors
    ///
    /// * `StorageError::Unavailable` - the write failed
    fn save(&self, document: &Document) -> Result<(), StorageError>;

    /// Short human-readable description of the backend
    fn describe(&self) -> String;
}
