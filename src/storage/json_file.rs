//! JSON document file backend
//!
//! The file is rewritten in full on every save, pretty-printed with a
//! four-space indent. There is no temp-file rename: a crash mid-write can
//! leave a truncated file, which the next load reports as corrupt.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, info};

use super::DocumentStore;
use crate::core::error::StorageError;
use crate::core::types::Document;

const INDENT: &[u8] = b"    ";

/// Document store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for `path` without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for `path`, writing an empty document first when the
    /// file is absent and `create_if_missing` is set
    pub fn open(path: impl Into<PathBuf>, create_if_missing: bool) -> Result<Self, StorageError> {
        let store = Self::new(path);
        if create_if_missing && !store.path.exists() {
            store.save(&Document::default())?;
            info!("Created empty bookstore document at {}", store.path.display());
        }
        Ok(store)
    }

    /// Location of the document file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, source: std::io::Error) -> StorageError {
        StorageError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Document, StorageError> {
        let bytes = fs::read(&self.path).map_err(|e| self.unavailable(e))?;
        let document: Document = serde_json::from_slice(&bytes)?;
        debug!(
            books = document.books.len(),
            authors = document.authors.len(),
            customers = document.customers.len(),
            orders = document.orders.len(),
            "Loaded document from {}",
            self.path.display()
        );
        Ok(document)
    }

    fn save(&self, document: &Document) -> Result<(), StorageError> {
        let mut buf = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        document.serialize(&mut serializer).map_err(StorageError::Encode)?;

        fs::write(&self.path, &buf).map_err(|e| self.unavailable(e))?;
        debug!(bytes = buf.len(), "Saved document to {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file ({})", self.path.display())
    }
}
