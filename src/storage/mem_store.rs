//! In-memory document store
//!
//! Holds one `Document` behind a read/write lock and follows the same
//! full-copy load/save contract as the file backend. Used as the test fake
//! and as the `memory` backend.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::DocumentStore;
use crate::core::error::StorageError;
use crate::core::types::Document;

/// Document store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemStore {
    document: RwLock<Document>,
    saves: AtomicU64,
}

impl MemStore {
    /// Create a store holding `document`
    pub fn new(document: Document) -> Self {
        Self {
            document: RwLock::new(document),
            saves: AtomicU64::new(0),
        }
    }

    /// Number of successful `save` calls so far
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }
}

impl DocumentStore for MemStore {
    fn load(&self) -> Result<Document, StorageError> {
        Ok(self.document.read().clone())
    }

    fn save(&self, document: &Document) -> Result<(), StorageError> {
        *self.document.write() = document.clone();
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
