//! Application State Management
//!
//! `AppState` holds the configured store and configuration shared by every
//! request handler. It is built once by the factory and passed to the router
//! behind an `Arc`.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, MutexGuard};
use tracing::error;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::Document;
use crate::storage::DocumentStore;
use crate::system::metrics::Metrics;

/// Central application state holding the store and configuration
pub struct AppState<S: DocumentStore> {
    /// Document store backing every request
    pub store: Arc<S>,

    /// Application configuration
    pub config: Config,

    /// Serializes load → mutate → save sequences within this process
    write_lock: Mutex<()>,

    started_at: Instant,
}

impl<S: DocumentStore> AppState<S> {
    /// Create a new AppState around `store`
    pub fn new(store: Arc<S>, config: Config) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
            started_at: Instant::now(),
        }
    }

    /// Load the full document on the blocking pool, recording storage metrics
    pub async fn load_document(&self) -> Result<Document> {
        let store = Arc::clone(&self.store);
        let loaded = tokio::task::spawn_blocking(move || store.load()).await?;

        let metrics = &Metrics::global().storage;
        match loaded {
            Ok(document) => {
                metrics.loads.inc();
                Ok(document)
            }
            Err(e) => {
                metrics.failures.inc();
                error!("Failed to load document from {}: {}", self.store.describe(), e);
                Err(e.into())
            }
        }
    }

    /// Persist the full document on the blocking pool, recording storage metrics
    pub async fn save_document(&self, document: Document) -> Result<()> {
        let store = Arc::clone(&self.store);
        let saved = tokio::task::spawn_blocking(move || store.save(&document)).await?;

        let metrics = &Metrics::global().storage;
        match saved {
            Ok(()) => {
                metrics.saves.inc();
                Ok(())
            }
            Err(e) => {
                metrics.failures.inc();
                error!("Failed to save document to {}: {}", self.store.describe(), e);
                Err(e.into())
            }
        }
    }

    /// Take the process-wide write lock. Hold the guard from load to save.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Seconds since this state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
