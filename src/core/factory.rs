//! Application Factory
//!
//! Builds the `AppState` for the storage backend named in the configuration.
//! The router is generic over the store, so each backend gets its own
//! concrete variant here and the server matches on it once at startup.

use std::sync::Arc;

use tracing::info;

use crate::core::app_state::AppState;
use crate::core::config::{Config, StorageType};
use crate::core::error::Result;
use crate::core::types::Document;
use crate::storage::{DocumentStore, JsonFileStore, MemStore};

/// AppState with its concrete storage backend
pub enum ConfiguredAppState {
    /// Backed by the JSON document file
    Json {
        /// The application state with a file store
        app_state: Arc<AppState<JsonFileStore>>,
    },
    /// Backed by an in-memory document
    Memory {
        /// The application state with an in-memory store
        app_state: Arc<AppState<MemStore>>,
    },
}

impl ConfiguredAppState {
    /// Get the HTTP address from config
    pub fn http_addr(&self) -> std::net::SocketAddr {
        self.config().server.http_addr
    }

    /// Configuration the state was built from
    pub fn config(&self) -> &Config {
        match self {
            ConfiguredAppState::Json { app_state } => &app_state.config,
            ConfiguredAppState::Memory { app_state } => &app_state.config,
        }
    }
}

/// Create AppState based on configuration
///
/// # Errors
///
/// * `Error::Storage` - the data file could not be created, or could not be
///   read to seed the memory backend
pub fn create_app_state(config: Config) -> Result<ConfiguredAppState> {
    info!("Creating AppState with storage type: {:?}", config.storage.storage_type);

    match config.storage.storage_type {
        StorageType::Json => {
            let store = JsonFileStore::open(&config.storage.data_file, config.storage.create_if_missing)?;
            info!("Using document file {}", store.path().display());
            Ok(ConfiguredAppState::Json {
                app_state: Arc::new(AppState::new(Arc::new(store), config)),
            })
        }
        StorageType::Memory => {
            let seed = if config.storage.data_file.exists() {
                let document = JsonFileStore::new(&config.storage.data_file).load()?;
                info!(
                    books = document.books.len(),
                    "Seeded memory store from {}",
                    config.storage.data_file.display()
                );
                document
            } else {
                info!("Starting memory store empty");
                Document::default()
            };
            Ok(ConfiguredAppState::Memory {
                app_state: Arc::new(AppState::new(Arc::new(MemStore::new(seed)), config)),
            })
        }
    }
}
