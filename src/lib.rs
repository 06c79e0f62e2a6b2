//! Bookstore API - A small JSON-over-HTTP service for a bookstore catalogue
//!
//! Books, authors, customers and orders live in a single JSON document.
//! Every request loads the document, answers one query or applies one book
//! mutation, and mutations write the whole document back.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod storage;
pub mod queries;
pub mod api;
pub mod system;

// Re-export commonly used items for convenience
pub use core::{Config, Error, Result};

use tracing_subscriber::EnvFilter;

use crate::core::config::LoggingConfig;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize tracing from the logging configuration.
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| Error::config(format!("Invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match logging.format.as_str() {
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };
    installed.map_err(|e| Error::config(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!("Initializing {} v{}", NAME, VERSION);

    Ok(())
}
