//! Bookstore API Server
//!
//! Serves the bookstore catalogue over HTTP from a JSON document file.

use std::path::PathBuf;

use bookstore_api::api::start_server;
use bookstore_api::core::config::StorageType;
use bookstore_api::core::factory::create_app_state;
use bookstore_api::{Config, Error, Result};
use clap::{Arg, ArgAction, Command};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("bookstore-api")
        .version(bookstore_api::VERSION)
        .about("JSON-over-HTTP API for a bookstore catalogue.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (default: bookstore.toml if present)")
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .help("HTTP server bind address")
        )
        .arg(
            Arg::new("data-file")
                .long("data-file")
                .value_name("FILE")
                .help("JSON document holding books, authors, customers and orders")
        )
        .arg(
            Arg::new("storage-type")
                .long("storage-type")
                .value_name("TYPE")
                .help("Storage backend type (json, memory)")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
        )
        .arg(
            Arg::new("create-if-missing")
                .long("create-if-missing")
                .action(ArgAction::SetTrue)
                .help("Create an empty data file when none exists")
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let mut config = Config::load(config_path.as_deref())?;

    // Apply CLI overrides
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    // Initialize logging and metrics
    bookstore_api::init_logging(&config.logging)?;
    bookstore_api::system::metrics::init_registry();

    info!("Starting Bookstore API v{}", bookstore_api::VERSION);
    info!(
        "Storage: {:?} at {}",
        config.storage.storage_type,
        config.storage.data_file.display()
    );

    let app_state = create_app_state(config)?;

    if let Err(e) = start_server(app_state, shutdown_signal()).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &clap::ArgMatches) -> Result<()> {
    if let Some(addr) = matches.get_one::<String>("http-addr") {
        config.server.http_addr = addr.parse()
            .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
    }

    if let Some(data_file) = matches.get_one::<String>("data-file") {
        config.storage.data_file = PathBuf::from(data_file);
    }

    if let Some(storage_type) = matches.get_one::<String>("storage-type") {
        config.storage.storage_type = storage_type.parse::<StorageType>()?;
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    if matches.get_flag("create-if-missing") {
        config.storage.create_if_missing = true;
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    warn!("Received shutdown signal, initiating graceful shutdown...");
}
