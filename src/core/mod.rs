//! Core system types and foundations
//!
//! This module contains the bookstore data model, error handling,
//! configuration, and the application state shared by the HTTP layer.

pub mod app_state;
pub mod config;
pub mod error;
pub mod factory;
pub mod types;

// Re-export commonly used items
pub use app_state::AppState;
pub use config::Config;
pub use error::{Error, Result, StorageError};
pub use types::{Author, Book, BookPatch, Customer, DiscountedBook, Document, NewBook, Order};
