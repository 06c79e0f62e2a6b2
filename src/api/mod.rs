//! # API Module
//!
//! HTTP interface for the bookstore. Every route maps to one query or
//! mutation in [`crate::queries`].
//!
//! ## Endpoints Overview
//!
//! ### Books
//! - `GET /books`, `POST /books`
//! - `GET|PUT|DELETE /books/{id}`
//! - `GET /books/genre/{genre}`, `/books/stock/{threshold}`, `/books/discount/{discount}`
//! - `GET /books/recent`, `/books/popular`, `/books/available`
//! - `GET /books/max-price`, `/books/min-price`, `/books/average-price`
//! - `GET /books/search?query=`
//!
//! ### Authors
//! - `GET /authors/sort`, `/authors/count`, `/authors/{id}`, `/authors/{id}/books`
//!
//! ### Customers
//! - `GET /customers/sort`, `/customers/count`, `/customers/check?email=`, `/customers/{id}/orders`
//!
//! ### Orders
//! - `GET /orders/revenue`, `/orders/books-sold`, `/orders/average-price`, `/orders/{id}`
//!
//! ### System
//! - `GET /`, `/health`, `/info`, `/metrics`

pub mod handlers;
pub mod server;

pub use server::{create_app, start_server};
