//! Query and mutation operations over a loaded [`Document`](crate::core::Document)
//!
//! Every function here is pure with respect to storage: reads take
//! `&Document` and return owned results; mutations take `&mut Document`
//! and leave persisting to the caller.
//!
//! Referential links (`author_id`, `customer_id`, `book_id`) are never
//! validated. An order whose book is missing simply contributes nothing to
//! revenue.

pub mod authors;
pub mod books;
pub mod customers;
pub mod orders;

/// Number of records returned by the "recent" and "popular" listings
pub const TOP_N: usize = 5;
