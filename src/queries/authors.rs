//! Author queries

use crate::core::error::{Error, Result};
use crate::core::types::{Author, AuthorId, Book, Document};

/// Authors ordered by name
pub fn sorted(doc: &Document) -> Vec<Author> {
    let mut authors = doc.authors.clone();
    authors.sort_by(|a, b| a.name.cmp(&b.name));
    authors
}

/// Number of author records
pub fn count(doc: &Document) -> usize {
    doc.authors.len()
}

/// First author with the given id
pub fn find(doc: &Document, id: AuthorId) -> Result<Author> {
    doc.authors
        .iter()
        .find(|a| a.id == id)
        .cloned()
        .ok_or(Error::not_found("Author"))
}

/// Books whose `author_id` matches. The author record itself need not exist.
pub fn books_by_author(doc: &Document, author_id: AuthorId) -> Vec<Book> {
    doc.books
        .iter()
        .filter(|b| b.author_id == author_id)
        .cloned()
        .collect()
}
