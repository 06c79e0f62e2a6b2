//! Book queries and the three book mutations

use crate::core::error::{Error, Result};
use crate::core::types::{Book, BookId, BookPatch, DiscountedBook, Document, NewBook};

use super::TOP_N;

/// All books in stored order
pub fn all(doc: &Document) -> Vec<Book> {
    doc.books.clone()
}

/// First book with the given id
pub fn find(doc: &Document, id: BookId) -> Result<Book> {
    doc.books
        .iter()
        .find(|b| b.id == id)
        .cloned()
        .ok_or(Error::not_found("Book"))
}

/// Append a new book with id `count + 1` and return it.
///
/// Ids come from the current count, not the current maximum, so creating
/// after a delete can hand out an id that is still in use.
pub fn create(doc: &mut Document, new_book: NewBook) -> Book {
    let id = doc.books.len() as BookId + 1;
    let book = new_book.into_book(id);
    doc.books.push(book.clone());
    book
}

/// Apply `patch` to the first book with the given id and return the result
pub fn update(doc: &mut Document, id: BookId, patch: BookPatch) -> Result<Book> {
    let book = doc
        .books
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or(Error::not_found("Book"))?;
    patch.apply(book);
    Ok(book.clone())
}

/// Remove every book with the given id
pub fn delete(doc: &mut Document, id: BookId) -> Result<()> {
    let before = doc.books.len();
    doc.books.retain(|b| b.id != id);
    if doc.books.len() == before {
        return Err(Error::not_found("Book"));
    }
    Ok(())
}

/// Books whose genre contains `genre`, ignoring case
pub fn by_genre(doc: &Document, genre: &str) -> Vec<Book> {
    let needle = genre.to_lowercase();
    doc.books
        .iter()
        .filter(|b| b.genre.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// The five most recently published books, newest first
pub fn recent(doc: &Document) -> Vec<Book> {
    let mut books = doc.books.clone();
    books.sort_by(|a, b| b.published_year.cmp(&a.published_year));
    books.truncate(TOP_N);
    books
}

/// Books with fewer than `threshold` copies in stock
pub fn below_stock(doc: &Document, threshold: u64) -> Vec<Book> {
    doc.books
        .iter()
        .filter(|b| b.stock < threshold)
        .cloned()
        .collect()
}

/// Highest priced book; the earliest stored wins a tie
pub fn most_expensive(doc: &Document) -> Result<Book> {
    doc.books
        .iter()
        .reduce(|best, b| if b.price > best.price { b } else { best })
        .cloned()
        .ok_or(Error::NoBooks)
}

/// Lowest priced book; the earliest stored wins a tie
pub fn cheapest(doc: &Document) -> Result<Book> {
    doc.books
        .iter()
        .reduce(|best, b| if b.price < best.price { b } else { best })
        .cloned()
        .ok_or(Error::NoBooks)
}

/// Books with at least one copy in stock
pub fn available(doc: &Document) -> Vec<Book> {
    doc.books.iter().filter(|b| b.stock > 0).cloned().collect()
}

/// Every book with `discounted_price = price * (1 - discount_percent / 100)`.
///
/// A stored `discounted_price` field is replaced by the computed one.
pub fn discounted(doc: &Document, discount_percent: f64) -> Vec<DiscountedBook> {
    let factor = 1.0 - discount_percent / 100.0;
    doc.books
        .iter()
        .map(|b| {
            let mut book = b.clone();
            book.extra.remove("discounted_price");
            DiscountedBook {
                discounted_price: b.price * factor,
                book,
            }
        })
        .collect()
}

/// The five best sellers, most sold first
pub fn popular(doc: &Document) -> Vec<Book> {
    let mut books = doc.books.clone();
    books.sort_by(|a, b| b.sold_copies.cmp(&a.sold_copies));
    books.truncate(TOP_N);
    books
}

/// Mean price across all books, 0 when there are none
pub fn average_price(doc: &Document) -> f64 {
    if doc.books.is_empty() {
        return 0.0;
    }
    let total: f64 = doc.books.iter().map(|b| b.price).sum();
    total / doc.books.len() as f64
}

/// Books whose title or author name contains `query`, ignoring case.
/// An empty query matches everything.
pub fn search(doc: &Document, query: &str) -> Vec<Book> {
    let needle = query.to_lowercase();
    doc.books
        .iter()
        .filter(|b| b.title.to_lowercase().contains(&needle) || b.author.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
