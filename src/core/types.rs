//! Bookstore data model
//!
//! These types mirror the persisted document field for field. Every record
//! carries an `extra` map so fields this crate does not know about survive a
//! load/save cycle untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Book identifier
pub type BookId = u64;
/// Author identifier
pub type AuthorId = u64;
/// Customer identifier
pub type CustomerId = u64;
/// Order identifier
pub type OrderId = u64;

/// Unknown fields carried through on round-trip
pub type ExtraFields = Map<String, Value>;

/// The full persisted aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// All books, in stored order
    #[serde(default)]
    pub books: Vec<Book>,
    /// All authors, in stored order
    #[serde(default)]
    pub authors: Vec<Author>,
    /// All customers, in stored order
    #[serde(default)]
    pub customers: Vec<Customer>,
    /// All orders, in stored order
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// A book in the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Book id
    pub id: BookId,
    /// Title
    pub title: String,
    /// Author display name
    pub author: String,
    /// Id of the author record (not checked against `authors`)
    pub author_id: AuthorId,
    /// Genre label
    pub genre: String,
    /// Unit price. Always written back as a float, so `20` becomes `20.0`.
    pub price: f64,
    /// Copies in stock
    pub stock: u64,
    /// Year of publication
    pub published_year: i32,
    /// Copies sold to date
    pub sold_copies: u64,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// An author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Author id
    pub id: AuthorId,
    /// Author name
    pub name: String,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer id
    pub id: CustomerId,
    /// Customer name
    pub name: String,
    /// Contact email, used as a lookup key
    pub email: String,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A single-book order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id
    pub id: OrderId,
    /// Ordering customer
    pub customer_id: CustomerId,
    /// Ordered book
    pub book_id: BookId,
    /// Number of copies
    pub quantity: u64,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Author {
    /// Create an author with no extra fields
    pub fn new(id: AuthorId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), extra: ExtraFields::new() }
    }
}

impl Customer {
    /// Create a customer with no extra fields
    pub fn new(id: CustomerId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            extra: ExtraFields::new(),
        }
    }
}

impl Order {
    /// Create an order with no extra fields
    pub fn new(id: OrderId, customer_id: CustomerId, book_id: BookId, quantity: u64) -> Self {
        Self {
            id,
            customer_id,
            book_id,
            quantity,
            extra: ExtraFields::new(),
        }
    }
}

/// Payload for creating a book. The id is always assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    /// Title
    pub title: String,
    /// Author display name
    pub author: String,
    /// Id of the author record
    pub author_id: AuthorId,
    /// Genre label
    pub genre: String,
    /// Unit price
    pub price: f64,
    /// Copies in stock
    pub stock: u64,
    /// Year of publication
    pub published_year: i32,
    /// Copies sold to date
    pub sold_copies: u64,
    /// Any other fields supplied by the client
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl NewBook {
    /// Turn the payload into a stored book with the given id.
    ///
    /// A client-supplied `id` is discarded.
    pub fn into_book(mut self, id: BookId) -> Book {
        self.extra.remove("id");
        Book {
            id,
            title: self.title,
            author: self.author,
            author_id: self.author_id,
            genre: self.genre,
            price: self.price,
            stock: self.stock,
            published_year: self.published_year,
            sold_copies: self.sold_copies,
            extra: self.extra,
        }
    }
}

/// Partial update for a book. Present fields overwrite, absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookPatch {
    /// New id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New author name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// New author id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AuthorId>,
    /// New genre
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// New price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// New stock level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,
    /// New publication year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    /// New sold count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_copies: Option<u64>,
    /// Unmodelled fields to set
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl BookPatch {
    /// Overwrite every field present in the patch onto `book`
    pub fn apply(self, book: &mut Book) {
        if let Some(id) = self.id {
            book.id = id;
        }
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(price) = self.price {
            book.price = price;
        }
        if let Some(stock) = self.stock {
            book.stock = stock;
        }
        if let Some(published_year) = self.published_year {
            book.published_year = published_year;
        }
        if let Some(sold_copies) = self.sold_copies {
            book.sold_copies = sold_copies;
        }
        book.extra.extend(self.extra);
    }
}

/// A book together with its price after a percentage discount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountedBook {
    /// The unchanged book
    #[serde(flatten)]
    pub book: Book,
    /// `price * (1 - discount / 100)`
    pub discounted_price: f64,
}
