//! Order lookups and sales aggregates

use crate::core::error::{Error, Result};
use crate::core::types::{Document, Order, OrderId};

/// Sum of `price * quantity` over all orders.
///
/// Each order is priced against every book carrying its `book_id`: none
/// contributes 0, duplicates each contribute.
pub fn total_revenue(doc: &Document) -> f64 {
    doc.orders
        .iter()
        .map(|order| {
            doc.books
                .iter()
                .filter(|b| b.id == order.book_id)
                .map(|b| b.price * order.quantity as f64)
                .sum::<f64>()
        })
        .sum()
}

/// Sum of order quantities
pub fn total_books_sold(doc: &Document) -> u64 {
    doc.orders.iter().map(|o| o.quantity).sum()
}

/// First order with the given id
pub fn find(doc: &Document, id: OrderId) -> Result<Order> {
    doc.orders
        .iter()
        .find(|o| o.id == id)
        .cloned()
        .ok_or(Error::not_found("Order"))
}

/// Total revenue divided by the number of orders, 0 when there are none
pub fn average_order_price(doc: &Document) -> f64 {
    if doc.orders.is_empty() {
        return 0.0;
    }
    total_revenue(doc) / doc.orders.len() as f64
}
