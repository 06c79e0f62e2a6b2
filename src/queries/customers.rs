//! Customer queries

use crate::core::types::{Customer, CustomerId, Document, Order};

/// Customers ordered by name
pub fn sorted(doc: &Document) -> Vec<Customer> {
    let mut customers = doc.customers.clone();
    customers.sort_by(|a, b| a.name.cmp(&b.name));
    customers
}

/// Number of customer records
pub fn count(doc: &Document) -> usize {
    doc.customers.len()
}

/// Whether any customer has exactly this email. No email never matches.
pub fn exists(doc: &Document, email: Option<&str>) -> bool {
    match email {
        Some(email) => doc.customers.iter().any(|c| c.email == email),
        None => false,
    }
}

/// Orders placed by the given customer id
pub fn orders(doc: &Document, customer_id: CustomerId) -> Vec<Order> {
    doc.orders
        .iter()
        .filter(|o| o.customer_id == customer_id)
        .cloned()
        .collect()
}
