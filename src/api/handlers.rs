//! HTTP request handlers for the Bookstore API
//!
//! Each handler loads the document through `AppState`, runs one operation
//! from [`crate::queries`], and, for book mutations, saves the result under
//! the write lock.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::core::error::{Error, Result};
use crate::core::types::{
    Author, AuthorId, Book, BookId, BookPatch, Customer, CustomerId, DiscountedBook, NewBook, Order, OrderId,
};
use crate::core::AppState;
use crate::queries::{authors, books, customers, orders};
use crate::storage::DocumentStore;
use crate::system::metrics;

// Response types

/// Error body: `{"error": "<message>"}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Confirmation body: `{"message": "<message>"}`
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Confirmation text
    pub message: String,
}

/// Number of author records
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorCountResponse {
    /// Author count
    pub total_authors: usize,
}

/// Number of customer records
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerCountResponse {
    /// Customer count
    pub total_customers: usize,
}

/// Customer existence check result
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerExistsResponse {
    /// Whether a customer has the queried email
    pub exists: bool,
}

/// Revenue over all orders
#[derive(Debug, Serialize, Deserialize)]
pub struct RevenueResponse {
    /// Sum of price times quantity
    pub total_revenue: f64,
}

/// Copies sold over all orders
#[derive(Debug, Serialize, Deserialize)]
pub struct BooksSoldResponse {
    /// Sum of order quantities
    pub total_books_sold: u64,
}

/// Mean revenue per order
#[derive(Debug, Serialize, Deserialize)]
pub struct AverageOrderPriceResponse {
    /// Revenue divided by order count
    pub average_order_price: f64,
}

/// Mean book price
#[derive(Debug, Serialize, Deserialize)]
pub struct AverageBookPriceResponse {
    /// Mean price over all books
    pub average_price: f64,
}

/// System health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Current system status
    pub status: String,
    /// Seconds since startup
    pub uptime_secs: u64,
    /// Service version
    pub version: String,
}

/// Query string for `/books/search`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring matched against title and author; empty matches all
    #[serde(default)]
    pub query: String,
}

/// Query string for `/customers/check`
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    /// Email to look up
    pub email: Option<String>,
}

impl ErrorResponse {
    /// Create an error body
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound(_) | Error::NoBooks => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// JSON extractor that answers malformed bodies with a JSON error
pub struct JsonRequest<T>(pub T);

impl<T, S> FromRequest<S> for JsonRequest<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonRequest(value)),
            Err(rejection) => {
                let error_message = match &rejection {
                    JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
                    JsonRejection::JsonSyntaxError(_) => "Malformed JSON".to_string(),
                    JsonRejection::MissingJsonContentType(_) => {
                        "Missing or invalid Content-Type header. Expected 'application/json'".to_string()
                    }
                    JsonRejection::BytesRejection(_) => "Failed to read request body".to_string(),
                    _ => "Invalid JSON request".to_string(),
                };

                warn!("JSON parsing error: {}", error_message);
                Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error_message))))
            }
        }
    }
}

/// Count the request and any not-found outcome under `operation`
fn track<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    metrics::record_request(operation);
    if let Err(Error::NotFound(_) | Error::NoBooks) = &result {
        metrics::record_not_found(operation);
    }
    result
}

// System handlers

/// Static welcome payload
pub async fn root_handler() -> Json<Value> {
    metrics::record_request("root");
    Json(json!({ "message": "Welcome to the Bookstore API!" }))
}

/// Liveness check; does not touch storage
pub async fn health_check<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.uptime_secs(),
        version: crate::VERSION.to_string(),
    })
}

/// Service name, version and storage backend
pub async fn system_info<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Json<Value> {
    Json(json!({
        "name": crate::NAME,
        "version": crate::VERSION,
        "storage": state.store.describe(),
        "resources": ["/books", "/authors", "/customers", "/orders"],
    }))
}

/// Prometheus text exposition
pub async fn metrics_handler() -> Result<impl IntoResponse> {
    let body = metrics::render()?;
    Ok(([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

// Book handlers

/// `GET /books`
pub async fn list_books<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Result<Json<Vec<Book>>> {
    track("list_books", state.load_document().await.map(|doc| books::all(&doc))).map(Json)
}

/// `GET /books/{id}`
pub async fn get_book<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<BookId>,
) -> Result<Json<Book>> {
    track("get_book", state.load_document().await.and_then(|doc| books::find(&doc, id))).map(Json)
}

/// `POST /books`
pub async fn create_book<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    JsonRequest(new_book): JsonRequest<NewBook>,
) -> Result<(StatusCode, Json<Book>)> {
    let _guard = state.lock_writes().await;
    let result = async {
        let mut doc = state.load_document().await?;
        let book = books::create(&mut doc, new_book);
        state.save_document(doc).await?;
        Ok::<_, Error>(book)
    }
    .await;

    let book = track("create_book", result)?;
    info!(book_id = book.id, title = %book.title, "Created book");
    Ok((StatusCode::CREATED, Json(book)))
}

/// `PUT /books/{id}`
pub async fn update_book<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<BookId>,
    JsonRequest(patch): JsonRequest<BookPatch>,
) -> Result<Json<Book>> {
    let _guard = state.lock_writes().await;
    let result = async {
        let mut doc = state.load_document().await?;
        let book = books::update(&mut doc, id, patch)?;
        state.save_document(doc).await?;
        Ok::<_, Error>(book)
    }
    .await;

    let book = track("update_book", result)?;
    info!(book_id = id, "Updated book");
    Ok(Json(book))
}

/// `DELETE /books/{id}`
pub async fn delete_book<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<BookId>,
) -> Result<Json<MessageResponse>> {
    let _guard = state.lock_writes().await;
    let result = async {
        let mut doc = state.load_document().await?;
        books::delete(&mut doc, id)?;
        state.save_document(doc).await
    }
    .await;

    track("delete_book", result)?;
    info!(book_id = id, "Deleted book");
    Ok(Json(MessageResponse {
        message: "Book deleted".to_string(),
    }))
}

/// `GET /books/genre/{genre}`
pub async fn books_by_genre<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(genre): Path<String>,
) -> Result<Json<Vec<Book>>> {
    track("books_by_genre", state.load_document().await.map(|doc| books::by_genre(&doc, &genre))).map(Json)
}

/// `GET /books/recent`
pub async fn recent_books<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Result<Json<Vec<Book>>> {
    track("recent_books", state.load_document().await.map(|doc| books::recent(&doc))).map(Json)
}

/// `GET /books/stock/{threshold}`
pub async fn books_below_stock<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(threshold): Path<u64>,
) -> Result<Json<Vec<Book>>> {
    track("books_below_stock", state.load_document().await.map(|doc| books::below_stock(&doc, threshold))).map(Json)
}

/// `GET /books/max-price`
pub async fn most_expensive_book<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Result<Json<Book>> {
    track("most_expensive_book", state.load_document().await.and_then(|doc| books::most_expensive(&doc))).map(Json)
}

/// `GET /books/min-price`
pub async fn cheapest_book<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Result<Json<Book>> {
    track("cheapest_book", state.load_document().await.and_then(|doc| books::cheapest(&doc))).map(Json)
}

/// `GET /books/available`
pub async fn available_books<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Result<Json<Vec<Book>>> {
    track("available_books", state.load_document().await.map(|doc| books::available(&doc))).map(Json)
}

/// `GET /books/discount/{discount}`
pub async fn discounted_books<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(discount): Path<u32>,
) -> Result<Json<Vec<DiscountedBook>>> {
    track(
        "discounted_books",
        state.load_document().await.map(|doc| books::discounted(&doc, f64::from(discount))),
    )
    .map(Json)
}

/// `GET /books/popular`
pub async fn popular_books<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Result<Json<Vec<Book>>> {
    track("popular_books", state.load_document().await.map(|doc| books::popular(&doc))).map(Json)
}

/// `GET /books/average-price`
pub async fn average_book_price<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<AverageBookPriceResponse>> {
    let average_price = track("average_book_price", state.load_document().await.map(|doc| books::average_price(&doc)))?;
    Ok(Json(AverageBookPriceResponse { average_price }))
}

/// `GET /books/search?query=`
pub async fn search_books<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Book>>> {
    track("search_books", state.load_document().await.map(|doc| books::search(&doc, &params.query))).map(Json)
}

// Author handlers

/// `GET /authors/sort`
pub async fn sorted_authors<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Result<Json<Vec<Author>>> {
    track("sorted_authors", state.load_document().await.map(|doc| authors::sorted(&doc))).map(Json)
}

/// `GET /authors/count`
pub async fn author_count<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<AuthorCountResponse>> {
    let total_authors = track("author_count", state.load_document().await.map(|doc| authors::count(&doc)))?;
    Ok(Json(AuthorCountResponse { total_authors }))
}

/// `GET /authors/{id}`
pub async fn get_author<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<AuthorId>,
) -> Result<Json<Author>> {
    track("get_author", state.load_document().await.and_then(|doc| authors::find(&doc, id))).map(Json)
}

/// `GET /authors/{id}/books`
pub async fn books_by_author<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<AuthorId>,
) -> Result<Json<Vec<Book>>> {
    track("books_by_author", state.load_document().await.map(|doc| authors::books_by_author(&doc, id))).map(Json)
}

// Customer handlers

/// `GET /customers/sort`
pub async fn sorted_customers<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Result<Json<Vec<Customer>>> {
    track("sorted_customers", state.load_document().await.map(|doc| customers::sorted(&doc))).map(Json)
}

/// `GET /customers/count`
pub async fn customer_count<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<CustomerCountResponse>> {
    let total_customers = track("customer_count", state.load_document().await.map(|doc| customers::count(&doc)))?;
    Ok(Json(CustomerCountResponse { total_customers }))
}

/// `GET /customers/check?email=`
pub async fn customer_exists<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<CustomerExistsResponse>> {
    let exists = track(
        "customer_exists",
        state.load_document().await.map(|doc| customers::exists(&doc, params.email.as_deref())),
    )?;
    Ok(Json(CustomerExistsResponse { exists }))
}

/// `GET /customers/{id}/orders`
pub async fn customer_orders<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Vec<Order>>> {
    track("customer_orders", state.load_document().await.map(|doc| customers::orders(&doc, id))).map(Json)
}

// Order handlers

/// `GET /orders/revenue`
pub async fn total_revenue<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Result<Json<RevenueResponse>> {
    let total_revenue = track("total_revenue", state.load_document().await.map(|doc| orders::total_revenue(&doc)))?;
    Ok(Json(RevenueResponse { total_revenue }))
}

/// `GET /orders/books-sold`
pub async fn total_books_sold<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<BooksSoldResponse>> {
    let total_books_sold =
        track("total_books_sold", state.load_document().await.map(|doc| orders::total_books_sold(&doc)))?;
    Ok(Json(BooksSoldResponse { total_books_sold }))
}

/// `GET /orders/{id}`
pub async fn get_order<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    track("get_order", state.load_document().await.and_then(|doc| orders::find(&doc, id))).map(Json)
}

/// `GET /orders/average-price`
pub async fn average_order_price<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<AverageOrderPriceResponse>> {
    let average_order_price = track(
        "average_order_price",
        state.load_document().await.map(|doc| orders::average_order_price(&doc)),
    )?;
    Ok(Json(AverageOrderPriceResponse { average_order_price }))
}
