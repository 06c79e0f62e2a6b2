//! End-to-end tests for the HTTP routes, driven through the router with an
//! in-memory store or a JSON file store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookstore_api::api::create_app;
use bookstore_api::core::{AppState, Config, Document};
use bookstore_api::storage::{DocumentStore, JsonFileStore, MemStore};
use tempfile::TempDir;

fn sample_document() -> Document {
    serde_json::from_value(json!({
        "books": [
            {
                "id": 1, "title": "Dune", "author": "Frank Herbert", "author_id": 1,
                "genre": "Science Fiction", "price": 20.0, "stock": 4,
                "published_year": 1965, "sold_copies": 120, "isbn": "978-0441013593"
            },
            {
                "id": 2, "title": "Emma", "author": "Jane Austen", "author_id": 2,
                "genre": "Classic Romance", "price": 10.0, "stock": 0,
                "published_year": 1815, "sold_copies": 40
            },
            {
                "id": 3, "title": "Neuromancer", "author": "William Gibson", "author_id": 3,
                "genre": "Cyberpunk science fiction", "price": 30.0, "stock": 1,
                "published_year": 1984, "sold_copies": 80
            }
        ],
        "authors": [
            { "id": 1, "name": "Frank Herbert" },
            { "id": 2, "name": "Jane Austen" },
            { "id": 3, "name": "William Gibson" }
        ],
        "customers": [
            { "id": 1, "name": "Zoe", "email": "zoe@example.com" },
            { "id": 2, "name": "Adam", "email": "adam@example.com" }
        ],
        "orders": [
            { "id": 1, "customer_id": 1, "book_id": 1, "quantity": 2 },
            { "id": 2, "customer_id": 2, "book_id": 3, "quantity": 1 },
            { "id": 3, "customer_id": 1, "book_id": 2, "quantity": 3 }
        ]
    }))
    .unwrap()
}

fn app_on_file(path: std::path::PathBuf) -> Router {
    let state = Arc::new(AppState::new(Arc::new(JsonFileStore::new(path)), Config::default()));
    create_app(state)
}

fn new_book_payload() -> Value {
    json!({
        "title": "Foundation", "author": "Isaac Asimov", "author_id": 4,
        "genre": "Science Fiction", "price": 18.5, "stock": 6,
        "published_year": 1951, "sold_copies": 0
    })
}

fn app_with(document: Document) -> (Router, Arc<MemStore>) {
    let store = Arc::new(MemStore::new(document));
    let state = Arc::new(AppState::new(store.clone(), Config::default()));
    (create_app(state), store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder().method(method).uri(uri).body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

fn ids(value: &Value) -> Vec<u64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_root_and_health() {
    let (app, _) = app_with(sample_document());

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Welcome to the Bookstore API!" }));

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_list_and_get_books() {
    let (app, store) = app_with(sample_document());

    let (status, body) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3]);
    assert_eq!(body[0]["isbn"], "978-0441013593");

    let (status, body) = get(&app, "/books/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Neuromancer");

    let (status, body) = get(&app, "/books/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Book not found" }));

    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_create_book_assigns_next_id_and_persists() {
    let (app, store) = app_with(sample_document());

    let payload = json!({
        "id": 77,
        "title": "Foundation", "author": "Isaac Asimov", "author_id": 4,
        "genre": "Science Fiction", "price": 18.5, "stock": 6,
        "published_year": 1951, "sold_copies": 0, "edition": "first"
    });
    let (status, body) = send(&app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 4);
    assert_eq!(body["edition"], "first");

    assert_eq!(store.save_count(), 1);
    let stored = store.load().unwrap();
    assert_eq!(stored.books.len(), 4);
    assert_eq!(stored.books[3].title, "Foundation");
    assert_eq!(stored.authors.len(), 3);
}

#[tokio::test]
async fn test_create_book_rejects_malformed_body() {
    let (app, store) = app_with(sample_document());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/books", Some(json!({ "title": "Half a book" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON data"));

    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_update_book_merges_fields() {
    let (app, store) = app_with(sample_document());

    let (status, body) = send(&app, Method::PUT, "/books/2", Some(json!({ "price": 12.0, "stock": 5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 12.0);
    assert_eq!(body["stock"], 5);
    assert_eq!(body["title"], "Emma");

    let (status, body) = send(&app, Method::PUT, "/books/9", Some(json!({ "price": 1.0 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    assert_eq!(store.save_count(), 1);
    assert_eq!(store.load().unwrap().books[1].stock, 5);
}

#[tokio::test]
async fn test_delete_book() {
    let (app, store) = app_with(sample_document());

    let (status, body) = send(&app, Method::DELETE, "/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Book deleted" }));

    let (status, _) = get(&app, "/books/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, "/books/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn test_book_filters() {
    let (app, _) = app_with(sample_document());

    let (_, body) = get(&app, "/books/genre/SCIENCE%20FICTION").await;
    assert_eq!(ids(&body), vec![1, 3]);

    let (_, body) = get(&app, "/books/stock/2").await;
    assert_eq!(ids(&body), vec![2, 3]);

    let (_, body) = get(&app, "/books/available").await;
    assert_eq!(ids(&body), vec![1, 3]);

    let (_, body) = get(&app, "/books/recent").await;
    assert_eq!(ids(&body), vec![3, 1, 2]);

    let (_, body) = get(&app, "/books/popular").await;
    assert_eq!(ids(&body), vec![1, 3, 2]);
}

#[tokio::test]
async fn test_price_queries() {
    let (app, _) = app_with(sample_document());

    let (status, body) = get(&app, "/books/max-price").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 3);

    let (_, body) = get(&app, "/books/min-price").await;
    assert_eq!(body["id"], 2);

    let (_, body) = get(&app, "/books/average-price").await;
    assert_eq!(body, json!({ "average_price": 20.0 }));

    let (_, body) = get(&app, "/books/discount/25").await;
    assert_eq!(body[0]["discounted_price"], 15.0);
    assert_eq!(body[0]["price"], 20.0);
    assert_eq!(body[2]["discounted_price"], 22.5);
}

#[tokio::test]
async fn test_price_extremes_on_empty_store() {
    let (app, _) = app_with(Document::default());

    let (status, body) = get(&app, "/books/max-price").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No books found" }));

    let (status, _) = get(&app, "/books/min-price").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/books/average-price").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["average_price"], 0.0);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let (app, _) = app_with(sample_document());

    let (_, body) = get(&app, "/books/search?query=GIBSON").await;
    assert_eq!(ids(&body), vec![3]);

    let (_, body) = get(&app, "/books/search?query=em").await;
    assert_eq!(ids(&body), vec![2]);

    let (_, body) = get(&app, "/books/search").await;
    assert_eq!(ids(&body), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_author_routes() {
    let (app, _) = app_with(sample_document());

    let (_, body) = get(&app, "/authors/sort").await;
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Frank Herbert", "Jane Austen", "William Gibson"]);

    let (_, body) = get(&app, "/authors/count").await;
    assert_eq!(body, json!({ "total_authors": 3 }));

    let (status, body) = get(&app, "/authors/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jane Austen");

    let (status, body) = get(&app, "/authors/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Author not found");

    let (_, body) = get(&app, "/authors/3/books").await;
    assert_eq!(ids(&body), vec![3]);

    let (status, body) = get(&app, "/authors/9/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_customer_routes() {
    let (app, _) = app_with(sample_document());

    let (_, body) = get(&app, "/customers/sort").await;
    assert_eq!(ids(&body), vec![2, 1]);

    let (_, body) = get(&app, "/customers/count").await;
    assert_eq!(body, json!({ "total_customers": 2 }));

    let (_, body) = get(&app, "/customers/check?email=zoe@example.com").await;
    assert_eq!(body, json!({ "exists": true }));

    let (_, body) = get(&app, "/customers/check?email=ZOE@example.com").await;
    assert_eq!(body, json!({ "exists": false }));

    let (_, body) = get(&app, "/customers/check").await;
    assert_eq!(body, json!({ "exists": false }));

    let (_, body) = get(&app, "/customers/1/orders").await;
    assert_eq!(ids(&body), vec![1, 3]);
}

#[tokio::test]
async fn test_order_routes() {
    let (app, store) = app_with(sample_document());

    let (_, body) = get(&app, "/orders/revenue").await;
    assert_eq!(body, json!({ "total_revenue": 100.0 }));

    let (_, body) = get(&app, "/orders/books-sold").await;
    assert_eq!(body, json!({ "total_books_sold": 6 }));

    let (_, body) = get(&app, "/orders/average-price").await;
    let average = body["average_order_price"].as_f64().unwrap();
    assert!((average - 100.0 / 3.0).abs() < 1e-9);

    let (status, body) = get(&app, "/orders/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book_id"], 3);

    let (status, body) = get(&app, "/orders/8").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Order not found");

    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_metrics_route_follows_config() {
    let (app, _) = app_with(sample_document());
    let _ = get(&app, "/books").await;
    let (status, body) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("bookstore_requests_total"));

    let mut config = Config::default();
    config.metrics.enabled = false;
    let state = Arc::new(AppState::new(Arc::new(MemStore::default()), config));
    let app = create_app(state);
    let (status, _) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_data_file_is_server_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let app = app_on_file(path.clone());

    let (status, body) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("absent.json"));

    let (status, body) = send(&app, Method::POST, "/books", Some(new_book_payload())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_corrupt_data_file_is_server_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "this is not json").unwrap();
    let app = app_on_file(path.clone());

    let (status, body) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("corrupt"));

    let (status, body) = send(&app, Method::POST, "/books", Some(new_book_payload())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "this is not json");
}

#[tokio::test]
async fn test_file_store_round_trip_through_router() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    JsonFileStore::new(&path).save(&sample_document()).unwrap();
    let app = app_on_file(path.clone());

    let (status, body) = send(&app, Method::POST, "/books", Some(new_book_payload())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 4);

    let stored = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(stored.books.len(), 4);
    assert_eq!(stored.books[0].extra["isbn"], "978-0441013593");
}
