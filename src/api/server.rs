//! HTTP server implementation for the Bookstore API

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use crate::core::error::Result;
use crate::core::factory::ConfiguredAppState;
use crate::core::AppState;
use crate::storage::DocumentStore;

/// Creates the application router with all routes and middleware
pub fn create_app<S: DocumentStore>(app_state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    let mut router = Router::new()
        // Root route
        .route("/", get(handlers::root_handler))

        // Book routes
        .route("/books", get(handlers::list_books::<S>).post(handlers::create_book::<S>))
        .route(
            "/books/{id}",
            get(handlers::get_book::<S>)
                .put(handlers::update_book::<S>)
                .delete(handlers::delete_book::<S>),
        )
        .route("/books/genre/{genre}", get(handlers::books_by_genre::<S>))
        .route("/books/recent", get(handlers::recent_books::<S>))
        .route("/books/stock/{threshold}", get(handlers::books_below_stock::<S>))
        .route("/books/max-price", get(handlers::most_expensive_book::<S>))
        .route("/books/min-price", get(handlers::cheapest_book::<S>))
        .route("/books/available", get(handlers::available_books::<S>))
        .route("/books/discount/{discount}", get(handlers::discounted_books::<S>))
        .route("/books/popular", get(handlers::popular_books::<S>))
        .route("/books/average-price", get(handlers::average_book_price::<S>))
        .route("/books/search", get(handlers::search_books::<S>))

        // Author routes
        .route("/authors/sort", get(handlers::sorted_authors::<S>))
        .route("/authors/count", get(handlers::author_count::<S>))
        .route("/authors/{id}", get(handlers::get_author::<S>))
        .route("/authors/{id}/books", get(handlers::books_by_author::<S>))

        // Customer routes
        .route("/customers/sort", get(handlers::sorted_customers::<S>))
        .route("/customers/count", get(handlers::customer_count::<S>))
        .route("/customers/check", get(handlers::customer_exists::<S>))
        .route("/customers/{id}/orders", get(handlers::customer_orders::<S>))

        // Order routes
        .route("/orders/revenue", get(handlers::total_revenue::<S>))
        .route("/orders/books-sold", get(handlers::total_books_sold::<S>))
        .route("/orders/average-price", get(handlers::average_order_price::<S>))
        .route("/orders/{id}", get(handlers::get_order::<S>))

        // System routes
        .route("/health", get(handlers::health_check::<S>))
        .route("/info", get(handlers::system_info::<S>));

    if app_state.config.metrics.enabled {
        router = router.route("/metrics", get(handlers::metrics_handler));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(app_state)
}

/// Bind `addr` and serve `app` until `shutdown` resolves
async fn serve_app(
    addr: SocketAddr,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    Ok(())
}

/// Start the HTTP server with the configured AppState
pub async fn start_server(
    configured_app_state: ConfiguredAppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let http_addr = configured_app_state.http_addr();

    info!("Starting {} on {}", crate::NAME, http_addr);

    // Match once on storage type to get a concrete AppState
    match configured_app_state {
        ConfiguredAppState::Json { app_state } => {
            info!("Starting server with JSON file storage");
            serve_app(http_addr, create_app(app_state), shutdown).await
        }
        ConfiguredAppState::Memory { app_state } => {
            info!("Starting server with in-memory storage");
            serve_app(http_addr, create_app(app_state), shutdown).await
        }
    }
}
