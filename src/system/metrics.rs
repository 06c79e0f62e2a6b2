//! Metrics collection for the Bookstore API
//!
//! Counters live in a crate-private Prometheus registry and are exported in
//! text format by the `/metrics` endpoint.

use crate::core::Result;
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry
static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Request counters keyed by operation name
pub struct RequestMetrics {
    /// Requests handled, labelled by operation
    pub handled: IntCounterVec,
    /// Requests that ended in a not-found response, labelled by operation
    pub not_found: IntCounterVec,
}

/// Document store activity
pub struct StorageMetrics {
    /// Successful full-document loads
    pub loads: IntCounter,
    /// Successful full-document saves
    pub saves: IntCounter,
    /// Loads or saves that failed
    pub failures: IntCounter,
}

/// All metrics exported by the service
pub struct Metrics {
    /// Per-operation request metrics
    pub requests: RequestMetrics,
    /// Storage metrics
    pub storage: StorageMetrics,
}

impl Metrics {
    /// Create and register every metric
    pub fn new() -> Result<Self> {
        Ok(Self {
            requests: RequestMetrics::new()?,
            storage: StorageMetrics::new()?,
        })
    }

    /// Get the global metrics instance
    pub fn global() -> &'static Metrics {
        static INSTANCE: Lazy<Metrics> = Lazy::new(|| {
            Metrics::new().expect("Failed to initialize metrics")
        });
        &INSTANCE
    }
}

impl RequestMetrics {
    fn new() -> Result<Self> {
        let handled = IntCounterVec::new(
            Opts::new("bookstore_requests_total", "Requests handled per operation"),
            &["operation"],
        )?;
        let not_found = IntCounterVec::new(
            Opts::new("bookstore_not_found_total", "Lookups that found no record per operation"),
            &["operation"],
        )?;
        REGISTRY.register(Box::new(handled.clone()))?;
        REGISTRY.register(Box::new(not_found.clone()))?;
        Ok(Self { handled, not_found })
    }
}

impl StorageMetrics {
    fn new() -> Result<Self> {
        let loads = IntCounter::new("bookstore_document_loads_total", "Full document loads")?;
        let saves = IntCounter::new("bookstore_document_saves_total", "Full document saves")?;
        let failures = IntCounter::new("bookstore_storage_failures_total", "Failed loads and saves")?;
        REGISTRY.register(Box::new(loads.clone()))?;
        REGISTRY.register(Box::new(saves.clone()))?;
        REGISTRY.register(Box::new(failures.clone()))?;
        Ok(Self { loads, saves, failures })
    }
}

/// Force metric registration so `/metrics` lists every series from the start
pub fn init_registry() {
    Lazy::force(&REGISTRY);
    let _ = Metrics::global();
}

/// Count one handled request for `operation`
pub fn record_request(operation: &str) {
    Metrics::global().requests.handled.with_label_values(&[operation]).inc();
}

/// Count one not-found outcome for `operation`
pub fn record_not_found(operation: &str) {
    Metrics::global().requests.not_found.with_label_values(&[operation]).inc();
}

/// Render every registered metric in the Prometheus text format
pub fn render() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
