//! Mortgage Calculator HTTP API
//!
//! This crate wires the annuity calculator and the in-process result store
//! into an axum router:
//!
//! - `POST /execute` validates a loan request, calculates it, and caches the result
//! - `GET /cache` lists every cached calculation
//! - `GET /health` reports liveness and cache size
//! - `GET /api-docs/openapi.json` serves the OpenAPI document

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use mortgage_calculator::{AnnuityCalculator, Calculator, SystemClock};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};
use tracing::info;

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod store;
pub mod tracing_setup;
pub mod types;

use config::MortgageConfig;
use store::{InMemoryResultStore, ResultStore};

/// Shared state handed to every handler
#[derive(Debug)]
pub struct AppState {
    pub start_time: DateTime<Utc>,
    pub calculator: Arc<dyn Calculator>,
    pub store: Arc<dyn ResultStore>,
}

impl AppState {
    pub fn new(calculator: Arc<dyn Calculator>, store: Arc<dyn ResultStore>) -> Self {
        Self { start_time: Utc::now(), calculator, store }
    }

    /// Production state: wall-clock annuity calculator with the configured
    /// rates and an empty in-memory store.
    pub fn from_config(config: &MortgageConfig) -> anyhow::Result<Self> {
        info!("Initializing application state");
        let calculator = AnnuityCalculator::new(config.rates, Arc::new(SystemClock))?;
        Ok(Self::new(Arc::new(calculator), Arc::new(InMemoryResultStore::new())))
    }

    pub fn elapsed(&self) -> Duration {
        (Utc::now() - self.start_time).to_std().unwrap_or_default()
    }
}

/// Build the router with request logging, timeout, and body size limit layers.
pub fn create_app(state: Arc<AppState>, config: &MortgageConfig) -> Router {
    let routes = Router::new()
        .route("/execute", post(handlers::execute))
        .route("/cache", get(handlers::list_cache))
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(handlers::openapi_spec));

    with_middleware(routes, config).with_state(state)
}

fn with_middleware<S>(router: Router<S>, config: &MortgageConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let timeout = Duration::from_secs(config.server.request_timeout_seconds);

    router
        .layer(RequestBodyLimitLayer::new(config.max_body_size_bytes()))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        // Registered last so it runs first and sees every response.
        .layer(middleware::from_fn(tracing_setup::log_requests))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn slow_app(config: &MortgageConfig) -> Router {
        let routes = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .route("/echo", post(|body: String| async move { body }));
        with_middleware(routes, config)
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let mut config = MortgageConfig::default();
        config.server.request_timeout_seconds = 1;

        let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();
        let response = slow_app(&config).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(response.headers().contains_key(tracing_setup::REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = MortgageConfig::default();
        config.limits.max_body_size_kb = 1;

        let request = Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from("x".repeat(4096)))
            .unwrap();
        let response = slow_app(&config).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
