//! Logging setup and request logging middleware
//!
//! Logs go through `tracing`; the subscriber is a `tracing-subscriber`
//! registry with an `EnvFilter` and a compact or JSON formatter. Every HTTP
//! request gets a span carrying a generated request id, and a completion
//! event with its status code and duration.

use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::{Instrument, info, info_span};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::{LogFormat, LoggingConfig};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry.with(fmt::layer().with_target(false).json()).try_init()?,
        LogFormat::Compact => {
            registry.with(fmt::layer().with_target(false).compact()).try_init()?
        }
    }

    info!(format = ?config.format, "Logging initialized");
    Ok(())
}

/// Middleware logging status code and duration of every request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    );

    let start = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let duration_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

    span.in_scope(|| {
        info!(status_code = response.status().as_u16(), duration_ns, "Request completed");
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
