//! Logging middleware
//!
//! Records HTTP request and response information

use crate::handlers::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Requests slower than this are flagged, a bit above the rate provider timeout
pub fn slow_request_threshold(state: &AppState) -> Duration {
    Duration::from_secs(state.settings.rates.timeout + 1)
}

/// Request logging middleware
///
/// Wraps each request in a span carrying a fresh request id
pub async fn request_logging_middleware(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
        query = %uri.query().unwrap_or(""),
    );

    async move {
        info!(
            "Request started: {} {} - Accept: {}",
            method,
            uri,
            headers
                .get("accept")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
        );

        let response = next.run(request).await;

        let duration = start_time.elapsed();
        log_status(response.status(), duration);

        if duration > slow_request_threshold(&state) {
            warn!(
                "Slow request detected: {} {} - Duration: {:.2}s",
                method,
                uri,
                duration.as_secs_f64()
            );
        }

        response
    }
    .instrument(span)
    .await
}

fn log_status(status: StatusCode, duration: Duration) {
    let millis = duration.as_secs_f64() * 1000.0;
    if status.is_success() {
        info!("Request completed: {} - Duration: {:.2}ms", status, millis);
    } else if status.is_client_error() {
        warn!("Client error: {} - Duration: {:.2}ms", status, millis);
    } else if status.is_server_error() {
        warn!("Server error: {} - Duration: {:.2}ms", status, millis);
    } else {
        info!("Request response: {} - Duration: {:.2}ms", status, millis);
    }
}
