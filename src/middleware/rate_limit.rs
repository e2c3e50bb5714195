use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_governor::{governor::GovernorConfigBuilder, GovernorError, GovernorLayer};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Type alias for the API governor layer (IP-based rate limiting)
pub type ApiGovernorLayer = GovernorLayer<
    tower_governor::key_extractor::PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    Body,
>;

/// Create a GovernorLayer limiting each client IP
/// - one token every `per_ms` milliseconds
/// - at most `burst` requests back to back
pub fn create_api_governor(per_ms: u64, burst: u32) -> AppResult<ApiGovernorLayer> {
    let config = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(burst)
        .finish()
        .ok_or_else(|| {
            AppError::Config("Rate limit period and burst must be non-zero".to_string())
        })?;

    Ok(GovernorLayer::new(Arc::new(config)).error_handler(rate_limit_error_handler))
}

pub fn rate_limit_error_handler(err: GovernorError) -> Response<Body> {
    match err {
        GovernorError::TooManyRequests { wait_time, .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": format!("Too many requests, retry in {} s", wait_time)
            })),
        )
            .into_response(),
        other => {
            tracing::error!(error = ?other, "Rate limiter failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Rate limiter failed" })),
            )
                .into_response()
        }
    }
}

/// Session id addressed by a `/api/sessions/{id}/...` path.
fn session_id_from_path(path: &str) -> Option<Uuid> {
    path.strip_prefix("/api/sessions/")?
        .split('/')
        .next()
        .and_then(|segment| Uuid::parse_str(segment).ok())
}

/// Per-request access log carrying the client address and, for booking
/// routes, the session being worked on.
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let session_id = session_id_from_path(&path);
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match status {
        StatusCode::TOO_MANY_REQUESTS => tracing::warn!(
            client_ip = %addr.ip(),
            %method,
            %path,
            ?session_id,
            "Client throttled"
        ),
        s if s.is_server_error() => tracing::error!(
            client_ip = %addr.ip(),
            %method,
            %path,
            ?session_id,
            status = s.as_u16(),
            elapsed_ms,
            "Fare request failed"
        ),
        s if s.is_client_error() => tracing::info!(
            client_ip = %addr.ip(),
            %method,
            %path,
            ?session_id,
            status = s.as_u16(),
            elapsed_ms,
            "Fare request rejected"
        ),
        s => tracing::debug!(
            client_ip = %addr.ip(),
            %method,
            %path,
            ?session_id,
            status = s.as_u16(),
            elapsed_ms,
            "Fare request served"
        ),
    }

    response
}
