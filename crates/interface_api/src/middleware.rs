//! API middleware
//!
//! Caller identification and audit logging. There is no authentication
//! layer here; callers identify themselves with the `X-Caller-Id` header
//! and the access policy decides what that caller may see.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use domain_metering::CallerId;

/// Header carrying the caller identity
pub const CALLER_HEADER: &str = "x-caller-id";

/// Caller identification middleware
///
/// Requires the `X-Caller-Id` header on every request it wraps and makes
/// the identity available to handlers via request extensions.
pub async fn caller_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let caller = request
        .headers()
        .get(CALLER_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    match caller {
        Some(caller) => {
            request.extensions_mut().insert(CallerId::new(caller));
            Ok(next.run(request).await)
        }
        None => {
            warn!("missing {} header", CALLER_HEADER);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Audit logging middleware
///
/// Logs every API request with its caller, outcome, and latency.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let caller = request
        .extensions()
        .get::<CallerId>()
        .map(|c| c.as_str().to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        caller = %caller,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}
