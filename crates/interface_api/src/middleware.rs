//! API middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::{info, info_span, warn, Instrument};

use core_kernel::TraceId;

use crate::{error::ApiError, AppState};

pub const TRACE_ID_HEADER: &str = "x-trace-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const API_KEY_HEADER: &str = "x-api-key";

/// Trace context middleware
///
/// Adopts the caller's `x-trace-id` (or `x-request-id`) when it is usable,
/// otherwise generates one. The rest of the request runs inside a `request`
/// span and the task-local trace scope, and the id is echoed back on the
/// response.
pub async fn trace_middleware(request: Request<Body>, next: Next) -> Response {
    let headers = request.headers();
    let trace_id = headers
        .get(TRACE_ID_HEADER)
        .or_else(|| headers.get(REQUEST_ID_HEADER))
        .and_then(|value| value.to_str().ok())
        .and_then(TraceId::from_header)
        .unwrap_or_else(TraceId::generate);

    let span = info_span!("request", trace_id = %trace_id);
    let mut response = trace_id
        .clone()
        .scope(next.run(request))
        .instrument(span)
        .await;

    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

/// API key middleware
///
/// A no-op unless an API key is configured.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.config.api_key() {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok());

        if !secret_matches(provided, expected) {
            warn!(uri = %request.uri(), "Missing or invalid API key");
            return Err(ApiError::Unauthorized("Invalid or missing API key".to_string()));
        }
    }

    Ok(next.run(request).await)
}

/// Compares a client-supplied secret without short-circuiting on content
pub(crate) fn secret_matches(provided: Option<&str>, expected: &str) -> bool {
    provided.is_some_and(|p| bool::from(p.as_bytes().ct_eq(expected.as_bytes())))
}

/// Access log middleware
pub async fn access_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "API request"
    );

    response
}
