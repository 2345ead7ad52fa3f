//! Caller identity and API key middleware.
//!
//! Caller-bound routes trust `X-Caller-Address`; deployments that expose
//! them beyond a trusted relayer should set `api.api_key`.

use alloy::primitives::Address;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use crate::http::response::ApiError;
use crate::http::server::AppState;

/// Header carrying the address on whose behalf a call is made.
pub const X_CALLER_ADDRESS: &str = "x-caller-address";

/// Context attached to caller-bound requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallerContext {
    pub address: Address,
}

/// Require `Authorization: Bearer <api_key>` when an API key is configured.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = &state.config.api.api_key {
        let presented = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        if presented != Some(expected.as_str()) {
            return Err(ApiError::Unauthorized("missing or invalid API key"));
        }
    }
    Ok(next.run(request).await)
}

/// Resolve the caller from `X-Caller-Address` and attach a `CallerContext`.
pub async fn caller_context_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = request
        .headers()
        .get(X_CALLER_ADDRESS)
        .ok_or(ApiError::Unauthorized("missing X-Caller-Address header"))?
        .to_str()
        .map_err(|_| ApiError::BadRequest("invalid X-Caller-Address header".to_string()))?;

    let address: Address = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid X-Caller-Address format".to_string()))?;

    request.extensions_mut().insert(CallerContext { address });
    Ok(next.run(request).await)
}
