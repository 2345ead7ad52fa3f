//! API error responses and request value parsing.

use alloy::primitives::U256;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::token::TokenError;

/// Error body returned by every failing API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Errors produced by API handlers and middleware.
#[derive(Debug)]
pub enum ApiError {
    /// A ledger precondition failed.
    Token(TokenError),
    /// The request itself is malformed.
    BadRequest(String),
    /// Missing or wrong credentials.
    Unauthorized(&'static str),
    /// The operation is not available in this deployment.
    Unavailable(&'static str),
    /// An internal failure unrelated to the request.
    Internal(String),
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        ApiError::Token(e)
    }
}

/// HTTP status for a ledger error.
pub fn status_for(e: &TokenError) -> StatusCode {
    match e {
        TokenError::BlacklistedAddress(_) | TokenError::BlacklistedCaller(_) => {
            StatusCode::FORBIDDEN
        }
        TokenError::UnauthorizedSigner { .. } => StatusCode::UNAUTHORIZED,
        TokenError::AlreadyRecovered(_) => StatusCode::CONFLICT,
        TokenError::MalformedSignature(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Token(e) => (status_for(&e), e.code().to_string(), e.to_string()),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, "BAD_REQUEST".to_string(), m),
            ApiError::Unauthorized(m) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED".to_string(),
                m.to_string(),
            ),
            ApiError::Unavailable(m) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UNAVAILABLE".to_string(),
                m.to_string(),
            ),
            ApiError::Internal(m) => {
                tracing::error!(error = %m, "Internal API error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL".to_string(),
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// A token quantity given either as a JSON number or a decimal/hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(u64),
    Text(String),
}

impl Quantity {
    pub fn parse(&self) -> Result<U256, ApiError> {
        match self {
            Quantity::Number(n) => Ok(U256::from(*n)),
            Quantity::Text(s) => U256::from_str(s.trim())
                .map_err(|e| ApiError::BadRequest(format!("invalid quantity '{}': {}", s, e))),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Number(0)
    }
}

impl From<U256> for Quantity {
    fn from(value: U256) -> Self {
        Quantity::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    #[test]
    fn test_quantity_forms() {
        assert_eq!(Quantity::Number(5).parse().unwrap(), U256::from(5));
        assert_eq!(
            Quantity::Text("100000".into()).parse().unwrap(),
            U256::from(100_000)
        );
        assert_eq!(Quantity::Text("0x10".into()).parse().unwrap(), U256::from(16));
        assert!(Quantity::Text("ten".into()).parse().is_err());
    }

    #[test]
    fn test_quantity_json() {
        let q: Quantity = serde_json::from_str("42").unwrap();
        assert_eq!(q, Quantity::Number(42));
        let q: Quantity = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(q, Quantity::Text("42".into()));
    }

    #[test]
    fn test_status_mapping() {
        let a = Address::repeat_byte(1);
        assert_eq!(status_for(&TokenError::BlacklistedAddress(a)), StatusCode::FORBIDDEN);
        assert_eq!(status_for(&TokenError::AlreadyRecovered(a)), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&TokenError::ZeroAddress("recipient")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&TokenError::SelfRecovery(a)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
