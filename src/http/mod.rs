//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers: request ID, trace, timeout, body limit)
//!     → request.rs (per-route latency and status)
//!     → middleware/ (API key, X-Caller-Address → CallerContext)
//!     → handlers.rs (parse, call one Token entry point)
//!     → response.rs (TokenError → status + JSON body)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{CallerContext, X_CALLER_ADDRESS};
pub use request::X_REQUEST_ID;
pub use response::{ApiError, ErrorBody, Quantity};
pub use server::{AppState, HttpServer};
