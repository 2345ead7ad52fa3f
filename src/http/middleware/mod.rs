//! Request middleware for the token API.

pub mod caller;

pub use caller::{api_key_middleware, caller_context_middleware, CallerContext, X_CALLER_ADDRESS};
