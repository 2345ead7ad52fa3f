//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Token entry points and HTTP handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every API log line
//! - Private keys and signatures are never logged

pub mod logging;
pub mod metrics;
