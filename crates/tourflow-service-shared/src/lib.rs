//! Shared infrastructure for tourflow HTTP microservices.
//!
//! This crate provides the common glue used by all three endpoint services:
//!
//! - [`AppState`]: database path configuration handed to every handler
//! - [`ApiError`]: the JSON error envelope (400/405/500) the website expects
//! - [`cors`]: permissive CORS layer and the explicit OPTIONS preflight reply
//! - [`health`]: liveness/readiness probe handlers
//! - [`logging`]: structured JSON logging setup
//!
//! # Architecture
//!
//! The services follow a thin-handler pattern: all business logic lives in
//! `tourflow-lib`, and handlers only parse input, open a scoped store,
//! call library APIs, and format the response. Each handler invocation
//! opens its own connection and closes it on drop, so there is no shared
//! in-process state beyond the configured database path.
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides scratch databases for handler
//! testing. Enable the `test-utils` feature to use it from dependent
//! crates.

#![deny(warnings)]

mod error;
pub mod cors;
pub mod health;
pub mod logging;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cors::{cors_layer, preflight};
pub use error::ApiError;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use state::AppState;

/// Generate a unique request ID for tracing.
pub fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    format!("req-{timestamp:x}")
}
