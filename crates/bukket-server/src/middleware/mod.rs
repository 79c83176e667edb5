//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Error handling (panics, timeouts, service errors)
//! - Observability (tracing, request IDs)
//! - Upload size limits
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use bukket_server::middleware::{
//!     BodyLimitConfig, RecoveryConfig, RouterBodyLimitExt, RouterObservabilityExt,
//!     RouterRecoveryExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_body_limit(&BodyLimitConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod body_limit;
mod observability;
mod recovery;

pub use body_limit::{BodyLimitConfig, DEFAULT_MAX_BODY_SIZE, RouterBodyLimitExt};
pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{DEFAULT_REQUEST_TIMEOUT, RecoveryConfig, RouterRecoveryExt};
