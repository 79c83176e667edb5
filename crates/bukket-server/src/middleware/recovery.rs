//! Timeouts and panic recovery.

use std::any::Any;
use std::future::ready;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
#[cfg(feature = "config")]
use clap::Args;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};

/// Tracing target for error recovery.
const TRACING_TARGET_ERROR: &str = "bukket_server::recovery::error";

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "bukket_server::recovery::panic";

type ResponseFut = BoxFuture<'static, Response>;
type Panic = Box<dyn Any + Send + 'static>;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Request timeout applied by [`RouterRecoveryExt::with_recovery`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Seconds a request may run before it is answered with a 500 page.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT)
    )]
    pub request_timeout: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self::with_timeout_secs(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl RecoveryConfig {
    pub fn with_timeout_secs(request_timeout: u64) -> Self {
        Self { request_timeout }
    }

    #[inline]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Extension trait for `axum::`[`Router`] to turn failures into error pages.
pub trait RouterRecoveryExt<S> {
    /// Wraps the router so that timeouts, panics and middleware errors
    /// render the 500 page instead of dropping the connection.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;

    /// Same as [`with_recovery`] with the default timeout.
    ///
    /// [`with_recovery`]: RouterRecoveryExt::with_recovery
    fn with_default_recovery(self) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        self.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_error))
                .layer(CatchPanicLayer::custom(catch_panic))
                .layer(TimeoutLayer::new(config.request_timeout())),
        )
    }

    fn with_default_recovery(self) -> Self {
        self.with_recovery(&RecoveryConfig::default())
    }
}

fn handle_error(err: tower::BoxError) -> ResponseFut {
    let error = if err.is::<Elapsed>() {
        tracing::error!(target: TRACING_TARGET_ERROR, "request timed out");
        ErrorKind::InternalServerError.with_message("Request timeout")
    } else {
        tracing::error!(
            target: TRACING_TARGET_ERROR,
            error = %err,
            "middleware failed"
        );
        ErrorKind::InternalServerError.with_context(err.to_string())
    };

    ready(error.into_response()).boxed()
}

/// Returns the payload of a `panic!` with a string message.
fn panic_message(panic: &Panic) -> Option<&str> {
    panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&'static str>().copied())
}

fn catch_panic(panic: Panic) -> Response {
    if let Some(error) = panic.downcast_ref::<Error<'static>>() {
        tracing::error!(target: TRACING_TARGET_PANIC, error = %error, "handler panicked");
        return error.clone().into_response();
    }

    tracing::error!(
        target: TRACING_TARGET_PANIC,
        message = panic_message(&panic).unwrap_or("non-string payload"),
        "handler panicked"
    );

    ErrorKind::InternalServerError
        .with_message("An unexpected panic occurred")
        .into_response()
}
