//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use bukket_server::handler::routes;
//! use bukket_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config).await?;
//! let app: axum::Router = routes().with_state(state);
//! # let _ = app;
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod assets;
mod buckets;
mod configuration;
mod error;
mod objects;
mod request;
mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with every page, form target and asset.
///
/// Unknown paths render the HTML 404 page.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(buckets::routes())
        .merge(objects::routes())
        .merge(configuration::routes())
        .merge(assets::routes())
        .fallback(fallback)
}
