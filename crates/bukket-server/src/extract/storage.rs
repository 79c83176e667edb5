use std::ops::Deref;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use bukket_storage::StorageBackend;

use crate::service::{Connection, StorageHandle};
use crate::view::url;

/// Tracing target for storage extraction.
const TRACING_TARGET: &str = "bukket_server::extract::storage";

/// The storage connection current when the request arrived.
///
/// A configuration change during the request does not affect it.
/// Extraction fails with [`NotConfigured`] when no connection exists.
#[must_use]
#[derive(Clone)]
pub struct Storage {
    connection: Arc<Connection>,
    backend: Arc<dyn StorageBackend>,
}

impl Storage {
    /// Wraps an established connection.
    pub fn new(connection: Arc<Connection>) -> Self {
        let backend = connection.backend();
        Self {
            connection,
            backend,
        }
    }
}

impl Deref for Storage {
    type Target = dyn StorageBackend;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.backend.as_ref()
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("credentials", &self.connection.credentials())
            .finish_non_exhaustive()
    }
}

impl<S> FromRequestParts<S> for Storage
where
    StorageHandle: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = NotConfigured;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let handle = StorageHandle::from_ref(state);
        match handle.current().await {
            Some(connection) => Ok(Self::new(connection)),
            None => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    path = %parts.uri.path(),
                    "no storage connection, redirecting to configuration"
                );
                Err(NotConfigured)
            }
        }
    }
}

/// Rejection used when no credentials have been configured yet.
///
/// Responds with `303 See Other` to the configuration form.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotConfigured;

impl IntoResponse for NotConfigured {
    fn into_response(self) -> Response {
        Redirect::to(url::CONFIGURATION).into_response()
    }
}
