//! Request body size limiting middleware.

use axum::Router;
use axum::extract::DefaultBodyLimit;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;

/// Default maximum request body size: 64MB
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024 * 1024;

/// Configuration for the upload size limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct BodyLimitConfig {
    /// Largest accepted request body in bytes, which bounds uploaded files.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MAX_UPLOAD_SIZE", default_value_t = DEFAULT_MAX_BODY_SIZE)
    )]
    pub max_upload_size: usize,
}

impl Default for BodyLimitConfig {
    fn default() -> Self {
        Self {
            max_upload_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// Extension trait for `axum::`[`Router`] to limit request bodies.
pub trait RouterBodyLimitExt<S> {
    /// Replaces axum's default body limit with `config.max_upload_size`.
    fn with_body_limit(self, config: &BodyLimitConfig) -> Self;
}

impl<S> RouterBodyLimitExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_body_limit(self, config: &BodyLimitConfig) -> Self {
        self.layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.max_upload_size))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum_test::TestServer;
    use bytes::Bytes;

    use super::*;

    async fn echo_len(body: Bytes) -> String {
        body.len().to_string()
    }

    #[test]
    fn default_max_body_size() {
        assert_eq!(BodyLimitConfig::default().max_upload_size, 64 * 1024 * 1024);
    }

    #[tokio::test]
    async fn rejects_oversized_bodies() -> anyhow::Result<()> {
        let config = BodyLimitConfig {
            max_upload_size: 16,
        };
        let app = Router::new()
            .route("/", post(echo_len))
            .with_body_limit(&config);
        let server = TestServer::new(app)?;

        let response = server.post("/").bytes(Bytes::from_static(b"small")).await;
        response.assert_text("5");

        let response = server.post("/").bytes(Bytes::from(vec![0u8; 64])).await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        Ok(())
    }

    #[tokio::test]
    async fn lifts_axum_default_limit() -> anyhow::Result<()> {
        let app = Router::new()
            .route("/", post(echo_len))
            .with_body_limit(&BodyLimitConfig::default());
        let server = TestServer::new(app)?;

        let response = server
            .post("/")
            .bytes(Bytes::from(vec![0u8; 3 * 1024 * 1024]))
            .await;
        response.assert_text((3 * 1024 * 1024).to_string());
        Ok(())
    }
}
