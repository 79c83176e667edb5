//! Embedded stylesheet and images.

use axum::Router;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::get;

use crate::service::ServiceState;
use crate::view::url;

const STYLESHEET: &str = include_str!("../../assets/style.css");
const BACKGROUND: &[u8] = include_bytes!("../../assets/background.gif");
const BUCKET: &[u8] = include_bytes!("../../assets/bucket.png");

const CACHE_POLICY: &str = "public, max-age=86400";

fn asset(content_type: &mime::Mime, body: &'static [u8]) -> impl IntoResponse + use<> {
    (
        [
            (CONTENT_TYPE, content_type.to_string()),
            (CACHE_CONTROL, CACHE_POLICY.to_owned()),
        ],
        body,
    )
}

async fn stylesheet() -> impl IntoResponse {
    asset(&mime::TEXT_CSS_UTF_8, STYLESHEET.as_bytes())
}

async fn background() -> impl IntoResponse {
    asset(&mime::IMAGE_GIF, BACKGROUND)
}

async fn bucket_image() -> impl IntoResponse {
    asset(&mime::IMAGE_PNG, BUCKET)
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route(url::STYLESHEET, get(stylesheet))
        .route("/background.gif", get(background))
        .route(url::BUCKET_IMAGE, get(bucket_image))
}

#[cfg(test)]
mod test {
    use crate::handler::test::{create_test_server_with_state, create_unconfigured_state};

    #[tokio::test]
    async fn assets_are_served_without_configuration() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let server = create_test_server_with_state(create_unconfigured_state(dir.path()))?;

        let response = server.get("/style.css").await;
        response.assert_status_ok();
        response.assert_header("content-type", "text/css; charset=utf-8");
        assert!(response.text().contains("div.bucket"));

        let response = server.get("/background.gif").await;
        response.assert_status_ok();
        response.assert_header("content-type", "image/gif");
        assert!(response.as_bytes().starts_with(b"GIF"));

        let response = server.get("/bucket.png").await;
        response.assert_status_ok();
        response.assert_header("cache-control", "public, max-age=86400");
        assert!(response.as_bytes().starts_with(b"\x89PNG"));
        Ok(())
    }
}
