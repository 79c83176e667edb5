use std::borrow::Cow;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::view;

/// Tracing target for rendered error pages.
const TRACING_TARGET: &str = "bukket_server::handler::response";

/// HTTP error page representation.
///
/// The name, message and resource are shown on the page. The context is
/// only logged.
#[must_use = "error responses do nothing unless rendered"]
#[derive(Debug, Clone)]
pub struct ErrorResponse<'a> {
    /// Short machine-readable name
    pub name: Cow<'a, str>,
    /// User-facing error message
    pub message: Cow<'a, str>,
    /// The bucket or object the error relates to
    pub resource: Option<Cow<'a, str>>,
    /// Internal context for debugging
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "The submitted form could not be read",
        StatusCode::BAD_REQUEST,
    );
    pub const MISSING_PATH_PARAM: Self = Self::new(
        "missing_path_param",
        "The address is missing a bucket or object name",
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "Nothing was found at this address",
        StatusCode::NOT_FOUND,
    );
    pub const PAYLOAD_TOO_LARGE: Self = Self::new(
        "payload_too_large",
        "The uploaded file is larger than this server accepts",
        StatusCode::PAYLOAD_TOO_LARGE,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Something went wrong while talking to storage",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            context: None,
            status,
        }
    }

    /// Sets the resource, joining it to an existing one with `/`.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let new_resource = resource.into();
        self.resource = Some(match self.resource {
            Some(existing) => Cow::Owned(format!("{existing}/{new_resource}")),
            None => new_resource,
        });
        self
    }

    /// Appends a sentence to the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        let new_message = message.into();
        self.message = Cow::Owned(format!("{}. {}", self.message, new_message));
        self
    }

    /// Attaches context, joining it to existing context with `; `.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{existing}; {new_context}")),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        if let Some(context) = self.context.as_deref() {
            tracing::debug!(
                target: TRACING_TARGET,
                status = %self.status,
                name = %self.name,
                context = %context,
                "Rendering error page"
            );
        }

        let message = match self.resource.as_deref() {
            Some(resource) => format!("{} ({resource})", self.message),
            None => self.message.into_owned(),
        };

        let page = view::error_page(self.status, &self.name, &message);
        (self.status, page).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn resources_join_with_slash() {
        let response = ErrorResponse::NOT_FOUND
            .with_resource("photos")
            .with_resource("cat.png");

        assert_eq!(response.resource.as_deref(), Some("photos/cat.png"));
    }

    #[test]
    fn messages_append_sentences() {
        let response = ErrorResponse::BAD_REQUEST
            .with_message("Missing file")
            .with_message("Choose a file first");

        assert_eq!(
            &response.message,
            "The submitted form could not be read. Missing file. Choose a file first"
        );
    }

    #[test]
    fn contexts_join_with_semicolon() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("dispatch failure")
            .with_context("connection refused");

        assert_eq!(
            response.context.as_deref(),
            Some("dispatch failure; connection refused")
        );
    }

    #[tokio::test]
    async fn renders_html_page_without_context() -> anyhow::Result<()> {
        let response = ErrorResponse::NOT_FOUND
            .with_resource("photos/cat.png")
            .with_context("internal detail")
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let body = String::from_utf8(body.to_vec())?;
        assert!(body.contains("Nothing was found at this address (photos/cat.png)"));
        assert!(!body.contains("internal detail"));
        Ok(())
    }
}
