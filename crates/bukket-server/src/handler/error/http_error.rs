//! Handler errors rendered as HTML error pages.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// Error returned by request handlers.
///
/// The [`ErrorKind`] picks the status code and the page's base text. A
/// handler may add a message and the bucket or object involved, which are
/// shown, and context, which is only logged.
#[derive(Debug, Clone)]
#[must_use = "errors do nothing unless rendered"]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
}

impl Error<'static> {
    /// Creates an error without details.
    #[inline]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            resource: None,
            context: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Sets the text shown below the page heading.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Names the bucket or object the failure concerns.
    #[inline]
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Adds detail for the logs. It never reaches the browser.
    #[inline]
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    fn page(self) -> ErrorResponse<'a> {
        let page = self.kind.response();
        let page = match self.message {
            Some(message) => page.with_message(message),
            None => page,
        };
        let page = match self.resource {
            Some(resource) => page.with_resource(resource),
            None => page,
        };
        match self.context {
            Some(context) => page.with_context(context),
            None => page,
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.kind.response();
        write!(f, "{} {}", page.status.as_u16(), page.name)?;

        match &self.message {
            Some(message) => write!(f, ": {message}")?,
            None => write!(f, ": {}", page.message)?,
        }
        if let Some(resource) = &self.resource {
            write!(f, " ({resource})")?;
        }
        if let Some(context) = &self.context {
            write!(f, " [{context}]")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    #[inline]
    fn into_response(self) -> Response {
        self.page().into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result of a request handler.
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Error page categories.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400, a path segment could not be parsed.
    MissingPathParam,
    /// 400, the form or query was rejected.
    BadRequest,
    /// 404, no such bucket, object or page.
    NotFound,
    /// 413, the upload exceeds the body limit.
    PayloadTooLarge,
    /// 500, storage or server failure.
    #[default]
    InternalServerError,
}

impl ErrorKind {
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Shorthand for `self.into_error().with_message(message)`.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Shorthand for `self.into_error().with_resource(resource)`.
    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    /// Shorthand for `self.into_error().with_context(context)`.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the page for this kind before any details are added.
    pub const fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::MissingPathParam => ErrorResponse::MISSING_PATH_PARAM,
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::PayloadTooLarge => ErrorResponse::PAYLOAD_TOO_LARGE,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response().name)
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_internal_server_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn builder_keeps_every_detail() {
        let error = ErrorKind::NotFound
            .with_message("No such key")
            .with_resource("photos/cat.png")
            .with_context("NoSuchKey");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("No such key"));
        assert_eq!(error.resource(), Some("photos/cat.png"));
        assert_eq!(error.context(), Some("NoSuchKey"));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn display_lists_status_and_details() {
        let error = ErrorKind::BadRequest
            .with_message("Missing file")
            .with_resource("photos")
            .with_context("field File absent");

        assert_eq!(
            error.to_string(),
            "400 bad_request: Missing file (photos) [field File absent]"
        );
    }

    #[test]
    fn display_falls_back_to_kind_message() {
        let display = Error::new(ErrorKind::NotFound).to_string();
        assert_eq!(display, "404 not_found: Nothing was found at this address");
    }

    #[test]
    fn borrowed_details_are_accepted() {
        let key = String::from("dir/file.txt");
        let error = ErrorKind::NotFound.with_resource(key.as_str());
        assert_eq!(error.resource(), Some("dir/file.txt"));
    }

    #[test]
    fn every_kind_maps_to_an_error_status() {
        let kinds = [
            ErrorKind::MissingPathParam,
            ErrorKind::BadRequest,
            ErrorKind::NotFound,
            ErrorKind::PayloadTooLarge,
            ErrorKind::InternalServerError,
        ];

        for kind in kinds {
            let response = kind.response();
            assert!(!response.name.is_empty());
            assert!(response.status.is_client_error() || response.status.is_server_error());
            assert_eq!(kind.into_response().status(), kind.status_code());
        }
    }
}
