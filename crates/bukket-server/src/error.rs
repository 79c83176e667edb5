//! Errors raised while building state, reading the credential file or
//! connecting to storage.

use std::borrow::Cow;
use std::error::Error as StdError;

use strum::{Display, IntoStaticStr};

/// Boxed, thread-safe error used as an error source.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result of a service operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Broad category of a service [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid configuration or credential file contents.
    Config,
    /// The storage client failed.
    Storage,
    /// Reading or writing local files failed.
    FileSystem,
    /// Anything else.
    Internal,
}

/// Service error: a kind, a message and an optional cause.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    #[inline]
    pub fn storage(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    #[inline]
    pub fn file_system(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::FileSystem, message)
    }

    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Records the error that caused this one.
    #[inline]
    pub fn with_source(self, source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..self
        }
    }

    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the storage error this error wraps, if any.
    pub fn storage_source(&self) -> Option<&bukket_storage::Error> {
        self.source
            .as_deref()
            .and_then(|source| source.downcast_ref::<bukket_storage::Error>())
    }
}

impl From<bukket_storage::Error> for Error {
    fn from(err: bukket_storage::Error) -> Self {
        let kind = match &err {
            bukket_storage::Error::Config(_) => ErrorKind::Config,
            bukket_storage::Error::Io(_) => ErrorKind::FileSystem,
            _ => ErrorKind::Storage,
        };
        Self::new(kind, err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_keeps_message() {
        let error = Error::config("invalid configuration");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "invalid configuration");
        assert_eq!(error.to_string(), "config error: invalid configuration");
    }

    #[test]
    fn source_is_exposed() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::file_system("cannot read credential file").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert!(error.storage_source().is_none());
        assert_eq!(error.kind(), ErrorKind::FileSystem);
    }

    #[test]
    fn storage_errors_are_wrapped() {
        let error = Error::from(bukket_storage::Error::NotFound("photos".into()));

        assert_eq!(error.kind(), ErrorKind::Storage);
        assert!(error.storage_source().is_some_and(|e| e.is_not_found()));

        let error = Error::from(bukket_storage::Error::Config("bad endpoint".into()));
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn kinds_render_in_snake_case() {
        let name: &'static str = ErrorKind::FileSystem.into();
        assert_eq!(name, "file_system");
        assert_eq!(ErrorKind::Internal.to_string(), "internal");
    }
}
