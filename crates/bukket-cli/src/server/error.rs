//! Server error types with recovery suggestions.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Errors raised while binding or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the configured address.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server stopped with an IO error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Creates a bind error with address context.
    pub fn bind(address: impl ToString, source: io::Error) -> Self {
        Self::Bind {
            address: address.to_string(),
            source,
        }
    }

    /// Returns the underlying IO error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Bind { source, .. } => source,
            Self::Runtime(err) => err,
        }
    }

    /// Returns whether retrying with a different environment might succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.io_error().kind(),
            io::ErrorKind::PermissionDenied
                | io::ErrorKind::AddrInUse
                | io::ErrorKind::AddrNotAvailable
                | io::ErrorKind::Interrupted
        )
    }

    /// Provides a human-readable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        suggestion_for(self.io_error())
    }
}

/// Suggests a fix for common IO errors.
pub(crate) fn suggestion_for(err: &io::Error) -> Option<&'static str> {
    match err.kind() {
        io::ErrorKind::PermissionDenied => {
            Some("Try using a port above 1024 or run with appropriate privileges")
        }
        io::ErrorKind::AddrInUse => {
            Some("The port is already in use. Try a different port or stop the conflicting service")
        }
        io::ErrorKind::AddrNotAvailable => {
            Some("The address is not available. Check network interface configuration")
        }
        io::ErrorKind::Interrupted => Some("The operation was interrupted, you may retry"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_errors_in_use_have_suggestions() {
        let error = ServerError::bind(
            "127.0.0.1:3000",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert!(error.is_recoverable());
        assert!(error.suggestion().is_some_and(|s| s.contains("already in use")));
        assert!(error.to_string().starts_with("Failed to bind to 127.0.0.1:3000"));
    }

    #[test]
    fn unknown_runtime_errors_have_no_suggestion() {
        let error = ServerError::Runtime(io::Error::other("boom"));

        assert!(!error.is_recoverable());
        assert!(error.suggestion().is_none());
    }
}
