//! Storage error types.

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Error type for object storage operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Configuration error.
    ///
    /// Invalid endpoint, region or credentials supplied to the client.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request parameters, such as an empty bucket name.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bucket or object does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The bucket name is already taken, by this account or another one.
    #[error("Bucket already exists: {0}")]
    BucketAlreadyExists(String),

    /// Error response returned by the storage service.
    #[error("Storage service error: {message}")]
    Service {
        /// Service error code, e.g. `AccessDenied`.
        code: Option<String>,
        /// Human-readable message reported by the service.
        message: String,
    },

    /// The request never produced a service response.
    ///
    /// Covers connection failures, timeouts and unreadable responses.
    #[error("Network error: {0}")]
    Network(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates a new service error.
    pub fn service(code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.map(str::to_owned),
            message: message.into(),
        }
    }

    /// Returns whether this error indicates a missing bucket or object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns whether this error originated from a storage service response.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::BucketAlreadyExists(_) | Self::Service { .. }
        )
    }

    /// Classifies a service error code for the given resource.
    pub(crate) fn from_service_code(
        code: Option<&str>,
        status: u16,
        message: impl Into<String>,
        resource: &str,
    ) -> Self {
        match code {
            Some("BucketAlreadyExists" | "BucketAlreadyOwnedByYou") => {
                Self::BucketAlreadyExists(resource.to_owned())
            }
            Some("NoSuchBucket" | "NoSuchKey" | "NotFound") => Self::NotFound(resource.to_owned()),
            _ if status == 404 => Self::NotFound(resource.to_owned()),
            _ => Self::service(code, message),
        }
    }

    /// Converts an AWS SDK error for an operation on `resource`.
    pub(crate) fn from_sdk<E>(err: SdkError<E>, resource: &str) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    {
        match &err {
            SdkError::ServiceError(context) => {
                let code = context.err().code();
                let status = context.raw().status().as_u16();
                let message = context
                    .err()
                    .message()
                    .map(str::to_owned)
                    .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

                Self::from_service_code(code, status, message, resource)
            }
            SdkError::ConstructionFailure(_) => {
                Self::InvalidRequest(DisplayErrorContext(&err).to_string())
            }
            _ => Self::Network(DisplayErrorContext(&err).to_string()),
        }
    }
}

/// Outcome of a failed bucket creation that the user can act on.
///
/// Obtained from [`Error`] with `TryFrom`. Errors that did not come from the
/// storage service are handed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateBucketError {
    /// The requested name is already taken.
    #[error("the bucket {0} already exists")]
    AlreadyExists(String),

    /// Any other service-reported failure, carrying the service message.
    #[error("{0}")]
    Other(String),
}

impl TryFrom<Error> for CreateBucketError {
    type Error = Error;

    fn try_from(err: Error) -> Result<Self, Self::Error> {
        match err {
            Error::BucketAlreadyExists(name) => Ok(Self::AlreadyExists(name)),
            Error::Service { message, .. } => Ok(Self::Other(message)),
            other => Err(other),
        }
    }
}

/// Specialized [`Result`] type for storage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
