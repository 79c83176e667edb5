//! Storage error to HTTP error conversion.

use bukket_storage::Error as StorageError;

use crate::handler::{Error, ErrorKind};

/// Tracing target for storage error conversions.
const TRACING_TARGET: &str = "bukket_server::handler::storage_error";

impl From<StorageError> for Error<'static> {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(resource) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    resource = %resource,
                    "storage resource not found"
                );
                ErrorKind::NotFound.with_resource(resource)
            }
            StorageError::InvalidRequest(message) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    error = %message,
                    "invalid storage request"
                );
                ErrorKind::BadRequest.with_message(message)
            }
            StorageError::BucketAlreadyExists(bucket) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    bucket = %bucket,
                    "bucket already exists"
                );
                ErrorKind::BadRequest
                    .with_message(format!("The bucket {bucket} already exists"))
                    .with_resource(bucket)
            }
            StorageError::Service { code, message } => {
                tracing::error!(
                    target: TRACING_TARGET,
                    code = ?code,
                    error = %message,
                    "storage service error"
                );
                let error = ErrorKind::InternalServerError.with_message(message);
                match code {
                    Some(code) => error.with_context(code),
                    None => error,
                }
            }
            StorageError::Config(message) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %message,
                    "storage configuration error"
                );
                ErrorKind::InternalServerError
                    .with_message("Check the S3 configuration")
                    .with_context(message)
            }
            StorageError::Network(message) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %message,
                    "storage service unreachable"
                );
                ErrorKind::InternalServerError
                    .with_message("The storage service could not be reached")
                    .with_context(message)
            }
            StorageError::Io(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "storage io error"
                );
                ErrorKind::InternalServerError.with_context(error.to_string())
            }
        }
    }
}
