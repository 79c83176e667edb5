//! Service error to HTTP error conversion.

use crate::handler::{Error, ErrorKind};
use crate::{Error as ServiceError, ErrorKind as ServiceErrorKind};

/// Tracing target for service error conversions.
const TRACING_TARGET: &str = "bukket_server::handler::service_error";

impl From<ServiceError> for Error<'static> {
    fn from(error: ServiceError) -> Self {
        if let Some(source) = error.storage_source()
            && source.is_not_found()
        {
            return ErrorKind::NotFound.with_context(error.message().to_owned());
        }

        tracing::error!(
            target: TRACING_TARGET,
            kind = %error.kind(),
            error = %error,
            "service error"
        );

        match error.kind() {
            ServiceErrorKind::Config => ErrorKind::BadRequest
                .with_message(error.message().to_owned())
                .with_context(error.to_string()),
            ServiceErrorKind::Storage => ErrorKind::InternalServerError
                .with_message(error.message().to_owned())
                .with_context(error.to_string()),
            ServiceErrorKind::FileSystem | ServiceErrorKind::Internal => {
                ErrorKind::InternalServerError.with_context(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_system_errors_hide_details() {
        let error = Error::from(ServiceError::file_system("cannot write /root/x"));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.message(), None);
    }

    #[test]
    fn wrapped_not_found_is_404() {
        let storage = bukket_storage::Error::NotFound("photos".into());
        let error = Error::from(ServiceError::from(storage));
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn config_errors_are_bad_requests() {
        let error = Error::from(ServiceError::config("access key is required"));
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("access key is required"));
    }
}
