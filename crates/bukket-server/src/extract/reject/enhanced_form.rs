use axum::extract::rejection::FormRejection;
use axum::extract::{Form as AxumForm, FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Enhanced form data extractor with improved error handling.
///
/// Expects `application/x-www-form-urlencoded` data. A missing field is
/// reported by name on the error page.
///
/// # Examples
///
/// ```rust,no_run
/// use bukket_server::extract::Form;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct NewBucket {
///     bucket: String,
/// }
///
/// async fn create(Form(form): Form<NewBucket>) {
///     let _ = form.bucket.trim();
/// }
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Form<T>(pub T);

impl<T> Form<T> {
    /// Consumes the wrapper and returns the inner form data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumForm::<T>::from_request(req, state).await {
            Ok(AxumForm(form)) => Ok(Form(form)),
            Err(rejection) => Err(enhance_form_error(rejection)),
        }
    }
}

impl From<FormRejection> for Error<'static> {
    #[inline]
    fn from(rejection: FormRejection) -> Self {
        enhance_form_error(rejection)
    }
}

fn enhance_form_error(rejection: FormRejection) -> Error<'static> {
    tracing::debug!(
        target: "bukket_server::extract::form",
        error = %rejection,
        "Form data parsing failed"
    );

    match rejection {
        FormRejection::FailedToDeserializeForm(err) => {
            let error_message = err.to_string();
            match extract_field_name_from_error(&error_message) {
                Some(field) if error_message.contains("missing field") => ErrorKind::BadRequest
                    .with_message(format!("The form field '{field}' is required"))
                    .with_context(error_message),
                _ => ErrorKind::BadRequest
                    .with_message("Invalid form data")
                    .with_context(error_message),
            }
        }
        FormRejection::InvalidFormContentType(err) => ErrorKind::BadRequest
            .with_message("Invalid content type for form data")
            .with_context(err.to_string()),
        FormRejection::BytesRejection(err) => ErrorKind::BadRequest
            .with_message("Failed to read form data")
            .with_context(err.to_string()),
        _ => ErrorKind::BadRequest.with_message("Invalid form submission"),
    }
}

/// Extracts the field name from a serde error such as ``missing field `bucket` ``.
fn extract_field_name_from_error(error_message: &str) -> Option<&str> {
    let start = error_message.find('`')? + 1;
    let end = error_message[start..].find('`')?;
    Some(&error_message[start..start + end])
}
