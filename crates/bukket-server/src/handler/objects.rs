//! Object details, downloads, deletion and uploads.

use axum::Router;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use bukket_storage::UploadObject;

use crate::extract::{Multipart, Path, Storage};
use crate::handler::request::{BucketPathParams, ObjectPathParams};
use crate::handler::{ErrorKind, Result};
use crate::service::{PresignPolicy, ServiceState};
use crate::view::{self, FILE_FIELD, url};

/// Tracing target for object operations.
const TRACING_TARGET: &str = "bukket_server::handler::objects";

/// Shows an object's metadata and a signed download link.
#[tracing::instrument(skip_all, fields(bucket = %params.bucket, key = %params.key))]
async fn object_details(
    storage: Storage,
    State(presign): State<PresignPolicy>,
    Path(params): Path<ObjectPathParams>,
) -> Result<Html<String>> {
    let object = storage.stat_object(&params.bucket, &params.key).await?;
    let download_url = storage
        .presign_get(&params.bucket, &params.key, presign.expires_in)
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        bucket = %params.bucket,
        key = %params.key,
        size = object.size,
        "read object details"
    );

    Ok(view::detail(&params.bucket, &object, &download_url))
}

/// Sends an object's content as an attachment.
#[tracing::instrument(skip_all, fields(bucket = %params.bucket, key = %params.key))]
async fn download_object(
    storage: Storage,
    Path(params): Path<ObjectPathParams>,
) -> Result<Response> {
    let object = storage.get_object(&params.bucket, &params.key).await?;

    let content_type = object
        .info
        .content_type
        .as_deref()
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static(mime::APPLICATION_OCTET_STREAM.as_ref()));
    let disposition = content_disposition(&params.key);

    tracing::debug!(
        target: TRACING_TARGET,
        bucket = %params.bucket,
        key = %params.key,
        size = object.body.len(),
        "sending object"
    );

    Ok((
        [(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)],
        object.body,
    )
        .into_response())
}

/// Builds an `attachment` disposition naming the key's last segment.
fn content_disposition(key: &str) -> HeaderValue {
    let file_name: String = key
        .rsplit('/')
        .next()
        .unwrap_or(key)
        .chars()
        .map(|c| match c {
            ' '..='~' if c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect();

    HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Deletes an object and returns to its bucket.
#[tracing::instrument(skip_all, fields(bucket = %params.bucket, key = %params.key))]
async fn delete_object(storage: Storage, Path(params): Path<ObjectPathParams>) -> Result<Redirect> {
    storage.delete_object(&params.bucket, &params.key).await?;

    tracing::info!(
        target: TRACING_TARGET,
        bucket = %params.bucket,
        key = %params.key,
        "object deleted"
    );

    Ok(Redirect::to(&url::bucket(&params.bucket)))
}

/// Shows the upload form.
#[tracing::instrument(skip_all, fields(bucket = %params.bucket))]
async fn add_file_form(_storage: Storage, Path(params): Path<BucketPathParams>) -> Html<String> {
    view::add_file(&params.bucket)
}

/// Stores the uploaded file under its file name.
#[tracing::instrument(skip_all, fields(bucket = %params.bucket))]
async fn add_file(
    storage: Storage,
    Path(params): Path<BucketPathParams>,
    Multipart(mut multipart): Multipart,
) -> Result<Redirect> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let body = field.bytes().await?;

        let mut object = UploadObject::new(file_name, body);
        object.content_type = content_type;
        upload = Some(object);
        break;
    }

    let Some(upload) = upload else {
        return Err(ErrorKind::BadRequest
            .with_message("Choose a file to upload")
            .with_context("multipart field File is missing"));
    };

    if upload.key.trim().is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("Choose a file to upload")
            .with_context("uploaded file has no name"));
    }

    tracing::info!(
        target: TRACING_TARGET,
        bucket = %params.bucket,
        key = %upload.key,
        size = upload.body.len(),
        content_type = ?upload.content_type,
        "uploading file"
    );

    let object = storage.put_object(&params.bucket, upload).await?;

    tracing::info!(
        target: TRACING_TARGET,
        bucket = %params.bucket,
        key = %object.key,
        "file uploaded"
    );

    Ok(Redirect::to(&url::bucket(&params.bucket)))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/details/{bucket}/{*key}", get(object_details))
        .route("/download/{bucket}/{*key}", get(download_object))
        .route("/delete/{bucket}/{*key}", get(delete_object))
        .route("/add_file/{bucket}", get(add_file_form).post(add_file))
}
