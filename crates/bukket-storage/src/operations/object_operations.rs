//! Object operations for S3 storage.

use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, error, info, instrument};

use super::{to_size, to_timestamp};
use crate::types::{ListObjectsRequest, ObjectData, ObjectInfo, ObjectListing, UploadObject};
use crate::{Error, Result, S3Storage, TRACING_TARGET_OBJECTS, TRACING_TARGET_OPERATIONS};

/// Content disposition stored with every uploaded object.
const CONTENT_DISPOSITION: &str = "attachment";

impl S3Storage {
    /// Lists one page of objects in a bucket.
    ///
    /// Keys come back in the order the service returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket))]
    pub async fn list_objects(
        &self,
        bucket: &str,
        request: &ListObjectsRequest,
    ) -> Result<ObjectListing> {
        debug!(
            target: TRACING_TARGET_OPERATIONS,
            bucket = %bucket,
            marker = ?request.marker,
            max_keys = request.max_keys,
            "Listing objects"
        );

        let max_keys = i32::try_from(request.max_keys)
            .map_err(|_| Error::invalid_request("max_keys is out of range"))?;

        let start = std::time::Instant::now();
        let result = self
            .as_inner()
            .list_objects()
            .bucket(bucket)
            .set_marker(request.marker.clone())
            .max_keys(max_keys)
            .send()
            .await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                let objects: Vec<ObjectInfo> = response
                    .contents()
                    .iter()
                    .filter_map(|object| {
                        let mut info = ObjectInfo::new(object.key()?, to_size(object.size()));
                        info.etag = object.e_tag().map(str::to_owned);
                        info.last_modified = object.last_modified().and_then(to_timestamp);
                        Some(info)
                    })
                    .collect();
                let is_truncated = response.is_truncated().unwrap_or(false);

                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    count = objects.len(),
                    is_truncated,
                    elapsed = ?elapsed,
                    "Objects listed successfully"
                );
                Ok(ObjectListing::new(objects, is_truncated))
            }
            Err(e) => {
                let e = Error::from_sdk(e, bucket);
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to list objects"
                );
                Err(e)
            }
        }
    }

    /// Fetches object metadata without its content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the object does not exist.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn stat_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        debug!(
            target: TRACING_TARGET_OPERATIONS,
            bucket = %bucket,
            key = %key,
            "Getting object metadata"
        );

        let start = std::time::Instant::now();
        let result = self
            .as_inner()
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                let mut info = ObjectInfo::new(key, to_size(response.content_length()));
                info.etag = response.e_tag().map(str::to_owned);
                info.last_modified = response.last_modified().and_then(to_timestamp);
                info.content_type = response.content_type().map(str::to_owned);

                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    size = info.size,
                    elapsed = ?elapsed,
                    "Object metadata retrieved"
                );
                Ok(info)
            }
            Err(e) => {
                let e = Error::from_sdk(e, key);
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to get object metadata"
                );
                Err(e)
            }
        }
    }

    /// Downloads an object with its full content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the object does not exist, or
    /// [`Error::Network`] if the body cannot be read.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectData> {
        debug!(
            target: TRACING_TARGET_OPERATIONS,
            bucket = %bucket,
            key = %key,
            "Downloading object"
        );

        let start = std::time::Instant::now();
        let result = self
            .as_inner()
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let e = Error::from_sdk(e, key);
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    elapsed = ?start.elapsed(),
                    "Failed to download object"
                );
                return Err(e);
            }
        };

        let mut info = ObjectInfo::new(key, to_size(response.content_length()));
        info.etag = response.e_tag().map(str::to_owned);
        info.last_modified = response.last_modified().and_then(to_timestamp);
        info.content_type = response.content_type().map(str::to_owned);

        let body = response.body.collect().await.map_err(|e| {
            error!(
                target: TRACING_TARGET_OBJECTS,
                bucket = %bucket,
                key = %key,
                error = %e,
                elapsed = ?start.elapsed(),
                "Failed to read object body"
            );
            Error::Network(format!("Failed to read object body: {e}"))
        })?;
        let body = body.into_bytes();
        let elapsed = start.elapsed();

        info!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = body.len(),
            elapsed = ?elapsed,
            "Object downloaded successfully"
        );

        info.size = body.len() as u64;
        Ok(ObjectData { info, body })
    }

    /// Uploads an object, stored with an `attachment` content disposition.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, upload), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %upload.key))]
    pub async fn put_object(&self, bucket: &str, upload: UploadObject) -> Result<ObjectInfo> {
        let size = upload.body.len() as u64;

        debug!(
            target: TRACING_TARGET_OPERATIONS,
            bucket = %bucket,
            key = %upload.key,
            size,
            content_type = ?upload.content_type,
            "Uploading object"
        );

        let start = std::time::Instant::now();
        let result = self
            .as_inner()
            .put_object()
            .bucket(bucket)
            .key(&upload.key)
            .set_content_type(upload.content_type.clone())
            .content_disposition(CONTENT_DISPOSITION)
            .body(ByteStream::from(upload.body))
            .send()
            .await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                let mut info = ObjectInfo::new(upload.key, size);
                info.etag = response.e_tag().map(str::to_owned);
                info.content_type = upload.content_type;

                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %info.key,
                    size,
                    etag = ?info.etag,
                    elapsed = ?elapsed,
                    "Object uploaded successfully"
                );
                Ok(info)
            }
            Err(e) => {
                let e = Error::from_sdk(e, &upload.key);
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %upload.key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to upload object"
                );
                Err(e)
            }
        }
    }

    /// Deletes an object.
    ///
    /// The service reports success for keys that do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        debug!(
            target: TRACING_TARGET_OPERATIONS,
            bucket = %bucket,
            key = %key,
            "Deleting object"
        );

        let start = std::time::Instant::now();
        let result = self
            .as_inner()
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;
        let elapsed = start.elapsed();

        match result {
            Ok(_response) => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    elapsed = ?elapsed,
                    "Object deleted successfully"
                );
                Ok(())
            }
            Err(e) => {
                let e = Error::from_sdk(e, key);
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to delete object"
                );
                Err(e)
            }
        }
    }

    /// Generates a signed URL granting temporary read access to an object.
    ///
    /// Signing is local and does not contact the service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the expiry is out of range.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        debug!(
            target: TRACING_TARGET_OPERATIONS,
            bucket = %bucket,
            key = %key,
            expires_in = ?expires_in,
            "Generating presigned download URL"
        );

        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| Error::invalid_request(format!("Invalid presign expiry: {e}")))?;

        let start = std::time::Instant::now();
        let result = self
            .as_inner()
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await;
        let elapsed = start.elapsed();

        match result {
            Ok(request) => {
                debug!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    elapsed = ?elapsed,
                    "Presigned URL generated"
                );
                Ok(request.uri().to_string())
            }
            Err(e) => {
                let e = Error::from_sdk(e, key);
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to generate presigned URL"
                );
                Err(e)
            }
        }
    }
}
