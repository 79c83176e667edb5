//! Bucket operations for S3 storage.

use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use tracing::{debug, error, info, instrument};

use super::to_timestamp;
use crate::types::BucketInfo;
use crate::{Error, Result, S3Storage, TRACING_TARGET_BUCKETS, TRACING_TARGET_OPERATIONS};

impl S3Storage {
    /// Lists all buckets owned by the credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket listing fails.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS)]
    pub async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        debug!(target: TRACING_TARGET_OPERATIONS, "Listing buckets");

        let start = std::time::Instant::now();
        let result = self.as_inner().list_buckets().send().await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                let buckets: Vec<BucketInfo> = response
                    .buckets()
                    .iter()
                    .filter_map(|bucket| {
                        let info = BucketInfo::new(bucket.name()?);
                        Some(match bucket.creation_date().and_then(to_timestamp) {
                            Some(created_at) => info.with_created_at(created_at),
                            None => info,
                        })
                    })
                    .collect();

                info!(
                    target: TRACING_TARGET_BUCKETS,
                    count = buckets.len(),
                    elapsed = ?elapsed,
                    "Buckets listed successfully"
                );
                Ok(buckets)
            }
            Err(e) => {
                let e = Error::from_sdk(e, "buckets");
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to list buckets"
                );
                Err(e)
            }
        }
    }

    /// Creates a new bucket in the configured region.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketAlreadyExists`] if the name is taken, or
    /// another error if the creation fails.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket_name))]
    pub async fn create_bucket(&self, bucket_name: &str) -> Result<BucketInfo> {
        debug!(
            target: TRACING_TARGET_OPERATIONS,
            bucket = %bucket_name,
            region = %self.config().region,
            "Creating bucket"
        );

        let mut request = self.as_inner().create_bucket().bucket(bucket_name);
        if self.config().needs_location_constraint() {
            let constraint = BucketLocationConstraint::from(self.config().region.as_str());
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }

        let start = std::time::Instant::now();
        let result = request.send().await;
        let elapsed = start.elapsed();

        match result {
            Ok(_response) => {
                info!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    elapsed = ?elapsed,
                    "Bucket created successfully"
                );
                Ok(BucketInfo::new(bucket_name).with_created_at(jiff::Timestamp::now()))
            }
            Err(e) => {
                let e = Error::from_sdk(e, bucket_name);
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to create bucket"
                );
                Err(e)
            }
        }
    }

    /// Deletes a bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket deletion fails or if the bucket is not empty.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket_name))]
    pub async fn delete_bucket(&self, bucket_name: &str) -> Result<()> {
        debug!(
            target: TRACING_TARGET_OPERATIONS,
            bucket = %bucket_name,
            "Deleting bucket"
        );

        let start = std::time::Instant::now();
        let result = self
            .as_inner()
            .delete_bucket()
            .bucket(bucket_name)
            .send()
            .await;
        let elapsed = start.elapsed();

        match result {
            Ok(_response) => {
                info!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    elapsed = ?elapsed,
                    "Bucket deleted successfully"
                );
                Ok(())
            }
            Err(e) => {
                let e = Error::from_sdk(e, bucket_name);
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to delete bucket"
                );
                Err(e)
            }
        }
    }
}
