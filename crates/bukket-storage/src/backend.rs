//! Storage backend abstraction.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{BucketInfo, ListObjectsRequest, ObjectData, ObjectInfo, ObjectListing, UploadObject};
use crate::{Result, S3Storage};

/// Operations the web front-end needs from an object store.
///
/// Implemented by [`S3Storage`] for real services and by
/// [`MemoryStorage`](crate::MemoryStorage) for tests and demo mode.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Lists every bucket visible to the credentials.
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>>;

    /// Creates a bucket.
    async fn create_bucket(&self, name: &str) -> Result<BucketInfo>;

    /// Deletes a bucket.
    async fn delete_bucket(&self, name: &str) -> Result<()>;

    /// Lists one page of a bucket's objects.
    async fn list_objects(&self, bucket: &str, request: &ListObjectsRequest)
    -> Result<ObjectListing>;

    /// Fetches the metadata of an object.
    async fn stat_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo>;

    /// Fetches an object with its content.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectData>;

    /// Stores an object.
    async fn put_object(&self, bucket: &str, upload: UploadObject) -> Result<ObjectInfo>;

    /// Deletes an object.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Returns a URL the browser can use to download the object.
    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String>;
}

#[async_trait]
impl StorageBackend for S3Storage {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        S3Storage::list_buckets(self).await
    }

    async fn create_bucket(&self, name: &str) -> Result<BucketInfo> {
        S3Storage::create_bucket(self, name).await
    }

    async fn delete_bucket(&self, name: &str) -> Result<()> {
        S3Storage::delete_bucket(self, name).await
    }

    async fn list_objects(
        &self,
        bucket: &str,
        request: &ListObjectsRequest,
    ) -> Result<ObjectListing> {
        S3Storage::list_objects(self, bucket, request).await
    }

    async fn stat_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        S3Storage::stat_object(self, bucket, key).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectData> {
        S3Storage::get_object(self, bucket, key).await
    }

    async fn put_object(&self, bucket: &str, upload: UploadObject) -> Result<ObjectInfo> {
        S3Storage::put_object(self, bucket, upload).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        S3Storage::delete_object(self, bucket, key).await
    }

    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        S3Storage::presign_get(self, bucket, key, expires_in).await
    }
}
