//! In-memory storage backend.
//!
//! Keeps buckets and objects in ordered maps so listings behave like S3:
//! keys are returned in ascending order, strictly after the marker.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use jiff::Timestamp;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::types::{BucketInfo, ListObjectsRequest, ObjectData, ObjectInfo, ObjectListing, UploadObject};
use crate::{Error, Result, StorageBackend, TRACING_TARGET_OPERATIONS};

/// Characters escaped in object keys of generated download links.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in bucket names of generated download links.
const SEGMENT: &AsciiSet = &PATH.add(b'/');

#[derive(Debug, Clone)]
struct StoredObject {
    info: ObjectInfo,
    body: Bytes,
}

#[derive(Debug, Default)]
struct MemoryBucket {
    created_at: Option<Timestamp>,
    objects: BTreeMap<String, StoredObject>,
}

#[derive(Debug, Default)]
struct MemoryState {
    buckets: BTreeMap<String, MemoryBucket>,
    next_failure: Option<String>,
    list_requests: Option<Vec<(String, ListObjectsRequest)>>,
    revision: u64,
    reverse_listings: bool,
    hide_truncation: bool,
}

impl MemoryState {
    fn bucket(&self, name: &str) -> Result<&MemoryBucket> {
        self.buckets
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    fn bucket_mut(&mut self, name: &str) -> Result<&mut MemoryBucket> {
        self.buckets
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    /// Fails with the armed service error, if any.
    fn take_failure(&mut self) -> Result<()> {
        match self.next_failure.take() {
            Some(message) => Err(Error::service(None, message)),
            None => Ok(()),
        }
    }

    fn store(&mut self, bucket: &str, upload: UploadObject) -> Result<ObjectInfo> {
        self.revision += 1;
        let etag = format!("\"{:08x}{:08x}\"", upload.body.len(), self.revision);

        let mut info = ObjectInfo::new(upload.key.clone(), upload.body.len() as u64)
            .with_etag(etag)
            .with_last_modified(Timestamp::now());
        info.content_type = upload.content_type;

        let object = StoredObject {
            info: info.clone(),
            body: upload.body,
        };
        self.bucket_mut(bucket)?.objects.insert(upload.key, object);
        Ok(info)
    }
}

/// Storage backend holding everything in process memory.
///
/// Clones share the same contents. Besides backing demo mode, it can record
/// list requests and be armed to fail, which makes it the fixture for handler
/// tests.
///
/// ```rust
/// use bukket_storage::MemoryStorage;
///
/// let storage = MemoryStorage::new()
///     .with_bucket("bucket1", ["key 1", "key 2"])
///     .with_bucket("bucket2", ["key 3", "key 4"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bucket holding the given keys.
    ///
    /// Each object's content is its own key, stored as `text/plain`.
    pub fn with_bucket<I, K>(self, name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        {
            let mut state = self.lock();
            let name = name.into();
            state.buckets.entry(name.clone()).or_default().created_at = Some(Timestamp::now());

            for key in keys {
                let key = key.into();
                let upload = UploadObject::new(key.clone(), Bytes::from(key.into_bytes()))
                    .with_content_type("text/plain");
                // The bucket was inserted above.
                let _ = state.store(&name, upload);
            }
        }
        self
    }

    /// Returns each listing page in descending key order.
    ///
    /// Simulates services that do not sort their listings.
    pub fn with_reversed_listings(self) -> Self {
        self.lock().reverse_listings = true;
        self
    }

    /// Never reports listings as truncated.
    ///
    /// Simulates services that omit the truncation flag.
    pub fn with_hidden_truncation(self) -> Self {
        self.lock().hide_truncation = true;
        self
    }

    /// Records every list request for [`MemoryStorage::list_requests`].
    pub fn with_request_log(self) -> Self {
        self.lock().list_requests = Some(Vec::new());
        self
    }

    /// Makes the next mutating call fail with a service error.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().next_failure = Some(message.into());
    }

    /// Returns every list request received so far, with its bucket.
    ///
    /// Empty unless the store was built [`with_request_log`].
    ///
    /// [`with_request_log`]: MemoryStorage::with_request_log
    pub fn list_requests(&self) -> Vec<(String, ListObjectsRequest)> {
        self.lock().list_requests.clone().unwrap_or_default()
    }

    /// Returns the keys stored in a bucket, in ascending order.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.lock()
            .buckets
            .get(bucket)
            .map(|bucket| bucket.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns whether a bucket exists.
    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.lock().buckets.contains_key(bucket)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let state = self.lock();
        let buckets = state
            .buckets
            .iter()
            .map(|(name, bucket)| BucketInfo {
                name: name.clone(),
                created_at: bucket.created_at,
            })
            .collect();
        Ok(buckets)
    }

    async fn create_bucket(&self, name: &str) -> Result<BucketInfo> {
        let mut state = self.lock();
        state.take_failure()?;

        if name.is_empty() {
            return Err(Error::invalid_request("Bucket name cannot be empty"));
        }
        if state.buckets.contains_key(name) {
            return Err(Error::BucketAlreadyExists(name.to_owned()));
        }

        let created_at = Timestamp::now();
        state.buckets.insert(
            name.to_owned(),
            MemoryBucket {
                created_at: Some(created_at),
                objects: BTreeMap::new(),
            },
        );

        tracing::debug!(target: TRACING_TARGET_OPERATIONS, bucket = %name, "Bucket created in memory");
        Ok(BucketInfo::new(name).with_created_at(created_at))
    }

    async fn delete_bucket(&self, name: &str) -> Result<()> {
        let mut state = self.lock();
        state.take_failure()?;

        if !state.bucket(name)?.objects.is_empty() {
            return Err(Error::service(
                Some("BucketNotEmpty"),
                "The bucket you tried to delete is not empty",
            ));
        }

        state.buckets.remove(name);
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        request: &ListObjectsRequest,
    ) -> Result<ObjectListing> {
        let mut state = self.lock();
        if let Some(log) = state.list_requests.as_mut() {
            log.push((bucket.to_owned(), request.clone()));
        }

        let objects = &state.bucket(bucket)?.objects;
        let mut remaining = objects
            .iter()
            .filter(|(key, _)| match request.marker.as_deref() {
                Some(marker) => key.as_str() > marker,
                None => true,
            })
            .map(|(_, object)| object.info.clone());

        let mut page: Vec<ObjectInfo> = remaining.by_ref().take(request.max_keys).collect();
        let is_truncated = remaining.next().is_some() && !state.hide_truncation;

        if state.reverse_listings {
            page.reverse();
        }

        Ok(ObjectListing::new(page, is_truncated))
    }

    async fn stat_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        let state = self.lock();
        state
            .bucket(bucket)?
            .objects
            .get(key)
            .map(|object| object.info.clone())
            .ok_or_else(|| Error::NotFound(key.to_owned()))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectData> {
        let state = self.lock();
        state
            .bucket(bucket)?
            .objects
            .get(key)
            .map(|object| ObjectData {
                info: object.info.clone(),
                body: object.body.clone(),
            })
            .ok_or_else(|| Error::NotFound(key.to_owned()))
    }

    async fn put_object(&self, bucket: &str, upload: UploadObject) -> Result<ObjectInfo> {
        let mut state = self.lock();
        state.take_failure()?;
        state.store(bucket, upload)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut state = self.lock();
        state.take_failure()?;
        state.bucket_mut(bucket)?.objects.remove(key);
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, _expires_in: Duration) -> Result<String> {
        Ok(format!(
            "/download/{}/{}",
            utf8_percent_encode(bucket, SEGMENT),
            utf8_percent_encode(key, PATH),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("key {i:02}")).collect()
    }

    #[tokio::test]
    async fn lists_after_marker_with_truncation() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", numbered(5))
            .with_request_log();

        let page = storage
            .list_objects("b", &ListObjectsRequest::first_page(2))
            .await?;
        let keys: Vec<_> = page.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["key 00", "key 01"]);
        assert!(page.is_truncated);

        let page = storage
            .list_objects("b", &ListObjectsRequest::after("key 02", 10))
            .await?;
        let keys: Vec<_> = page.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["key 03", "key 04"]);
        assert!(!page.is_truncated);

        assert_eq!(storage.list_requests().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn list_requests_are_not_kept_by_default() -> anyhow::Result<()> {
        let storage = MemoryStorage::new().with_bucket("b", numbered(3));

        for _ in 0..100 {
            storage
                .list_objects("b", &ListObjectsRequest::first_page(2))
                .await?;
        }

        assert!(storage.list_requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_existing_bucket_fails() -> anyhow::Result<()> {
        let storage = MemoryStorage::new().with_bucket("bucket1", ["key 1"]);
        let result = storage.create_bucket("bucket1").await;
        assert!(matches!(result, Err(Error::BucketAlreadyExists(name)) if name == "bucket1"));

        storage.create_bucket("bucket3").await?;
        assert!(storage.has_bucket("bucket3"));
        Ok(())
    }

    #[tokio::test]
    async fn fail_next_applies_once() -> anyhow::Result<()> {
        let storage = MemoryStorage::new();
        storage.fail_next("your error here");

        let result = storage.create_bucket("bucket3").await;
        assert!(matches!(result, Err(Error::Service { message, .. }) if message == "your error here"));

        storage.create_bucket("bucket3").await?;
        Ok(())
    }

    #[tokio::test]
    async fn put_get_and_delete_object() -> anyhow::Result<()> {
        let storage = MemoryStorage::new().with_bucket("b", Vec::<String>::new());

        let upload = UploadObject::new("notes.txt", Bytes::from_static(b"hello"))
            .with_content_type("text/plain");
        let info = storage.put_object("b", upload).await?;
        assert_eq!(info.size, 5);
        assert!(info.etag.is_some());

        let data = storage.get_object("b", "notes.txt").await?;
        assert_eq!(data.body, Bytes::from_static(b"hello"));
        assert_eq!(data.info.content_type.as_deref(), Some("text/plain"));

        storage.delete_object("b", "notes.txt").await?;
        let result = storage.stat_object("b", "notes.txt").await;
        assert!(matches!(result, Err(ref e) if e.is_not_found()));
        Ok(())
    }

    #[tokio::test]
    async fn delete_non_empty_bucket_fails() -> anyhow::Result<()> {
        let storage = MemoryStorage::new().with_bucket("b", ["a"]);
        let result = storage.delete_bucket("b").await;
        assert!(matches!(result, Err(ref e) if e.is_service_error()));

        storage.delete_object("b", "a").await?;
        storage.delete_bucket("b").await?;
        assert!(!storage.has_bucket("b"));
        Ok(())
    }

    #[tokio::test]
    async fn presign_links_to_download_route() -> anyhow::Result<()> {
        let storage = MemoryStorage::new();
        let url = storage
            .presign_get("b", "dir/key 1?", Duration::from_secs(60))
            .await?;
        assert_eq!(url, "/download/b/dir/key%201%3F");
        Ok(())
    }
}
