//! Object metadata, content and upload structures.

use bytes::Bytes;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Metadata of a stored object.
///
/// Listings fill in `key`, `size`, `etag` and `last_modified`;
/// `content_type` is only known after a stat or get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object key, unique within its bucket.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Entity tag (content hash) as reported by the service.
    pub etag: Option<String>,
    /// Last modification time.
    pub last_modified: Option<Timestamp>,
    /// MIME type of the content.
    pub content_type: Option<String>,
}

impl ObjectInfo {
    /// Creates a new ObjectInfo with the given key and size.
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            etag: None,
            last_modified: None,
            content_type: None,
        }
    }

    /// Sets the entity tag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Sets the last modification time.
    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// An object's metadata together with its full content.
#[derive(Debug, Clone)]
pub struct ObjectData {
    /// Object metadata.
    pub info: ObjectInfo,
    /// Object content.
    pub body: Bytes,
}

/// A file to be stored in a bucket.
#[derive(Debug, Clone)]
pub struct UploadObject {
    /// Destination key.
    pub key: String,
    /// File content.
    pub body: Bytes,
    /// MIME type reported by the uploader.
    pub content_type: Option<String>,
}

impl UploadObject {
    /// Creates a new upload for the given key and content.
    pub fn new(key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            body: body.into(),
            content_type: None,
        }
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the file name used for the `Content-Disposition` header.
    ///
    /// Only the last path segment of the key is used.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}
