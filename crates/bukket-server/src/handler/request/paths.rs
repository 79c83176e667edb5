//! Path parameter types for HTTP handlers.

use serde::Deserialize;

/// Path parameters for bucket operations.
#[must_use]
#[derive(Debug, Deserialize)]
pub struct BucketPathParams {
    /// Name of the bucket.
    pub bucket: String,
}

/// Path parameters for object operations.
///
/// The key is captured by a wildcard and may contain `/`.
#[must_use]
#[derive(Debug, Deserialize)]
pub struct ObjectPathParams {
    /// Name of the bucket.
    pub bucket: String,
    /// Key of the object.
    pub key: String,
}
