//! Bucket information structures.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Information about a storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    /// Bucket name.
    pub name: String,
    /// Bucket creation date, when the service reports one.
    pub created_at: Option<Timestamp>,
}

impl BucketInfo {
    /// Creates a new BucketInfo.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: None,
        }
    }

    /// Sets the creation date.
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }
}
