//! Object listing request and result structures.

use serde::{Deserialize, Serialize};

use super::ObjectInfo;

/// Parameters of a single list-objects call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListObjectsRequest {
    /// Only keys strictly greater than the marker are returned.
    pub marker: Option<String>,
    /// Maximum number of keys the service may return.
    pub max_keys: usize,
}

impl ListObjectsRequest {
    /// Lists from the beginning of the bucket.
    pub fn first_page(max_keys: usize) -> Self {
        Self {
            marker: None,
            max_keys,
        }
    }

    /// Lists the keys that follow `marker`.
    pub fn after(marker: impl Into<String>, max_keys: usize) -> Self {
        Self {
            marker: Some(marker.into()),
            max_keys,
        }
    }

    /// Lists after `marker` when present, from the beginning otherwise.
    pub fn starting_after(marker: Option<String>, max_keys: usize) -> Self {
        Self { marker, max_keys }
    }
}

/// One page of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectListing {
    /// Objects in this page.
    pub objects: Vec<ObjectInfo>,
    /// Whether more keys follow this page.
    pub is_truncated: bool,
}

impl ObjectListing {
    /// Creates a new listing.
    pub fn new(objects: Vec<ObjectInfo>, is_truncated: bool) -> Self {
        Self {
            objects,
            is_truncated,
        }
    }
}
