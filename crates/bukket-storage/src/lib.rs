#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging
pub const TRACING_TARGET_CLIENT: &str = "bukket_storage::client";
pub const TRACING_TARGET_OPERATIONS: &str = "bukket_storage::operations";
pub const TRACING_TARGET_BUCKETS: &str = "bukket_storage::buckets";
pub const TRACING_TARGET_OBJECTS: &str = "bukket_storage::objects";

mod backend;
mod error;
mod memory;

pub mod client;
pub mod operations;
pub mod types;

pub use crate::backend::StorageBackend;
pub use crate::client::{S3Config, S3Credentials, S3Storage};
pub use crate::error::{CreateBucketError, Error, Result};
pub use crate::memory::MemoryStorage;
pub use crate::types::{
    BucketInfo, ListObjectsRequest, ObjectData, ObjectInfo, ObjectListing, UploadObject,
};
