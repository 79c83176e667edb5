//! Types and data structures for storage operations.

mod bucket_info;
mod object_info;
mod object_listing;

pub use bucket_info::BucketInfo;
pub use object_info::{ObjectData, ObjectInfo, UploadObject};
pub use object_listing::{ListObjectsRequest, ObjectListing};
