//! S3 client with configuration and credential management.
//!
//! [`S3Storage`] wraps the AWS SDK client built from an [`S3Config`] and a
//! pair of static [`S3Credentials`]. Bucket and object operations are
//! implemented in [`crate::operations`].

mod s3_client;
mod s3_config;
mod s3_credentials;

pub use s3_client::S3Storage;
pub use s3_config::S3Config;
pub use s3_credentials::S3Credentials;
