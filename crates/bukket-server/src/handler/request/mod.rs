//! Request types for HTTP handlers.

mod forms;
mod paths;
mod queries;

pub use forms::{ConfigurationForm, CreateBucketForm};
pub use paths::{BucketPathParams, ObjectPathParams};
pub use queries::BucketPageQuery;
