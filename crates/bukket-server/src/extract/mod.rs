//! Custom request extractors.

mod reject;
mod storage;

pub use crate::extract::reject::{Form, Multipart, Path, Query};
pub use crate::extract::storage::{NotConfigured, Storage};
