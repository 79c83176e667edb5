//! S3 operations for buckets and objects.
//!
//! Operations are inherent methods of [`S3Storage`](crate::S3Storage). Each
//! one is instrumented, timed and logged against the bucket or object
//! tracing target.

mod bucket_operations;
mod object_operations;

use aws_sdk_s3::primitives::DateTime;
use jiff::Timestamp;

/// Converts an SDK timestamp, dropping values jiff cannot represent.
pub(crate) fn to_timestamp(value: &DateTime) -> Option<Timestamp> {
    Timestamp::new(value.secs(), value.subsec_nanos() as i32).ok()
}

/// Converts a size reported by the service; negative values become zero.
pub(crate) fn to_size(value: Option<i64>) -> u64 {
    value.and_then(|size| u64::try_from(size).ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_sdk_timestamps() {
        let value = DateTime::from_secs_and_nanos(1_700_000_000, 500);
        let timestamp = to_timestamp(&value);
        assert_eq!(timestamp.map(|ts| ts.as_second()), Some(1_700_000_000));
        assert_eq!(timestamp.map(|ts| ts.subsec_nanosecond()), Some(500));
    }

    #[test]
    fn converts_sizes() {
        assert_eq!(to_size(Some(42)), 42);
        assert_eq!(to_size(Some(-1)), 0);
        assert_eq!(to_size(None), 0);
    }
}
