//! Links between pages.
//!
//! Bucket names are escaped as a single path segment. Object keys keep
//! their `/` separators and are matched by wildcard routes.

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::service::PageCursor;

/// Characters escaped in object keys.
const KEY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in bucket names.
const SEGMENT: &AsciiSet = &KEY.add(b'/');

/// Characters escaped in query values.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Bucket list.
pub const INDEX: &str = "/";

/// Configuration form.
pub const CONFIGURATION: &str = "/configuration";

/// Bucket logo.
pub const BUCKET_IMAGE: &str = "/bucket.png";

/// Stylesheet.
pub const STYLESHEET: &str = "/style.css";

/// First page of a bucket.
pub fn bucket(bucket: &str) -> String {
    format!("/buckets/{}", utf8_percent_encode(bucket, SEGMENT))
}

/// A bucket page selected by `cursor`.
pub fn bucket_page(bucket_name: &str, cursor: &PageCursor) -> String {
    let action = cursor.action.map(|action| action.to_string());
    let params = [
        ("first_key", cursor.first_key.as_deref()),
        ("last_key", cursor.last_key.as_deref()),
        ("action", action.as_deref()),
    ];

    let query = params
        .iter()
        .filter_map(|(name, value)| {
            value.map(|value| format!("{name}={}", utf8_percent_encode(value, QUERY)))
        })
        .collect::<Vec<_>>()
        .join("&");

    let mut url = bucket(bucket_name);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Deletes a bucket.
pub fn delete_bucket(bucket: &str) -> String {
    format!("/delete_bucket/{}", utf8_percent_encode(bucket, SEGMENT))
}

/// Upload form of a bucket.
pub fn add_file(bucket: &str) -> String {
    format!("/add_file/{}", utf8_percent_encode(bucket, SEGMENT))
}

/// Object details.
pub fn details(bucket: &str, key: &str) -> String {
    object("details", bucket, key)
}

/// Deletes an object.
pub fn delete(bucket: &str, key: &str) -> String {
    object("delete", bucket, key)
}

/// Streams an object through the server.
pub fn download(bucket: &str, key: &str) -> String {
    object("download", bucket, key)
}

fn object(route: &str, bucket: &str, key: &str) -> String {
    format!(
        "/{route}/{}/{}",
        utf8_percent_encode(bucket, SEGMENT),
        utf8_percent_encode(key, KEY)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_keys_keep_slashes() {
        assert_eq!(details("b", "dir/a b.txt"), "/details/b/dir/a%20b.txt");
        assert_eq!(delete("b", "100%?"), "/delete/b/100%25%3F");
        assert_eq!(download("b", "x#y"), "/download/b/x%23y");
    }

    #[test]
    fn bucket_names_are_one_segment() {
        assert_eq!(bucket("my bucket"), "/buckets/my%20bucket");
        assert_eq!(delete_bucket("a/b"), "/delete_bucket/a%2Fb");
        assert_eq!(add_file("photos"), "/add_file/photos");
    }

    #[test]
    fn page_query_is_escaped() {
        let cursor = PageCursor::next("first", "dir/a&b c");
        assert_eq!(
            bucket_page("b", &cursor),
            "/buckets/b?first_key=first&last_key=dir%2Fa%26b%20c&action=next"
        );
        assert_eq!(bucket_page("b", &PageCursor::default()), "/buckets/b");
    }
}
