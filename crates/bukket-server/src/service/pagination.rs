//! Bucket listing pagination.
//!
//! S3 listings only run forward from a marker. Moving forward asks for one
//! key more than a page holds, and that extra key reveals whether another page
//! follows. Moving backward re-scans the bucket from its start and keeps the
//! last page worth of keys before the requested boundary. The scan is bounded
//! by [`MAX_SCAN_REQUESTS`]; past that it lists forward from the boundary
//! instead.

use std::collections::VecDeque;
use std::str::FromStr;

use bukket_storage::{ListObjectsRequest, ObjectInfo, StorageBackend};
use strum::{Display, EnumString};

use crate::view::url;

/// Tracing target for pagination.
const TRACING_TARGET: &str = "bukket_server::service::pagination";

/// Number of objects shown on a bucket page.
pub const PAGE_SIZE: usize = 15;

/// Requests a backward scan may issue before giving up on the boundary.
///
/// Each request asks for one page plus one key, so a scan reaches the
/// previous page of any boundary within the first 512 keys.
pub const MAX_SCAN_REQUESTS: usize = 32;

/// `first_key` value marking that the linking page was the first one.
pub const FIRST_PAGE_MARKER: &str = "first";

/// Navigation direction requested by a bucket page link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PageAction {
    /// The page after the linking page.
    Next,
    /// The page before the linking page.
    Previous,
    /// The first page.
    First,
}

/// Navigation state carried by bucket page links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Requested direction; `None` shows the first page.
    pub action: Option<PageAction>,
    /// First key shown on the linking page, or [`FIRST_PAGE_MARKER`].
    pub first_key: Option<String>,
    /// Last key shown on the linking page.
    pub last_key: Option<String>,
}

impl PageCursor {
    /// Builds a cursor from raw query values.
    ///
    /// Unknown actions are ignored.
    pub fn from_query(
        action: Option<&str>,
        first_key: Option<String>,
        last_key: Option<String>,
    ) -> Self {
        Self {
            action: action.and_then(|action| PageAction::from_str(action).ok()),
            first_key,
            last_key,
        }
    }

    /// Cursor for the page after a page holding `first_key..=last_key`.
    pub fn next(first_key: impl Into<String>, last_key: impl Into<String>) -> Self {
        Self {
            action: Some(PageAction::Next),
            first_key: Some(first_key.into()),
            last_key: Some(last_key.into()),
        }
    }

    /// Cursor for the page before a page holding `first_key..=last_key`.
    pub fn previous(first_key: impl Into<String>, last_key: impl Into<String>) -> Self {
        Self {
            action: Some(PageAction::Previous),
            first_key: Some(first_key.into()),
            last_key: Some(last_key.into()),
        }
    }

    fn plan(&self) -> Plan<'_> {
        match self.action {
            Some(PageAction::Next) => match self.last_key.as_deref() {
                Some(last_key) => Plan::Forward {
                    marker: last_key,
                    after_first_page: self
                        .first_key
                        .as_deref()
                        .is_none_or(|key| key == FIRST_PAGE_MARKER),
                },
                None => Plan::First,
            },
            Some(PageAction::Previous) => match self.first_key.as_deref() {
                Some(first_key) if first_key != FIRST_PAGE_MARKER => {
                    Plan::Backward { boundary: first_key }
                }
                _ => Plan::First,
            },
            Some(PageAction::First) | None => Plan::First,
        }
    }
}

/// How a page is fetched.
#[derive(Debug, PartialEq, Eq)]
enum Plan<'a> {
    First,
    Forward {
        marker: &'a str,
        after_first_page: bool,
    },
    Backward {
        boundary: &'a str,
    },
}

/// One page of a bucket listing with its navigation links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPage {
    /// Bucket name.
    pub bucket: String,
    /// Objects on this page, in ascending key order.
    pub objects: Vec<ObjectInfo>,
    /// Link to the previous page.
    pub previous_url: Option<String>,
    /// Link to the next page.
    pub next_url: Option<String>,
}

/// What a fetch learned about the keys around the page.
struct Fetched {
    objects: Vec<ObjectInfo>,
    has_previous: bool,
    has_next: bool,
}

/// Fetches the page of `bucket` selected by `cursor`.
///
/// A trailing `/` on the bucket name is ignored.
///
/// # Errors
///
/// Storage errors are returned unchanged.
pub async fn list_page(
    backend: &dyn StorageBackend,
    bucket: &str,
    cursor: &PageCursor,
) -> bukket_storage::Result<BucketPage> {
    let bucket = bucket.trim_end_matches('/');
    let plan = cursor.plan();
    tracing::debug!(target: TRACING_TARGET, bucket = %bucket, plan = ?plan, "Listing bucket page");

    let fetched = match plan {
        Plan::First => fetch_first(backend, bucket).await?,
        Plan::Forward { marker, .. } => fetch_forward(backend, bucket, marker).await?,
        Plan::Backward { boundary } => fetch_backward(backend, bucket, boundary).await?,
    };

    let page = build_page(bucket, &plan, fetched);

    tracing::debug!(
        target: TRACING_TARGET,
        bucket = %bucket,
        count = page.objects.len(),
        has_previous = page.previous_url.is_some(),
        has_next = page.next_url.is_some(),
        "Bucket page listed"
    );

    Ok(page)
}

async fn fetch_first(
    backend: &dyn StorageBackend,
    bucket: &str,
) -> bukket_storage::Result<Fetched> {
    let listing = backend
        .list_objects(bucket, &ListObjectsRequest::first_page(PAGE_SIZE))
        .await?;

    let mut objects = listing.objects;
    sort_by_key(&mut objects);
    let has_next = listing.is_truncated || objects.len() > PAGE_SIZE;
    objects.truncate(PAGE_SIZE);

    Ok(Fetched {
        objects,
        has_previous: false,
        has_next,
    })
}

async fn fetch_forward(
    backend: &dyn StorageBackend,
    bucket: &str,
    marker: &str,
) -> bukket_storage::Result<Fetched> {
    let listing = backend
        .list_objects(bucket, &ListObjectsRequest::after(marker, PAGE_SIZE + 1))
        .await?;

    let mut objects = listing.objects;
    sort_by_key(&mut objects);
    let has_next = listing.is_truncated || objects.len() > PAGE_SIZE;
    objects.truncate(PAGE_SIZE);

    Ok(Fetched {
        objects,
        has_previous: true,
        has_next,
    })
}

async fn fetch_backward(
    backend: &dyn StorageBackend,
    bucket: &str,
    boundary: &str,
) -> bukket_storage::Result<Fetched> {
    let mut window: VecDeque<ObjectInfo> = VecDeque::with_capacity(PAGE_SIZE + 1);
    let mut dropped = 0usize;
    let mut marker: Option<String> = None;
    let mut reached_boundary = false;
    let mut requests = 0usize;

    loop {
        if requests == MAX_SCAN_REQUESTS {
            tracing::warn!(
                target: TRACING_TARGET,
                bucket = %bucket,
                boundary = %boundary,
                requests,
                "Backward scan limit reached, listing forward from the boundary"
            );
            return fetch_forward(backend, bucket, boundary).await;
        }

        let request = ListObjectsRequest::starting_after(marker.take(), PAGE_SIZE + 1);
        let listing = backend.list_objects(bucket, &request).await?;
        requests += 1;

        let mut batch = listing.objects;
        sort_by_key(&mut batch);
        let continues = listing.is_truncated || batch.len() > PAGE_SIZE;
        let last_key = batch.last().map(|object| object.key.clone());

        for object in batch {
            if object.key.as_str() >= boundary {
                reached_boundary = true;
                break;
            }

            window.push_back(object);
            if window.len() > PAGE_SIZE {
                window.pop_front();
                dropped += 1;
            }
        }

        if reached_boundary || !continues {
            break;
        }

        match last_key {
            Some(key) => marker = Some(key),
            None => break,
        }
    }

    tracing::trace!(
        target: TRACING_TARGET,
        bucket = %bucket,
        requests,
        dropped,
        reached_boundary,
        "Backward scan finished"
    );

    Ok(Fetched {
        objects: window.into(),
        has_previous: dropped > 0,
        has_next: reached_boundary,
    })
}

fn sort_by_key(objects: &mut [ObjectInfo]) {
    objects.sort_by(|a, b| a.key.cmp(&b.key));
}

fn build_page(bucket: &str, plan: &Plan<'_>, fetched: Fetched) -> BucketPage {
    let Fetched {
        objects,
        has_previous,
        has_next,
    } = fetched;

    let bounds = objects
        .first()
        .zip(objects.last())
        .map(|(first, last)| (first.key.as_str(), last.key.as_str()));

    let previous_url = match (plan, bounds) {
        (Plan::First, _) => None,
        (Plan::Forward { after_first_page: true, .. }, _) | (Plan::Forward { .. }, None) => {
            Some(url::bucket(bucket))
        }
        (Plan::Forward { .. }, Some((first, last))) => {
            Some(url::bucket_page(bucket, &PageCursor::previous(first, last)))
        }
        (Plan::Backward { .. }, Some((first, last))) if has_previous => {
            Some(url::bucket_page(bucket, &PageCursor::previous(first, last)))
        }
        (Plan::Backward { .. }, _) => None,
    };

    let next_url = match bounds {
        Some((first, last)) if has_next => {
            let first = if has_previous { first } else { FIRST_PAGE_MARKER };
            Some(url::bucket_page(bucket, &PageCursor::next(first, last)))
        }
        _ => None,
    };

    BucketPage {
        bucket: bucket.to_owned(),
        objects,
        previous_url,
        next_url,
    }
}

#[cfg(test)]
mod tests {
    use bukket_storage::MemoryStorage;

    use super::*;

    fn keys(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("key {i:02}")).collect()
    }

    fn wide_keys(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("key {i:05}")).collect()
    }

    fn page_keys(page: &BucketPage) -> Vec<&str> {
        page.objects.iter().map(|o| o.key.as_str()).collect()
    }

    #[test]
    fn unknown_action_is_ignored() {
        let cursor = PageCursor::from_query(Some("sideways"), Some("a".into()), Some("b".into()));
        assert_eq!(cursor.action, None);
        assert_eq!(cursor.plan(), Plan::First);
    }

    #[test]
    fn previous_from_first_marker_is_first_page() {
        let cursor = PageCursor::from_query(Some("previous"), Some("first".into()), None);
        assert_eq!(cursor.plan(), Plan::First);
    }

    #[tokio::test]
    async fn first_page_has_no_previous_link() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", keys(20))
            .with_request_log();
        let page = list_page(&storage, "b", &PageCursor::default()).await?;

        assert_eq!(page.objects.len(), PAGE_SIZE);
        assert_eq!(page.previous_url, None);
        assert_eq!(
            page.next_url.as_deref(),
            Some("/buckets/b?first_key=first&last_key=key%2014&action=next")
        );

        let requests = storage.list_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1, ListObjectsRequest::first_page(PAGE_SIZE));
        Ok(())
    }

    #[tokio::test]
    async fn single_page_bucket_has_no_links() -> anyhow::Result<()> {
        let storage = MemoryStorage::new().with_bucket("b", keys(3));
        let page = list_page(&storage, "b", &PageCursor::default()).await?;

        assert_eq!(page_keys(&page), ["key 00", "key 01", "key 02"]);
        assert_eq!(page.previous_url, None);
        assert_eq!(page.next_url, None);
        Ok(())
    }

    #[tokio::test]
    async fn listing_is_sorted_whatever_the_service_order() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", ["delta", "alpha", "charlie", "bravo"])
            .with_reversed_listings();
        let page = list_page(&storage, "b", &PageCursor::default()).await?;

        assert_eq!(page_keys(&page), ["alpha", "bravo", "charlie", "delta"]);
        Ok(())
    }

    #[tokio::test]
    async fn next_page_after_first_links_back_to_bucket() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", keys(20))
            .with_request_log();
        let cursor = PageCursor::next(FIRST_PAGE_MARKER, "key 14");
        let page = list_page(&storage, "b", &cursor).await?;

        assert_eq!(page_keys(&page), ["key 15", "key 16", "key 17", "key 18", "key 19"]);
        assert_eq!(page.previous_url.as_deref(), Some("/buckets/b"));
        assert_eq!(page.next_url, None);

        let requests = storage.list_requests();
        assert_eq!(requests[0].1, ListObjectsRequest::after("key 14", PAGE_SIZE + 1));
        Ok(())
    }

    #[tokio::test]
    async fn probe_key_reveals_next_page() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", keys(40))
            .with_hidden_truncation();
        let cursor = PageCursor::next(FIRST_PAGE_MARKER, "key 04");
        let page = list_page(&storage, "b", &cursor).await?;

        assert_eq!(page.objects.len(), PAGE_SIZE);
        assert_eq!(page.objects[0].key, "key 05");
        assert_eq!(
            page.next_url.as_deref(),
            Some("/buckets/b?first_key=key%2005&last_key=key%2019&action=next")
        );
        Ok(())
    }

    #[tokio::test]
    async fn middle_page_links_both_ways() -> anyhow::Result<()> {
        let storage = MemoryStorage::new().with_bucket("b", keys(50));
        let cursor = PageCursor::next("key 15", "key 29");
        let page = list_page(&storage, "b", &cursor).await?;

        assert_eq!(page.objects[0].key, "key 30");
        assert_eq!(
            page.previous_url.as_deref(),
            Some("/buckets/b?first_key=key%2030&last_key=key%2044&action=previous")
        );
        assert_eq!(
            page.next_url.as_deref(),
            Some("/buckets/b?first_key=key%2030&last_key=key%2044&action=next")
        );
        Ok(())
    }

    #[tokio::test]
    async fn previous_shows_keys_before_boundary() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", keys(50))
            .with_request_log();
        let cursor = PageCursor::previous("key 30", "key 44");
        let page = list_page(&storage, "b", &cursor).await?;

        assert_eq!(page.objects.len(), PAGE_SIZE);
        assert_eq!(page.objects[0].key, "key 15");
        assert_eq!(page.objects[PAGE_SIZE - 1].key, "key 29");
        assert_eq!(
            page.previous_url.as_deref(),
            Some("/buckets/b?first_key=key%2015&last_key=key%2029&action=previous")
        );
        assert_eq!(
            page.next_url.as_deref(),
            Some("/buckets/b?first_key=key%2015&last_key=key%2029&action=next")
        );

        let requests = storage.list_requests();
        assert_eq!(requests.len(), 2);
        for (_, request) in requests {
            assert_eq!(request.max_keys, PAGE_SIZE + 1);
        }
        Ok(())
    }

    #[tokio::test]
    async fn previous_within_scan_limit_is_exact() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", wide_keys(1000))
            .with_request_log();
        let cursor = PageCursor::previous("key 00400", "key 00414");
        let page = list_page(&storage, "b", &cursor).await?;

        assert_eq!(page.objects.len(), PAGE_SIZE);
        assert_eq!(page.objects[0].key, "key 00385");
        assert_eq!(page.objects[PAGE_SIZE - 1].key, "key 00399");
        assert!(page.previous_url.is_some());
        assert!(page.next_url.is_some());
        assert_eq!(storage.list_requests().len(), 26);
        Ok(())
    }

    #[tokio::test]
    async fn previous_beyond_scan_limit_lists_forward() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", wide_keys(10_000))
            .with_request_log();
        let cursor = PageCursor::previous("key 09985", "key 09999");
        let page = list_page(&storage, "b", &cursor).await?;

        let requests = storage.list_requests();
        assert_eq!(requests.len(), MAX_SCAN_REQUESTS + 1);
        for (_, request) in &requests {
            assert!(request.max_keys <= PAGE_SIZE + 1);
        }
        assert_eq!(
            requests[MAX_SCAN_REQUESTS].1,
            ListObjectsRequest::after("key 09985", PAGE_SIZE + 1)
        );

        assert_eq!(page.objects[0].key, "key 09986");
        assert_eq!(page.objects.len(), 14);
        assert_eq!(page.next_url, None);
        Ok(())
    }

    #[tokio::test]
    async fn next_page_is_sorted_whatever_the_service_order() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", keys(40))
            .with_reversed_listings();
        let cursor = PageCursor::next("key 00", "key 14");
        let page = list_page(&storage, "b", &cursor).await?;

        assert_eq!(page.objects[0].key, "key 15");
        assert_eq!(page.objects[PAGE_SIZE - 1].key, "key 29");
        assert_eq!(
            page.next_url.as_deref(),
            Some("/buckets/b?first_key=key%2015&last_key=key%2029&action=next")
        );
        assert_eq!(
            page.previous_url.as_deref(),
            Some("/buckets/b?first_key=key%2015&last_key=key%2029&action=previous")
        );
        Ok(())
    }

    #[tokio::test]
    async fn previous_is_sorted_whatever_the_service_order() -> anyhow::Result<()> {
        let storage = MemoryStorage::new()
            .with_bucket("b", wide_keys(100))
            .with_reversed_listings()
            .with_request_log();
        let cursor = PageCursor::previous("key 00050", "key 00064");
        let page = list_page(&storage, "b", &cursor).await?;

        let expected: Vec<String> = (35..50).map(|i| format!("key {i:05}")).collect();
        assert_eq!(page_keys(&page), expected);

        let markers: Vec<_> = storage
            .list_requests()
            .into_iter()
            .map(|(_, request)| request.marker)
            .collect();
        assert_eq!(
            markers,
            [
                None,
                Some("key 00015".to_owned()),
                Some("key 00031".to_owned()),
                Some("key 00047".to_owned()),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn previous_to_first_page_drops_previous_link() -> anyhow::Result<()> {
        let storage = MemoryStorage::new().with_bucket("b", keys(30));
        let cursor = PageCursor::previous("key 15", "key 29");
        let page = list_page(&storage, "b", &cursor).await?;

        assert_eq!(page.objects[0].key, "key 00");
        assert_eq!(page.objects.len(), PAGE_SIZE);
        assert_eq!(page.previous_url, None);
        assert_eq!(
            page.next_url.as_deref(),
            Some("/buckets/b?first_key=first&last_key=key%2014&action=next")
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_next_page_falls_back_to_bucket() -> anyhow::Result<()> {
        let storage = MemoryStorage::new().with_bucket("b", keys(3));
        let cursor = PageCursor::next("key 00", "key 02");
        let page = list_page(&storage, "b", &cursor).await?;

        assert!(page.objects.is_empty());
        assert_eq!(page.previous_url.as_deref(), Some("/buckets/b"));
        assert_eq!(page.next_url, None);
        Ok(())
    }

    #[tokio::test]
    async fn missing_bucket_error_propagates() {
        let storage = MemoryStorage::new();
        let result = list_page(&storage, "nope", &PageCursor::default()).await;
        assert!(matches!(result, Err(ref e) if e.is_not_found()));
    }
}
