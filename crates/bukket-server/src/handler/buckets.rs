//! Bucket list, bucket creation, bucket pages and bucket deletion.

use axum::Router;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use bukket_storage::CreateBucketError;

use crate::extract::{Form, Path, Query, Storage};
use crate::handler::Result;
use crate::handler::request::{BucketPageQuery, BucketPathParams, CreateBucketForm};
use crate::service::{PageCursor, ServiceState, pagination};
use crate::view::{self, url};

/// Tracing target for bucket operations.
const TRACING_TARGET: &str = "bukket_server::handler::buckets";

/// Lists all buckets.
#[tracing::instrument(skip_all)]
async fn list_buckets(storage: Storage) -> Result<Html<String>> {
    let buckets = storage.list_buckets().await?;

    tracing::debug!(
        target: TRACING_TARGET,
        bucket_count = buckets.len(),
        "listed buckets"
    );

    Ok(view::index(&buckets, None))
}

/// Creates a bucket and opens it.
///
/// Failures reported by the storage service re-render the bucket list
/// with a message.
#[tracing::instrument(skip_all, fields(bucket = %form.name()))]
async fn create_bucket(storage: Storage, Form(form): Form<CreateBucketForm>) -> Result<Response> {
    let name = form.name();
    if name.is_empty() {
        return render_index(&storage, "Please enter a name for the new bucket.").await;
    }

    tracing::info!(target: TRACING_TARGET, bucket = %name, "creating bucket");

    let error = match storage.create_bucket(name).await {
        Ok(bucket) => {
            tracing::info!(target: TRACING_TARGET, bucket = %bucket.name, "bucket created");
            return Ok(Redirect::to(&url::bucket(&bucket.name)).into_response());
        }
        Err(error) => error,
    };

    let flash = match CreateBucketError::try_from(error)? {
        CreateBucketError::AlreadyExists(bucket) => {
            tracing::info!(target: TRACING_TARGET, bucket = %bucket, "bucket already exists");
            format!("Sorry, the bucket {bucket} already exists. Try another name.")
        }
        CreateBucketError::Other(message) => {
            tracing::warn!(
                target: TRACING_TARGET,
                bucket = %name,
                error = %message,
                "bucket creation refused"
            );
            format!("Error {message}")
        }
    };

    render_index(&storage, &flash).await
}

async fn render_index(storage: &Storage, flash: &str) -> Result<Response> {
    let buckets = storage.list_buckets().await?;
    Ok(view::index(&buckets, Some(flash)).into_response())
}

/// Shows one page of a bucket's objects.
#[tracing::instrument(skip_all, fields(bucket = %params.bucket))]
async fn show_bucket(
    storage: Storage,
    Path(params): Path<BucketPathParams>,
    Query(query): Query<BucketPageQuery>,
) -> Result<Html<String>> {
    let cursor = PageCursor::from(query);
    let page = pagination::list_page(&*storage, &params.bucket, &cursor).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        bucket = %params.bucket,
        object_count = page.objects.len(),
        has_previous = page.previous_url.is_some(),
        has_next = page.next_url.is_some(),
        "listed bucket page"
    );

    Ok(view::bucket(&page))
}

/// Deletes a bucket and returns to the bucket list.
#[tracing::instrument(skip_all, fields(bucket = %params.bucket))]
async fn delete_bucket(storage: Storage, Path(params): Path<BucketPathParams>) -> Result<Redirect> {
    storage.delete_bucket(&params.bucket).await?;

    tracing::info!(target: TRACING_TARGET, bucket = %params.bucket, "bucket deleted");
    Ok(Redirect::to(url::INDEX))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/", get(list_buckets).post(create_bucket))
        .route("/buckets/{bucket}", get(show_bucket))
        .route("/buckets/{bucket}/", get(show_bucket))
        .route("/delete_bucket/{bucket}", get(delete_bucket))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use bukket_storage::MemoryStorage;

    use crate::handler::test::{
        assert_redirect, create_test_server, create_test_server_with_state,
        create_unconfigured_state,
    };

    #[tokio::test]
    async fn bucket_page_accepts_trailing_slash() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let server = create_test_server(two_buckets(), dir.path())?;

        let response = server.get("/buckets/bucket2/").await;
        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Files in bucket bucket2"));
        assert!(body.contains("key 3"));
        Ok(())
    }

    fn two_buckets() -> MemoryStorage {
        MemoryStorage::new()
            .with_bucket("bucket1", ["key 1", "key 2"])
            .with_bucket("bucket2", ["key 3", "key 4"])
    }

    #[tokio::test]
    async fn index_redirects_when_unconfigured() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let server = create_test_server_with_state(create_unconfigured_state(dir.path()))?;

        let response = server.get("/").await;
        assert_redirect(&response, "/configuration");
        assert!(!response.text().contains("Your current buckets are:"));

        let response = server.get("/buckets/bucket1").await;
        assert_redirect(&response, "/configuration");
        Ok(())
    }

    #[tokio::test]
    async fn index_lists_buckets() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let server = create_test_server(two_buckets(), dir.path())?;

        let response = server.get("/").await;
        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("bucket1"));
        assert!(body.contains("bucket2"));
        Ok(())
    }

    #[tokio::test]
    async fn bucket_page_lists_keys() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let server = create_test_server(two_buckets(), dir.path())?;

        let response = server.get("/buckets/bucket1").await;
        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("key 1"));
        assert!(body.contains("key 2"));
        assert!(!body.contains("key 3"));
        Ok(())
    }

    #[tokio::test]
    async fn create_bucket_redirects_to_it() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = two_buckets();
        let server = create_test_server(storage.clone(), dir.path())?;

        let response = server.post("/").form(&[("bucket", "bucket3")]).await;
        assert_redirect(&response, "/buckets/bucket3");
        assert!(storage.has_bucket("bucket3"));
        Ok(())
    }

    #[tokio::test]
    async fn create_existing_bucket_shows_message() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let server = create_test_server(two_buckets(), dir.path())?;

        let response = server.post("/").form(&[("bucket", "bucket1")]).await;
        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("already exists"));
        assert!(body.contains("Sorry, the bucket bucket1 already exists."));
        Ok(())
    }

    #[tokio::test]
    async fn create_bucket_shows_service_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = two_buckets();
        storage.fail_next("your error here");
        let server = create_test_server(storage, dir.path())?;

        let response = server.post("/").form(&[("bucket", "bucket3")]).await;
        response.assert_status_ok();
        assert!(response.text().contains("Error your error here"));
        Ok(())
    }

    #[tokio::test]
    async fn create_bucket_requires_name() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = two_buckets();
        let server = create_test_server(storage.clone(), dir.path())?;

        let response = server.post("/").form(&[("bucket", "   ")]).await;
        response.assert_status_ok();
        assert!(response.text().contains("Please enter a name"));
        assert!(!storage.has_bucket(""));
        Ok(())
    }

    #[tokio::test]
    async fn delete_bucket_returns_to_index() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = MemoryStorage::new().with_bucket("empty", Vec::<String>::new());
        let server = create_test_server(storage.clone(), dir.path())?;

        let response = server.get("/delete_bucket/empty").await;
        assert_redirect(&response, "/");
        assert!(!storage.has_bucket("empty"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_bucket_is_not_found() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let server = create_test_server(two_buckets(), dir.path())?;

        let response = server.get("/buckets/nope").await;
        response.assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn pages_forward_and_back() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let keys: Vec<String> = (0..20).map(|i| format!("key {i:02}")).collect();
        let server = create_test_server(MemoryStorage::new().with_bucket("big", keys), dir.path())?;

        let first = server.get("/buckets/big").await;
        let body = first.text();
        assert!(body.contains("key 00"));
        assert!(body.contains("key 14"));
        assert!(!body.contains("key 15"));
        assert!(body.contains(
            "href=\"/buckets/big?first_key=first&amp;last_key=key%2014&amp;action=next\">More"
        ));
        assert!(!body.contains(">Back<"));

        let second = server
            .get("/buckets/big")
            .add_query_param("first_key", "first")
            .add_query_param("last_key", "key 14")
            .add_query_param("action", "next")
            .await;
        let body = second.text();
        assert!(body.contains("key 15"));
        assert!(body.contains("key 19"));
        assert!(!body.contains("key 14 ("));
        assert!(body.contains("<a href=\"/buckets/big\">Back</a>"));
        assert!(!body.contains(">More<"));
        Ok(())
    }

    /// Returns the unescaped target of the link labelled `label`.
    fn link_target(body: &str, label: &str) -> Option<String> {
        let end = body.find(&format!("\">{label}</a>"))?;
        let start = body[..end].rfind("href=\"")? + "href=\"".len();
        Some(body[start..end].replace("&amp;", "&"))
    }

    #[tokio::test]
    async fn back_link_returns_to_preceding_page() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let keys: Vec<String> = (0..45).map(|i| format!("key {i:02}")).collect();
        let storage = MemoryStorage::new()
            .with_bucket("big", keys)
            .with_reversed_listings();
        let server = create_test_server(storage, dir.path())?;

        let third = server
            .get("/buckets/big")
            .add_query_param("first_key", "key 15")
            .add_query_param("last_key", "key 29")
            .add_query_param("action", "next")
            .await;
        let body = third.text();
        assert!(body.contains("key 30 ("));
        assert!(body.contains("key 44 ("));

        let back = link_target(&body, "Back").expect("third page links back");
        assert_eq!(
            back,
            "/buckets/big?first_key=key%2030&last_key=key%2044&action=previous"
        );

        let second = server.get(&back).await;
        second.assert_status_ok();
        let body = second.text();
        assert!(body.contains("key 15 ("));
        assert!(body.contains("key 29 ("));
        assert!(!body.contains("key 14 ("));
        assert!(!body.contains("key 30 ("));
        assert!(body.find("key 15 (") < body.find("key 29 ("));
        assert_eq!(
            link_target(&body, "Back").as_deref(),
            Some("/buckets/big?first_key=key%2015&last_key=key%2029&action=previous")
        );
        assert_eq!(
            link_target(&body, "More").as_deref(),
            Some("/buckets/big?first_key=key%2015&last_key=key%2029&action=next")
        );
        Ok(())
    }
}
