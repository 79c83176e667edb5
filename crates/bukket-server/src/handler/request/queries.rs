use serde::Deserialize;

use crate::service::PageCursor;

/// Query parameters of a bucket page.
#[must_use]
#[derive(Debug, Default, Deserialize)]
pub struct BucketPageQuery {
    pub action: Option<String>,
    pub first_key: Option<String>,
    pub last_key: Option<String>,
}

impl From<BucketPageQuery> for PageCursor {
    fn from(query: BucketPageQuery) -> Self {
        PageCursor::from_query(query.action.as_deref(), query.first_key, query.last_key)
    }
}
