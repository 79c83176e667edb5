//! Form bodies posted by the pages.

use serde::Deserialize;

/// Form posted from the bucket list to create a bucket.
#[must_use]
#[derive(Debug, Deserialize)]
pub struct CreateBucketForm {
    /// Requested bucket name.
    pub bucket: String,
}

impl CreateBucketForm {
    /// Returns the name without surrounding whitespace.
    pub fn name(&self) -> &str {
        self.bucket.trim()
    }
}

/// Form posted from the configuration page.
#[must_use]
#[derive(Deserialize)]
pub struct ConfigurationForm {
    /// New access key id.
    pub access_key: String,
    /// New secret access key.
    pub secret_key: String,
}

impl std::fmt::Debug for ConfigurationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationForm")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}
