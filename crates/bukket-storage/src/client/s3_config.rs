//! S3 client configuration.
//!
//! Connection settings that do not depend on the credentials: endpoint,
//! region, transport security and addressing style.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// S3 connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    /// Custom endpoint host, optionally with a port (for S3-compatible services).
    ///
    /// A scheme given here overrides `use_ssl`. When absent, the SDK resolves
    /// the AWS endpoint for the region.
    pub endpoint: Option<String>,

    /// Signing region.
    pub region: String,

    /// Whether to connect over HTTPS.
    pub use_ssl: bool,

    /// Whether to address buckets as path segments instead of subdomains.
    pub force_path_style: bool,
}

impl S3Config {
    /// Creates a configuration for the given region with AWS defaults.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// Sets a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets whether HTTPS is used.
    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    /// Sets path-style addressing.
    pub fn with_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    /// Returns whether bucket creation needs an explicit location constraint.
    pub fn needs_location_constraint(&self) -> bool {
        self.region != DEFAULT_REGION
    }

    /// Returns the full endpoint URL, if a custom endpoint is configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the endpoint does not form a valid URL.
    pub fn endpoint_url(&self) -> Result<Option<Url>> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Ok(None);
        };

        let raw = if endpoint.contains("://") {
            endpoint.to_owned()
        } else {
            let scheme = if self.use_ssl { "https" } else { "http" };
            format!("{scheme}://{endpoint}")
        };

        let url = Url::parse(&raw)
            .map_err(|e| Error::Config(format!("Invalid endpoint URL '{raw}': {e}")))?;

        if url.host().is_none() {
            return Err(Error::Config(
                "Endpoint must include a valid hostname".to_string(),
            ));
        }

        Ok(Some(url))
    }

    /// Returns the endpoint for logging, or `"aws"` when the default is used.
    pub fn endpoint_display(&self) -> String {
        match self.endpoint_url() {
            Ok(Some(mut url)) => {
                let _ = url.set_username("");
                let _ = url.set_password(None);
                url.to_string()
            }
            _ => "aws".to_owned(),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(Error::Config("Region cannot be empty".to_string()));
        }

        self.endpoint_url()?;

        if !self.use_ssl && self.endpoint.is_none() {
            tracing::warn!(
                target: crate::TRACING_TARGET_CLIENT,
                "TLS is disabled but no custom endpoint is set, AWS endpoints still use HTTPS"
            );
        }

        Ok(())
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: DEFAULT_REGION.to_owned(),
            use_ssl: true,
            force_path_style: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = S3Config::default();
        assert_eq!(config.region, "us-east-1");
        assert!(config.use_ssl);
        assert!(!config.force_path_style);
        assert!(!config.needs_location_constraint());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_scheme_follows_ssl_flag() -> anyhow::Result<()> {
        let config = S3Config::default().with_endpoint("localhost:9000");
        let url = config.endpoint_url()?.map(|url| url.to_string());
        assert_eq!(url.as_deref(), Some("https://localhost:9000/"));

        let config = config.with_ssl(false);
        let url = config.endpoint_url()?.map(|url| url.to_string());
        assert_eq!(url.as_deref(), Some("http://localhost:9000/"));

        Ok(())
    }

    #[test]
    fn test_explicit_scheme_is_kept() -> anyhow::Result<()> {
        let config = S3Config::default()
            .with_endpoint("http://minio.local:9000")
            .with_ssl(true);
        let url = config.endpoint_url()?.map(|url| url.to_string());
        assert_eq!(url.as_deref(), Some("http://minio.local:9000/"));
        Ok(())
    }

    #[test]
    fn test_config_validation() {
        let config = S3Config::new("");
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = S3Config::default().with_endpoint("http://");
        assert!(config.validate().is_err());

        let config = S3Config::new("eu-west-1");
        assert!(config.needs_location_constraint());
        assert!(config.validate().is_ok());
    }
}
