//! S3 client implementation.

use std::sync::Arc;

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Credentials, Region};
use tracing::{error, info, instrument};

use super::{S3Config, S3Credentials};
use crate::{Result, TRACING_TARGET_CLIENT};

/// S3 storage client bound to one set of credentials.
///
/// Cloning is cheap: the SDK client and the configuration are shared.
#[derive(Clone)]
pub struct S3Storage {
    inner: Client,
    config: Arc<S3Config>,
    access_key_masked: Arc<str>,
}

impl S3Storage {
    /// Creates a new S3 client.
    ///
    /// Does not contact the service; invalid credentials surface on the
    /// first operation.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails or the credentials
    /// are incomplete.
    #[instrument(skip_all, target = TRACING_TARGET_CLIENT, fields(endpoint = %config.endpoint_display()))]
    pub fn new(config: S3Config, credentials: S3Credentials) -> Result<Self> {
        info!(target: TRACING_TARGET_CLIENT, "Initializing S3 client");

        config.validate().inspect_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Configuration validation failed");
        })?;

        if !credentials.is_complete() {
            error!(target: TRACING_TARGET_CLIENT, "Credentials are incomplete");
            return Err(crate::Error::Config(
                "Access key and secret key cannot be empty".to_string(),
            ));
        }

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(Credentials::from(&credentials))
            .force_path_style(config.force_path_style);

        if let Some(url) = config.endpoint_url()? {
            builder = builder.endpoint_url(url.as_str().trim_end_matches('/'));
        }

        let inner = Client::from_conf(builder.build());

        info!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %config.endpoint_display(),
            region = %config.region,
            secure = config.use_ssl,
            path_style = config.force_path_style,
            access_key = %credentials.access_key_masked(),
            "S3 client initialized successfully"
        );

        Ok(Self {
            inner,
            access_key_masked: credentials.access_key_masked().into(),
            config: Arc::new(config),
        })
    }

    /// Returns the client configuration.
    #[inline]
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Returns a reference to the inner SDK client.
    #[inline]
    pub(crate) fn as_inner(&self) -> &Client {
        &self.inner
    }
}

impl std::fmt::Debug for S3Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Storage")
            .field("endpoint", &self.config.endpoint_display())
            .field("region", &self.config.region)
            .field("secure", &self.config.use_ssl)
            .field("path_style", &self.config.force_path_style)
            .field("access_key", &self.access_key_masked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> S3Config {
        S3Config::default()
            .with_endpoint("localhost:9000")
            .with_ssl(false)
            .with_path_style(true)
    }

    #[test]
    fn test_client_creation() {
        let credentials = S3Credentials::new("minioadmin", "minioadmin");
        let client = S3Storage::new(create_test_config(), credentials);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_empty_credentials() {
        let credentials = S3Credentials::new("", "");
        let client = S3Storage::new(create_test_config(), credentials);
        assert!(matches!(client, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_client_debug() -> anyhow::Result<()> {
        let credentials = S3Credentials::new("AKIATEST12345", "top-secret");
        let client = S3Storage::new(create_test_config(), credentials)?;
        let debug_str = format!("{client:?}");

        assert!(debug_str.contains("S3Storage"));
        assert!(debug_str.contains("localhost:9000"));
        assert!(debug_str.contains("AKIA***"));
        assert!(!debug_str.contains("top-secret"));
        Ok(())
    }
}
