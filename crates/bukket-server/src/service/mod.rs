//! Application state and dependency injection.

mod config;
mod connection;
mod credentials;
pub mod pagination;

use std::time::Duration;

use bukket_storage::MemoryStorage;

pub use crate::service::config::{ServiceConfig, StorageKind};
pub use crate::service::connection::{
    Connection, MemoryConnector, S3Connector, StorageConnector, StorageHandle,
};
pub use crate::service::credentials::{Credentials, CredentialsFile};
pub use crate::service::pagination::{BucketPage, PageAction, PageCursor};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Tracing target for state initialization.
const TRACING_TARGET: &str = "bukket_server::service";

/// Lifetime of the signed download URLs shown on object pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresignPolicy {
    /// How long a signed URL stays valid.
    pub expires_in: Duration,
}

impl PresignPolicy {
    /// Creates a policy with the given lifetime.
    pub fn new(expires_in: Duration) -> Self {
        Self { expires_in }
    }
}

impl Default for PresignPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub storage: StorageHandle,
    pub credentials_file: CredentialsFile,
    pub presign: PresignPolicy,
}

impl ServiceState {
    /// Creates state from its parts.
    pub fn new(
        storage: StorageHandle,
        credentials_file: CredentialsFile,
        presign: PresignPolicy,
    ) -> Self {
        Self {
            storage,
            credentials_file,
            presign,
        }
    }

    /// Initializes application state from configuration.
    ///
    /// Reads the credential file and connects to storage. A missing or
    /// unreadable credential file leaves the server unconfigured.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let credentials_file = CredentialsFile::new(config.credentials_path()?);
        let credentials = match credentials_file.load().await {
            Ok(credentials) => credentials,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    path = %credentials_file.path().display(),
                    error = %error,
                    "Ignoring unusable credential file"
                );
                None
            }
        };

        let storage = match config.storage {
            StorageKind::S3 => {
                StorageHandle::connect(S3Connector::new(config.s3_config()), credentials)?
            }
            StorageKind::Memory => {
                StorageHandle::connect(MemoryConnector::new(MemoryStorage::new()), credentials)?
            }
        };

        tracing::info!(
            target: TRACING_TARGET,
            storage = %config.storage,
            credentials_file = %credentials_file.path().display(),
            configured = storage.is_configured().await,
            "Service state initialized"
        );

        Ok(Self::new(
            storage,
            credentials_file,
            PresignPolicy::new(config.presign_expiry()),
        ))
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(storage: StorageHandle);
impl_di!(credentials_file: CredentialsFile);
impl_di!(presign: PresignPolicy);

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_config_without_credential_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = ServiceConfig {
            credentials_file: Some(dir.path().join("creds.toml")),
            ..ServiceConfig::default()
        };

        let state = ServiceState::from_config(&config).await?;
        assert!(!state.storage.is_configured().await);
        assert_eq!(state.presign.expires_in, Duration::from_secs(3600));
        Ok(())
    }

    #[tokio::test]
    async fn from_config_with_credential_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("creds.toml");
        CredentialsFile::new(&path)
            .save(&Credentials::new("access", "secret"))
            .await?;

        let config = ServiceConfig {
            credentials_file: Some(path),
            ..ServiceConfig::default()
        };

        let state = ServiceState::from_config(&config).await?;
        assert!(state.storage.is_configured().await);
        Ok(())
    }

    #[tokio::test]
    async fn memory_storage_is_configured() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = ServiceConfig {
            credentials_file: Some(dir.path().join("creds.toml")),
            storage: StorageKind::Memory,
            ..ServiceConfig::default()
        };

        let state = ServiceState::from_config(&config).await?;
        assert!(state.storage.is_configured().await);
        Ok(())
    }
}
