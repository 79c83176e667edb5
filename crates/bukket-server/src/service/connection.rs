//! Swappable storage connection.
//!
//! A [`Connection`] is immutable once built. Reconfiguring builds a new one
//! and swaps it in under a write lock; requests holding the previous
//! connection finish with it.

use std::sync::Arc;

use bukket_storage::{MemoryStorage, S3Config, S3Storage, StorageBackend};
use tokio::sync::RwLock;

use super::Credentials;
use crate::Result;

/// Tracing target for connection management.
const TRACING_TARGET: &str = "bukket_server::service::connection";

/// Builds storage backends from credentials.
pub trait StorageConnector: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &'static str;

    /// Builds a backend, or `None` if these credentials leave the server
    /// unconfigured.
    fn connect(&self, credentials: Option<&Credentials>) -> Result<Option<Arc<dyn StorageBackend>>>;
}

/// Connects to S3 with the credentials from the credential file.
#[derive(Debug, Clone)]
pub struct S3Connector {
    config: S3Config,
}

impl S3Connector {
    /// Creates a connector using the given connection settings.
    pub fn new(config: S3Config) -> Self {
        Self { config }
    }
}

impl StorageConnector for S3Connector {
    fn name(&self) -> &'static str {
        "s3"
    }

    fn connect(&self, credentials: Option<&Credentials>) -> Result<Option<Arc<dyn StorageBackend>>> {
        let Some(credentials) = credentials else {
            return Ok(None);
        };

        let config = self.config.clone().with_ssl(credentials.use_ssl);
        let storage = S3Storage::new(config, credentials.to_s3())?;
        Ok(Some(Arc::new(storage)))
    }
}

/// Serves every connection from one shared in-memory store.
///
/// Always configured, whatever the credentials.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    storage: MemoryStorage,
}

impl MemoryConnector {
    /// Creates a connector over the given store.
    pub fn new(storage: MemoryStorage) -> Self {
        Self { storage }
    }
}

impl StorageConnector for MemoryConnector {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn connect(&self, _credentials: Option<&Credentials>) -> Result<Option<Arc<dyn StorageBackend>>> {
        Ok(Some(Arc::new(self.storage.clone())))
    }
}

/// An established storage connection.
pub struct Connection {
    credentials: Option<Credentials>,
    backend: Arc<dyn StorageBackend>,
}

impl Connection {
    /// Returns the credentials this connection was built from.
    #[inline]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the storage backend.
    #[inline]
    pub fn backend(&self) -> Arc<dyn StorageBackend> {
        self.backend.clone()
    }
}

/// Shared handle to the current storage connection.
#[derive(Clone)]
pub struct StorageHandle {
    connector: Arc<dyn StorageConnector>,
    current: Arc<RwLock<Option<Arc<Connection>>>>,
}

impl StorageHandle {
    /// Creates a handle and establishes the initial connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector rejects the credentials.
    pub fn connect(
        connector: impl StorageConnector + 'static,
        credentials: Option<Credentials>,
    ) -> Result<Self> {
        let connector: Arc<dyn StorageConnector> = Arc::new(connector);
        let connection = Self::build(connector.as_ref(), credentials)?;

        Ok(Self {
            connector,
            current: Arc::new(RwLock::new(connection)),
        })
    }

    /// Creates a handle with no connection.
    pub fn unconfigured(connector: impl StorageConnector + 'static) -> Self {
        Self {
            connector: Arc::new(connector),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the current connection, if configured.
    pub async fn current(&self) -> Option<Arc<Connection>> {
        self.current.read().await.clone()
    }

    /// Returns whether a connection is established.
    pub async fn is_configured(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Replaces the connection with one built from `credentials`.
    ///
    /// The previous connection stays in place if building fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector rejects the credentials.
    pub async fn reconnect(&self, credentials: Option<Credentials>) -> Result<()> {
        let connection = Self::build(self.connector.as_ref(), credentials)?;
        let configured = connection.is_some();

        *self.current.write().await = connection;

        tracing::info!(
            target: TRACING_TARGET,
            connector = self.connector.name(),
            configured,
            "Storage connection replaced"
        );

        Ok(())
    }

    fn build(
        connector: &dyn StorageConnector,
        credentials: Option<Credentials>,
    ) -> Result<Option<Arc<Connection>>> {
        let backend = connector.connect(credentials.as_ref())?;

        tracing::debug!(
            target: TRACING_TARGET,
            connector = connector.name(),
            credentials = ?credentials,
            configured = backend.is_some(),
            "Storage connection built"
        );

        Ok(backend.map(|backend| {
            Arc::new(Connection {
                credentials,
                backend,
            })
        }))
    }
}

impl std::fmt::Debug for StorageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageHandle")
            .field("connector", &self.connector.name())
            .finish_non_exhaustive()
    }
}
