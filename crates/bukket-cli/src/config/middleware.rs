//! Middleware configuration for the HTTP server.
//!
//! The config types are re-exported from `bukket-server` and support both
//! CLI arguments and environment variables.
//!
//! ```bash
//! bukket --request-timeout 60 --max-upload-size 1073741824
//! ```

use anyhow::{Result as AnyhowResult, anyhow};
use bukket_server::middleware::{BodyLimitConfig, RecoveryConfig};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Longest accepted request timeout in seconds.
const MAX_REQUEST_TIMEOUT: u64 = 300;

/// Recovery and upload limit settings.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Upload size limit.
    #[clap(flatten)]
    pub body_limit: BodyLimitConfig,
}

impl MiddlewareConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request timeout is outside 1-300 seconds or
    /// the upload limit is zero.
    pub fn validate(&self) -> AnyhowResult<()> {
        let timeout = self.recovery.request_timeout;
        if timeout == 0 || timeout > MAX_REQUEST_TIMEOUT {
            return Err(anyhow!(
                "Request timeout {timeout} seconds is invalid. Must be between 1 and {MAX_REQUEST_TIMEOUT} seconds."
            ));
        }

        if self.body_limit.max_upload_size == 0 {
            return Err(anyhow!("Maximum upload size must be at least one byte."));
        }

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            max_upload_size = self.body_limit.max_upload_size,
            "Middleware configuration"
        );
    }
}
