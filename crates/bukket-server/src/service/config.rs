use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use bukket_storage::S3Config;

use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Name of the credential file inside the home directory.
    pub const CREDENTIALS_FILE_NAME: &str = ".chikken_in_a_bukket.toml";

    /// Prefix of the per-process credential file used by demo mode.
    pub const DEMO_CREDENTIALS_PREFIX: &str = "bukket-demo-credentials";

    /// Default signing region.
    pub const S3_REGION: &str = "us-east-1";

    /// Default lifetime of signed download URLs in seconds.
    pub const PRESIGN_EXPIRY_SECS: u64 = 3600;

    /// Longest lifetime S3 accepts for a signed URL (7 days).
    pub const MAX_PRESIGN_EXPIRY_SECS: u64 = 7 * 24 * 3600;
}

/// Storage implementation the server talks to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageKind {
    /// An S3 or S3-compatible service, configured through the credential file.
    #[default]
    S3,
    /// A process-local store that starts empty and needs no credentials.
    Memory,
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Path to the credential file.
    ///
    /// Defaults to `$HOME/.chikken_in_a_bukket.toml`, or to a per-process
    /// file in the temporary directory with `--storage memory`.
    #[cfg_attr(feature = "config", arg(long, env = "BUKKET_CREDENTIALS_FILE"))]
    pub credentials_file: Option<PathBuf>,

    /// Custom S3 endpoint, e.g. `localhost:9000` for a local MinIO.
    #[cfg_attr(feature = "config", arg(long, env = "S3_ENDPOINT"))]
    pub s3_endpoint: Option<String>,

    /// S3 signing region.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "S3_REGION", default_value = defaults::S3_REGION)
    )]
    pub s3_region: String,

    /// Address buckets as path segments instead of subdomains.
    #[cfg_attr(feature = "config", arg(long, env = "S3_PATH_STYLE"))]
    pub s3_path_style: bool,

    /// Lifetime of signed download URLs in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "PRESIGN_EXPIRY", default_value_t = defaults::PRESIGN_EXPIRY_SECS)
    )]
    pub presign_expiry: u64,

    /// Storage implementation to use.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "STORAGE", value_enum, default_value_t = StorageKind::S3)
    )]
    pub storage: StorageKind,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            credentials_file: None,
            s3_endpoint: None,
            s3_region: defaults::S3_REGION.to_owned(),
            s3_path_style: false,
            presign_expiry: defaults::PRESIGN_EXPIRY_SECS,
            storage: StorageKind::S3,
        }
    }
}

impl ServiceConfig {
    /// Returns the credential file location.
    ///
    /// Demo mode never touches the home directory file unless a path is
    /// given explicitly.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no path is configured and `HOME`
    /// is not set.
    pub fn credentials_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.credentials_file {
            return Ok(path.clone());
        }

        if self.storage == StorageKind::Memory {
            let name = format!(
                "{}-{}.toml",
                defaults::DEMO_CREDENTIALS_PREFIX,
                std::process::id()
            );
            return Ok(std::env::temp_dir().join(name));
        }

        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(defaults::CREDENTIALS_FILE_NAME))
            .ok_or_else(|| {
                Error::config("HOME is not set, pass --credentials-file to locate the credentials")
            })
    }

    /// Returns the S3 connection settings shared by every set of credentials.
    ///
    /// Transport security is taken from the credential file on connect.
    pub fn s3_config(&self) -> S3Config {
        let config = S3Config::new(self.s3_region.clone()).with_path_style(self.s3_path_style);
        match &self.s3_endpoint {
            Some(endpoint) => config.with_endpoint(endpoint.clone()),
            None => config,
        }
    }

    /// Returns the lifetime of signed download URLs.
    #[inline]
    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.presign_expiry == 0 || self.presign_expiry > defaults::MAX_PRESIGN_EXPIRY_SECS {
            return Err(Error::config(format!(
                "Presign expiry must be between 1 and {} seconds",
                defaults::MAX_PRESIGN_EXPIRY_SECS
            )));
        }

        if self.storage == StorageKind::S3 {
            self.s3_config()
                .validate()
                .map_err(|e| Error::config("Invalid S3 configuration").with_source(e))?;
        }

        Ok(())
    }
}
