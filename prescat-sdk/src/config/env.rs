//! Loading a [`ClientConfig`] from environment variables.

use std::time::Duration;

use super::ClientConfig;
use crate::error::ClientError;

pub const URL_VAR: &str = "PRESERVATION_CATALOG_URL";
pub const TOKEN_VAR: &str = "PRESERVATION_CATALOG_TOKEN";
pub const READ_TIMEOUT_VAR: &str = "PRESERVATION_CATALOG_READ_TIMEOUT_SECS";
pub const API_VERSION_VAR: &str = "PRESERVATION_CATALOG_API_VERSION";

impl ClientConfig {
    /// Build a configuration from the process environment.
    ///
    /// Only `PRESERVATION_CATALOG_URL` is required.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let url = lookup(URL_VAR).ok_or_else(|| {
            ClientError::Configuration(format!("{URL_VAR} environment variable not set"))
        })?;
        let mut config = ClientConfig::new(&url)?;

        if let Some(token) = lookup(TOKEN_VAR) {
            config = config.with_token(token);
        }
        if let Some(secs) = lookup(READ_TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Configuration(format!(
                    "{READ_TIMEOUT_VAR} must be a whole number of seconds, got '{secs}'"
                ))
            })?;
            config = config.with_read_timeout(Duration::from_secs(secs));
        }
        if let Some(api_version) = lookup(API_VERSION_VAR) {
            config = config.with_api_version(api_version);
        }

        Ok(config)
    }
}
