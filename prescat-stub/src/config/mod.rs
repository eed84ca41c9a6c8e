//! Configuration module for prescat-stub.
//!
//! Handles loading configuration from a TOML file and CLI overrides.

pub mod file;

use crate::config::file::FileConfig;
use crate::store::{CatalogStore, StoredObject};
use prescat_sdk::objects::bare_druid;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Everything the server needs to start.
#[derive(Debug)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub api_version: String,
    pub token: Option<String>,
    pub store: CatalogStore,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader. Without a path the defaults are used
    /// and the catalog starts empty.
    pub fn new(config_path: Option<impl AsRef<Path>>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.map(|path| path.as_ref().to_path_buf()),
            listen_override,
        }
    }

    /// Read the TOML file, apply CLI overrides, validate, and seed the store.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match &self.config_path {
            Some(path) => parse(&std::fs::read_to_string(path)?)?,
            None => FileConfig {
                server: Default::default(),
                objects: Vec::new(),
            },
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }
}

/// Parse a configuration document.
pub fn parse(content: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for object in &config.objects {
        let druid = bare_druid(&object.druid);
        if druid.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "seeded object has an empty druid".to_string(),
            ));
        }
        if object.current_version == 0 {
            return Err(ConfigError::ValidationError(format!(
                "object {druid} has current_version 0"
            )));
        }
        if !seen.insert(druid) {
            return Err(ConfigError::ValidationError(format!(
                "object {druid} is seeded twice"
            )));
        }
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let mut store = CatalogStore::new();
    for seed in file_config.objects {
        store.insert(StoredObject::from(seed));
    }

    LoadedConfig {
        listen: file_config.server.listen,
        api_version: file_config.server.api_version.trim_matches('/').to_string(),
        token: file_config
            .server
            .token
            .filter(|token| !token.trim().is_empty()),
        store,
    }
}
