//! TOML file configuration structures.
//!
//! These structs directly map to the `prescat-stub.toml` file format.

use prescat_sdk::objects::{FileCategory, FileChecksum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::store::StoredObject;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Objects the catalog knows about at startup.
    #[serde(default)]
    pub objects: Vec<ObjectSeed>,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "127.0.0.1:3003").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Path prefix every API route is mounted under. Empty mounts them at
    /// the root.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// When set, API routes require `Authorization: Bearer {token}`.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            api_version: default_api_version(),
            token: None,
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3003))
}

fn default_api_version() -> String {
    "v1".to_string()
}

/// A preserved object to seed the catalog with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSeed {
    pub druid: String,
    pub current_version: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub storage_location: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub files: Vec<FileSeed>,
    #[serde(default)]
    pub checksums: Vec<FileChecksum>,
}

/// One file of a seeded object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSeed {
    pub category: FileCategory,
    pub filepath: String,
    /// Defaults to the object's current version.
    pub version: Option<u64>,
    pub contents: String,
}

impl From<ObjectSeed> for StoredObject {
    fn from(seed: ObjectSeed) -> Self {
        let version = seed.current_version;
        let object = StoredObject::new(
            &seed.druid,
            seed.current_version,
            seed.size,
            seed.storage_location,
        )
        .locked(seed.locked);
        let object = seed.files.into_iter().fold(object, |object, file| {
            object.with_file(
                file.category,
                file.filepath,
                file.version.unwrap_or(version),
                file.contents,
            )
        });
        seed.checksums
            .into_iter()
            .fold(object, StoredObject::with_checksum)
    }
}
