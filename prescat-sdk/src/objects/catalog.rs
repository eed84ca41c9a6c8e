use serde::{Deserialize, Serialize};

use super::Params;

/// Body of the catalog create (`POST catalog`) and update
/// (`PATCH catalog/{druid}`) requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogUpdate {
    pub druid: String,
    pub incoming_version: u64,
    pub incoming_size: u64,
    pub storage_location: String,
    /// Absent in a request body means `false`.
    #[serde(default)]
    pub checksums_validated: bool,
}

impl CatalogUpdate {
    pub fn new(
        druid: impl Into<String>,
        version: u64,
        size: u64,
        storage_location: impl Into<String>,
    ) -> Self {
        Self {
            druid: druid.into(),
            incoming_version: version,
            incoming_size: size,
            storage_location: storage_location.into(),
            checksums_validated: true,
        }
    }

    /// Whether this update registers a new object rather than a new version
    /// of an existing one.
    pub fn is_new_object(&self) -> bool {
        self.incoming_version == 1
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .with("druid", self.druid.as_str())
            .with("incoming_version", self.incoming_version)
            .with("incoming_size", self.incoming_size)
            .with("storage_location", self.storage_location.as_str())
            .with("checksums_validated", self.checksums_validated)
    }
}
