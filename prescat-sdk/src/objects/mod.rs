//! Wire types for the Preservation Catalog API.

pub mod catalog;
pub mod files;
mod params;

pub use catalog::CatalogUpdate;
pub use files::{ChecksumFormat, DiffSubset, FileCategory, FileChecksum};
pub use params::Params;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Prefix some callers put in front of an object identifier.
pub const DRUID_PREFIX: &str = "druid:";

/// Filename of the signature catalog inside an object's manifest directory.
pub const SIGNATURE_CATALOG_FILENAME: &str = "signatureCatalog.xml";

/// Strip the optional `druid:` prefix from an object identifier.
pub fn bare_druid(druid: &str) -> &str {
    druid.strip_prefix(DRUID_PREFIX).unwrap_or(druid)
}

/// A preserved object record, as returned by `GET objects/{druid}.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreservedObject {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub druid: Option<String>,
    pub current_version: u64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}
