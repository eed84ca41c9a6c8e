use serde::{Deserialize, Serialize};

/// Category of file stored in a moab version directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Content,
    Manifest,
    Metadata,
}

impl FileCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::Content => "content",
            FileCategory::Manifest => "manifest",
            FileCategory::Metadata => "metadata",
        }
    }
}

/// Response format of the bulk checksums endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumFormat {
    #[default]
    Csv,
    Json,
}

impl ChecksumFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ChecksumFormat::Csv => "csv",
            ChecksumFormat::Json => "json",
        }
    }
}

/// Which subset of files a content inventory difference is computed for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffSubset {
    #[default]
    All,
    Shelve,
    Preserve,
    Publish,
}

impl DiffSubset {
    pub fn as_str(self) -> &'static str {
        match self {
            DiffSubset::All => "all",
            DiffSubset::Shelve => "shelve",
            DiffSubset::Preserve => "preserve",
            DiffSubset::Publish => "publish",
        }
    }
}

/// Fixity information for one content file of the latest version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChecksum {
    pub filename: String,
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
    pub filesize: u64,
}
