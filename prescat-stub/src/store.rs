//! In-memory catalog of preserved objects.
//!
//! Holds the same rules the real catalog enforces on the endpoints the
//! client uses, so the HTTP layer only translates [`StoreError`] into status
//! codes.

use std::collections::{BTreeMap, HashMap};

use prescat_sdk::objects::{
    CatalogUpdate, FileCategory, FileChecksum, PreservedObject, bare_druid,
};
use thiserror::Error;
use time::OffsetDateTime;

/// Errors returned by [`CatalogStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} is locked")]
    Locked(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),
}

/// Identifies one stored file of one version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
    pub category: FileCategory,
    pub filepath: String,
    pub version: u64,
}

/// A preserved object and everything the stub serves for it.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Assigned by [`CatalogStore::insert`].
    pub id: u64,
    pub druid: String,
    pub current_version: u64,
    pub size: u64,
    pub storage_location: String,
    /// Writes to a locked object are refused with 423.
    pub locked: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub files: HashMap<FileKey, Vec<u8>>,
    pub checksums: Vec<FileChecksum>,
}

impl StoredObject {
    pub fn new(
        druid: &str,
        current_version: u64,
        size: u64,
        storage_location: impl Into<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: 0,
            druid: bare_druid(druid).to_string(),
            current_version,
            size,
            storage_location: storage_location.into(),
            locked: false,
            created_at: now,
            updated_at: now,
            files: HashMap::new(),
            checksums: Vec::new(),
        }
    }

    pub fn with_file(
        mut self,
        category: FileCategory,
        filepath: impl Into<String>,
        version: u64,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        let key = FileKey {
            category,
            filepath: filepath.into(),
            version,
        };
        self.files.insert(key, contents.into());
        self
    }

    pub fn with_checksum(mut self, checksum: FileChecksum) -> Self {
        self.checksums.push(checksum);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// The record served by `GET objects/{druid}.json`.
    pub fn record(&self) -> PreservedObject {
        PreservedObject {
            id: Some(self.id),
            druid: Some(self.druid.clone()),
            current_version: self.current_version,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// Preserved objects keyed by bare druid.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    objects: BTreeMap<String, StoredObject>,
    next_id: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut object: StoredObject) -> &StoredObject {
        self.next_id += 1;
        object.id = self.next_id;
        let druid = object.druid.clone();
        self.objects.insert(druid.clone(), object);
        &self.objects[&druid]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, druid: &str) -> Result<&StoredObject, StoreError> {
        self.objects
            .get(bare_druid(druid))
            .ok_or_else(|| StoreError::NotFound(druid.to_string()))
    }

    /// Register a new object. Fails with `Conflict` if the druid is known.
    pub fn create(&mut self, update: CatalogUpdate) -> Result<&StoredObject, StoreError> {
        let druid = bare_druid(&update.druid).to_string();
        if update.incoming_version == 0 {
            return Err(StoreError::Invalid(
                "incoming_version must be at least 1".to_string(),
            ));
        }
        if self.objects.contains_key(&druid) {
            return Err(StoreError::Conflict(format!(
                "{druid} already exists in the catalog"
            )));
        }

        Ok(self.insert(StoredObject::new(
            &druid,
            update.incoming_version,
            update.incoming_size,
            update.storage_location,
        )))
    }

    /// Record a new version of a known object.
    ///
    /// The incoming version must be above the current one.
    pub fn update(
        &mut self,
        druid: &str,
        update: CatalogUpdate,
    ) -> Result<&StoredObject, StoreError> {
        if bare_druid(&update.druid) != bare_druid(druid) {
            return Err(StoreError::Invalid(format!(
                "body druid {} does not match {druid}",
                update.druid
            )));
        }
        let object = self
            .objects
            .get_mut(bare_druid(druid))
            .ok_or_else(|| StoreError::NotFound(druid.to_string()))?;
        if object.locked {
            return Err(StoreError::Locked(druid.to_string()));
        }
        if update.incoming_version <= object.current_version {
            return Err(StoreError::Conflict(format!(
                "incoming version {} is not above current version {} for {druid}",
                update.incoming_version, object.current_version
            )));
        }

        object.current_version = update.incoming_version;
        object.size = update.incoming_size;
        object.storage_location = update.storage_location;
        object.updated_at = OffsetDateTime::now_utc();
        Ok(object)
    }

    /// Contents of one file. `version` defaults to the current version.
    pub fn file(
        &self,
        druid: &str,
        category: FileCategory,
        filepath: &str,
        version: Option<u64>,
    ) -> Result<&[u8], StoreError> {
        let object = self.get(druid)?;
        let key = FileKey {
            category,
            filepath: filepath.to_string(),
            version: version.unwrap_or(object.current_version),
        };
        object
            .files
            .get(&key)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "{}/{filepath} (version {}) of {druid}",
                    category.as_str(),
                    key.version
                ))
            })
    }

    /// Checksums for each of `druids`, in request order. Any unknown druid
    /// fails the whole lookup.
    pub fn checksums<'a>(
        &'a self,
        druids: &[String],
    ) -> Result<Vec<(&'a str, &'a [FileChecksum])>, StoreError> {
        druids
            .iter()
            .map(|druid| {
                let object = self.get(druid)?;
                Ok((object.druid.as_str(), object.checksums.as_slice()))
            })
            .collect()
    }

    /// Mark a moab validation as queued.
    pub fn validate(&self, druid: &str) -> Result<(), StoreError> {
        let object = self.get(druid)?;
        if object.locked {
            return Err(StoreError::Locked(druid.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn update(druid: &str, version: u64) -> CatalogUpdate {
        CatalogUpdate::new(druid, version, 2342, "/services-disk01/sdr2objects")
    }

    fn store() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.insert(
            StoredObject::new("druid:bj102hs9687", 3, 1024, "/services-disk02/sdr2objects")
                .with_file(
                    FileCategory::Manifest,
                    "signatureCatalog.xml",
                    3,
                    "<signatureCatalog/>",
                ),
        );
        store.insert(StoredObject::new("zz999zz9999", 1, 10, "/disk03").locked(true));
        store
    }

    #[test]
    fn test_get_accepts_prefixed_and_bare_druid() {
        let store = store();
        assert_eq!(store.get("bj102hs9687").unwrap().current_version, 3);
        assert_eq!(store.get("druid:bj102hs9687").unwrap().current_version, 3);
        assert_eq!(
            store.get("xx000xx0000").unwrap_err(),
            StoreError::NotFound("xx000xx0000".to_string())
        );
    }

    #[test]
    fn test_insert_assigns_ids() {
        let store = store();
        assert_eq!(store.get("bj102hs9687").unwrap().id, 1);
        assert_eq!(store.get("zz999zz9999").unwrap().id, 2);
    }

    #[test]
    fn test_record_carries_identity_and_timestamps() {
        let store = store();
        let record = store.get("bj102hs9687").unwrap().record();
        assert_eq!(record.id, Some(1));
        assert_eq!(record.druid.as_deref(), Some("bj102hs9687"));
        assert_eq!(record.current_version, 3);
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_create_new_object() {
        let mut store = store();
        let object = store.create(update("druid:cd123ef4567", 1)).unwrap();
        assert_eq!(object.druid, "cd123ef4567");
        assert_eq!(object.current_version, 1);
        assert_eq!(object.id, 3);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_create_existing_object_conflicts() {
        let mut store = store();
        let err = store.create(update("bj102hs9687", 1)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_create_version_zero_is_invalid() {
        let mut store = store();
        assert!(matches!(
            store.create(update("cd123ef4567", 0)),
            Err(StoreError::Invalid(_))
        ));
    }

    #[test]
    fn test_update_bumps_version() {
        let mut store = store();
        let object = store.update("bj102hs9687", update("bj102hs9687", 4)).unwrap();
        assert_eq!(object.current_version, 4);
        assert_eq!(object.size, 2342);
        assert!(object.updated_at >= object.created_at);
    }

    #[test]
    fn test_update_rules() {
        let mut store = store();
        assert!(matches!(
            store.update("bj102hs9687", update("bj102hs9687", 3)),
            Err(StoreError::Conflict(_))
        ));
        assert!(matches!(
            store.update("xx000xx0000", update("xx000xx0000", 2)),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update("zz999zz9999", update("zz999zz9999", 2)),
            Err(StoreError::Locked(_))
        ));
        assert!(matches!(
            store.update("bj102hs9687", update("zz999zz9999", 5)),
            Err(StoreError::Invalid(_))
        ));
    }

    #[test]
    fn test_file_defaults_to_current_version() {
        let store = store();
        let bytes = store
            .file("bj102hs9687", FileCategory::Manifest, "signatureCatalog.xml", None)
            .unwrap();
        assert_eq!(bytes, b"<signatureCatalog/>");
        assert!(matches!(
            store.file(
                "bj102hs9687",
                FileCategory::Manifest,
                "signatureCatalog.xml",
                Some(1)
            ),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.file("bj102hs9687", FileCategory::Content, "signatureCatalog.xml", None),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_checksums_fail_on_unknown_druid() {
        let store = store();
        let found = store
            .checksums(&["druid:bj102hs9687".to_string(), "zz999zz9999".to_string()])
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "bj102hs9687");
        assert!(
            store
                .checksums(&["bj102hs9687".to_string(), "nope".to_string()])
                .is_err()
        );
    }

    #[test]
    fn test_validate_locked_object() {
        let store = store();
        assert!(store.validate("bj102hs9687").is_ok());
        assert_eq!(
            store.validate("zz999zz9999"),
            Err(StoreError::Locked("zz999zz9999".to_string()))
        );
    }
}
