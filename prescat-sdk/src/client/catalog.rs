//! API calls about the catalog.

use super::objects::druid_segment;
use super::service::{Caller, VersionedApiService};
use crate::error::ClientError;
use crate::objects::CatalogUpdate;

/// Typed calls for the `catalog` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct CatalogApi<'a> {
    service: &'a VersionedApiService,
}

impl<'a> CatalogApi<'a> {
    pub fn new(service: &'a VersionedApiService) -> Self {
        Self { service }
    }

    /// Record a new version of `druid` in the catalog.
    ///
    /// Version 1 registers a new object (`POST catalog`); any later version
    /// updates the existing record (`PATCH catalog/{druid}`).
    pub async fn update(
        &self,
        druid: &str,
        version: u64,
        size: u64,
        storage_location: &str,
    ) -> Result<(), ClientError> {
        self.submit(&CatalogUpdate::new(druid, version, size, storage_location))
            .await
    }

    /// Send a prepared [`CatalogUpdate`].
    pub async fn submit(&self, update: &CatalogUpdate) -> Result<(), ClientError> {
        let params = update.to_params();
        let caller = Caller::for_object("update", &update.druid);

        if update.is_new_object() {
            self.service.post("catalog", &params, caller).await?;
        } else {
            let path = format!("catalog/{}", druid_segment(&update.druid)?);
            self.service.patch(&path, &params, caller).await?;
        }

        tracing::debug!(
            druid = %update.druid,
            version = update.incoming_version,
            "Catalog entry recorded"
        );
        Ok(())
    }
}
