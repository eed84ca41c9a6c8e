//! HTTP clients for the Preservation Catalog API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod catalog;
pub mod formatter;
mod objects;
mod service;

pub use catalog::CatalogApi;
pub use formatter::{DEFAULT_BODY, ResponseSummary, classify_status};
pub use objects::ObjectsApi;
pub use service::{Caller, VersionedApiService, build_http_client, user_agent};

use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Typed client for one Preservation Catalog.
///
/// Owns the single dispatcher every endpoint API borrows. Cloning is cheap
/// and shares the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct PreservationClient {
    config: ClientConfig,
    service: VersionedApiService,
}

impl PreservationClient {
    /// Create a client for the catalog described by `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let service = VersionedApiService::new(&config)?;
        Ok(Self { config, service })
    }

    /// Create a client that sends requests through a custom
    /// `reqwest::Client` (e.g. to configure a proxy).
    pub fn with_http_client(config: ClientConfig, http: Client) -> Self {
        let service = VersionedApiService::with_http_client(http, &config);
        Self { config, service }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The dispatcher, for endpoints this crate has no typed method for.
    pub fn service(&self) -> &VersionedApiService {
        &self.service
    }

    /// API calls about preserved objects.
    pub fn objects(&self) -> ObjectsApi<'_> {
        ObjectsApi::new(&self.service)
    }

    /// API calls about the catalog.
    pub fn catalog(&self) -> CatalogApi<'_> {
        CatalogApi::new(&self.service)
    }
}

lazy_static! {
    static ref DEFAULT_CLIENT: RwLock<Option<Arc<PreservationClient>>> = RwLock::new(None);
}

/// Install a new process-wide default client built from `config`.
///
/// The previous default is replaced as a whole; callers still holding it
/// finish their calls against the old configuration.
pub fn configure(config: ClientConfig) -> Result<Arc<PreservationClient>, ClientError> {
    let client = Arc::new(PreservationClient::new(config)?);
    let mut slot = DEFAULT_CLIENT
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *slot = Some(Arc::clone(&client));
    drop(slot);

    tracing::info!(url = %client.config().url, "Configured default Preservation Catalog client");
    Ok(client)
}

/// The process-wide default client installed by [`configure`].
pub fn default_client() -> Result<Arc<PreservationClient>, ClientError> {
    DEFAULT_CLIENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or_else(|| ClientError::Configuration("url has not yet been configured".to_string()))
}
