//! Connection configuration for the Preservation Catalog clients.
//!
//! A [`ClientConfig`] is an immutable value: build it once, hand it to
//! [`PreservationClient::new`](crate::client::PreservationClient::new) and
//! build a fresh one to reconfigure. Nothing mutates a live configuration.

mod env;

pub use env::{API_VERSION_VAR, READ_TIMEOUT_VAR, TOKEN_VAR, URL_VAR};

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::ClientError;

/// API version segment used when none is configured explicitly.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Connection settings for one Preservation Catalog.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the catalog, always ending in `/`.
    pub url: Url,
    /// Bearer token sent in the `Authorization` header.
    pub token: Option<String>,
    /// Per-read timeout for the underlying HTTP connection.
    pub read_timeout: Option<Duration>,
    /// Path segment inserted between `url` and every resource path.
    /// Empty means no segment.
    pub api_version: String,
}

impl ClientConfig {
    /// Create a configuration for the catalog at `url`.
    ///
    /// The URL must be a non-empty absolute `http` or `https` URL. A missing
    /// trailing slash is added so relative resource paths are appended to the
    /// URL's path instead of replacing its last segment.
    pub fn new(url: &str) -> Result<Self, ClientError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ClientError::Configuration(
                "url has not yet been configured".to_string(),
            ));
        }

        let mut url = Url::parse(url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "unsupported url scheme '{}', expected http or https",
                url.scheme()
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self {
            url,
            token: None,
            read_timeout: None,
            api_version: DEFAULT_API_VERSION.to_string(),
        })
    }

    /// Send `token` as a bearer token. A blank token disables authentication.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.trim().is_empty()).then_some(token);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Use `api_version` as the path prefix. Surrounding slashes are dropped;
    /// an empty string disables prefixing.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into().trim().trim_matches('/').to_string();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("read_timeout", &self.read_timeout)
            .field("api_version", &self.api_version)
            .finish()
    }
}
