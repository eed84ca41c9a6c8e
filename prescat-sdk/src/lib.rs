//! Async client for the Preservation Catalog REST API.
//!
//! The wire types in [`objects`], the [`config`] and the [`error`] taxonomy
//! are always available. The HTTP clients in [`client`] are gated behind the
//! `client` cargo feature (on by default).
//!
//! ```ignore
//! use prescat_sdk::{ClientConfig, PreservationClient};
//!
//! let config = ClientConfig::new("https://preservation-catalog.example.edu")?
//!     .with_api_version("v1")
//!     .with_token("my-jwt");
//! let client = PreservationClient::new(config)?;
//! let version = client.objects().current_version("druid:bj102hs9687").await?;
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod error;
pub mod objects;
pub mod parser;

#[cfg(feature = "client")]
pub use client::{PreservationClient, configure, default_client};
pub use config::ClientConfig;
pub use error::{ClientError, ErrorKind};
pub use parser::DocumentParser;

/// Version of this client, reported in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
