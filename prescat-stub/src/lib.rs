//! In-memory stand-in for the Preservation Catalog API.
//!
//! Serves the endpoints `prescat-sdk` calls, backed by a [`CatalogStore`]
//! seeded from a TOML file. Used by the SDK's integration tests and for
//! local development against a catalog that needs no database.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod server;
pub mod shutdown;
pub mod state;
pub mod store;

pub use server::{build_router, run_server, serve};
pub use state::AppState;
pub use store::{CatalogStore, StoreError, StoredObject};
