//! Application state shared across all request handlers.

use crate::store::CatalogStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// The in-memory catalog.
    pub store: Arc<RwLock<CatalogStore>>,
    /// Bearer token API requests must carry, if any.
    pub token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: CatalogStore, token: Option<String>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            token: token.map(Arc::from),
        }
    }

    /// Get a read lock on the catalog.
    pub async fn store(&self) -> tokio::sync::RwLockReadGuard<'_, CatalogStore> {
        self.store.read().await
    }
}
