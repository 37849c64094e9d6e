// Keygate — Backend Accessor
//
// Lazy singleton lifecycle for the keyring backend. The first call
// loads the state snapshot and constructs the instance; every later
// call returns the same one. `OnceCell::get_or_try_init` gives the
// single-flight guarantee: concurrent first calls share one
// construction, and a failed load caches nothing so the next call
// retries from scratch.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::keyring::Keyring;
use crate::state::{StateError, StateStore};

pub struct BackendAccessor {
    store: Arc<dyn StateStore>,
    cell: OnceCell<Arc<Keyring>>,
}

impl BackendAccessor {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            cell: OnceCell::new(),
        }
    }

    /// Get the backend instance, constructing it on first use.
    pub async fn get(&self) -> Result<Arc<Keyring>, StateError> {
        let keyring = self
            .cell
            .get_or_try_init(|| async {
                let state = self.store.load().await?;
                tracing::debug!("Keyring backend constructed from state snapshot");
                Ok::<_, StateError>(Arc::new(Keyring::new(state, Arc::clone(&self.store))))
            })
            .await?;
        Ok(Arc::clone(keyring))
    }

    /// Whether the backend has been constructed yet.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
