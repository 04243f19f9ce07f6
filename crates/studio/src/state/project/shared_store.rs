//! Thread-safe handle for hosts that mutate the project from several threads

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{Metrics, ProjectSnapshot};

use super::ProjectStore;

/// Cloneable handle serializing all access to one `ProjectStore`.
///
/// Mutations run one at a time under the lock, so metrics are recomputed
/// before any other thread can observe the new blocks.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<ProjectStore>>,
}

impl SharedStore {
    pub fn new(store: ProjectStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProjectStore> {
        // A panicking writer never leaves blocks and metrics out of step
        // (commit runs last), so the data is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a mutation (or read) with exclusive access
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut ProjectStore) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        self.lock().snapshot()
    }

    pub fn metrics(&self) -> Metrics {
        self.lock().metrics().clone()
    }
}
