//! Detached removal of stored files on the Tokio runtime.
//!
//! Failures are logged under the `repair_desk::cleanup` target and never
//! reported to the caller that scheduled the removal.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::TraceId;
use crate::domain::ports::{ArtifactCleanup, FileStorage, StorageArea};

const CLEANUP_TARGET: &str = "repair_desk::cleanup";

/// [`ArtifactCleanup`] that spawns one task per request.
#[derive(Clone)]
pub struct TokioArtifactCleanup {
    storage: Arc<dyn FileStorage>,
}

impl TokioArtifactCleanup {
    pub fn new(storage: Arc<dyn FileStorage>) -> Self {
        Self { storage }
    }

    /// Spawn removal of `names` and return the task handle.
    pub fn spawn_discard(&self, area: StorageArea, names: Vec<String>) -> JoinHandle<()> {
        let storage = Arc::clone(&self.storage);
        tokio::spawn(TraceId::inherit(async move {
            for name in names {
                remove_logged(storage.as_ref(), area, &name).await;
            }
        }))
    }

    /// Spawn removal of `name` after `after` and return the task handle.
    pub fn spawn_expire(&self, area: StorageArea, name: String, after: Duration) -> JoinHandle<()> {
        let storage = Arc::clone(&self.storage);
        tokio::spawn(TraceId::inherit(async move {
            tokio::time::sleep(after).await;
            remove_logged(storage.as_ref(), area, &name).await;
        }))
    }
}

async fn remove_logged(storage: &dyn FileStorage, area: StorageArea, name: &str) {
    match storage.remove(area, name).await {
        Ok(()) => debug!(target: CLEANUP_TARGET, %area, name, "stored file removed"),
        Err(error) => warn!(
            target: CLEANUP_TARGET,
            %area,
            name,
            %error,
            "stored file could not be removed"
        ),
    }
}

impl ArtifactCleanup for TokioArtifactCleanup {
    fn discard(&self, area: StorageArea, names: Vec<String>) {
        if names.is_empty() {
            return;
        }
        drop(self.spawn_discard(area, names));
    }

    fn expire(&self, area: StorageArea, name: String, after: Duration) {
        drop(self.spawn_expire(area, name, after));
    }
}
