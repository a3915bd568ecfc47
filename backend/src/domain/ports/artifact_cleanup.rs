//! Port for best-effort background removal of stored files.
//!
//! Calls return immediately; failures are reported by the adapter's own log
//! and never reach the request that triggered them.

use std::time::Duration;

use super::StorageArea;

#[cfg_attr(test, mockall::automock)]
pub trait ArtifactCleanup: Send + Sync {
    /// Remove `names` from `area` as soon as possible.
    fn discard(&self, area: StorageArea, names: Vec<String>);

    /// Remove `name` from `area` once `after` has elapsed.
    fn expire(&self, area: StorageArea, name: String, after: Duration);
}
