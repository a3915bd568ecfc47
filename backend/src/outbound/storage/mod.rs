//! File storage adapters: local directories and background cleanup.

mod cleanup;
mod local;

pub use cleanup::TokioArtifactCleanup;
pub use local::{LocalFileStorage, StorageDirs};
