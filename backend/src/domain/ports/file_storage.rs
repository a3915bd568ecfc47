//! Port for named file storage (uploaded photos, generated forms).

use std::fmt;

use async_trait::async_trait;

use super::define_port_error;

/// Storage area a file lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    Photos,
    Forms,
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Photos => f.write_str("photos"),
            Self::Forms => f.write_str("forms"),
        }
    }
}

define_port_error! {
    /// Errors raised by file storage adapters.
    pub enum FileStorageError {
        /// The name would resolve outside the storage area.
        InvalidName { name: String } => "invalid stored file name: {name}",
        /// The underlying I/O call failed.
        Io { message: String } => "file storage failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Create `name` with `bytes`. Existing files are never overwritten.
    async fn write(
        &self,
        area: StorageArea,
        name: &str,
        bytes: &[u8],
    ) -> Result<(), FileStorageError>;

    /// Contents of `name`, or `None` when it does not exist.
    async fn read(&self, area: StorageArea, name: &str)
    -> Result<Option<Vec<u8>>, FileStorageError>;

    /// Delete `name`. Deleting a missing file succeeds.
    async fn remove(&self, area: StorageArea, name: &str) -> Result<(), FileStorageError>;
}
