//! Local directory storage for uploaded photos and generated forms.
//!
//! Each [`StorageArea`] maps to its own directory. Names are single path
//! components; anything that could escape the directory is refused before
//! touching the file system.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::domain::ports::{FileStorage, FileStorageError, StorageArea};

/// Directories backing each storage area.
#[derive(Debug, Clone)]
pub struct StorageDirs {
    pub photos: PathBuf,
    pub forms: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    dirs: StorageDirs,
}

impl LocalFileStorage {
    pub fn new(dirs: StorageDirs) -> Self {
        Self { dirs }
    }

    /// Create both area directories if they are missing.
    ///
    /// # Errors
    ///
    /// Returns [`FileStorageError::Io`] when a directory cannot be created.
    pub async fn ensure_dirs(&self) -> Result<(), FileStorageError> {
        for dir in [&self.dirs.photos, &self.dirs.forms] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|err| io_error(dir, &err))?;
        }
        Ok(())
    }

    pub fn dir(&self, area: StorageArea) -> &Path {
        match area {
            StorageArea::Photos => &self.dirs.photos,
            StorageArea::Forms => &self.dirs.forms,
        }
    }

    /// Absolute location of `name` inside `area`.
    ///
    /// # Errors
    ///
    /// Returns [`FileStorageError::InvalidName`] for names that are empty,
    /// hidden, or contain path separators.
    pub fn path_of(&self, area: StorageArea, name: &str) -> Result<PathBuf, FileStorageError> {
        if !is_safe_name(name) {
            return Err(FileStorageError::invalid_name(name));
        }
        Ok(self.dir(area).join(name))
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && name.len() <= 255
}

fn io_error(path: &Path, err: &std::io::Error) -> FileStorageError {
    FileStorageError::io(format!("{}: {err}", path.display()))
}

/// Write `bytes` through `sink`, removing the file at `path` if the write
/// does not complete.
async fn fill_or_discard<W>(
    path: &Path,
    mut sink: W,
    bytes: &[u8],
) -> Result<(), FileStorageError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        sink.write_all(bytes).await?;
        sink.flush().await
    }
    .await;
    let Err(err) = written else {
        return Ok(());
    };
    drop(sink);
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(remove_err) if remove_err.kind() == ErrorKind::NotFound => {}
        Err(remove_err) => {
            warn!(path = %path.display(), error = %remove_err, "could not remove partial file");
        }
    }
    Err(io_error(path, &err))
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn write(
        &self,
        area: StorageArea,
        name: &str,
        bytes: &[u8],
    ) -> Result<(), FileStorageError> {
        let path = self.path_of(area, name)?;
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|err| io_error(&path, &err))?;
        fill_or_discard(&path, file, bytes).await
    }

    async fn read(
        &self,
        area: StorageArea,
        name: &str,
    ) -> Result<Option<Vec<u8>>, FileStorageError> {
        let path = self.path_of(area, name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path, &err)),
        }
    }

    async fn remove(&self, area: StorageArea, name: &str) -> Result<(), FileStorageError> {
        let path = self.path_of(area, name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(&path, &err)),
        }
    }
}
