//! Photo upload service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{FileStorage, PhotoUploads, StorageArea};
use crate::domain::repository_errors::map_storage_error;
use crate::domain::{Caller, Error, PhotoRef, PhotoUpload, UploadLimits};

/// Stores uploads in the photo area under generated names.
pub struct PhotoUploadService<S> {
    storage: Arc<S>,
    limits: UploadLimits,
}

impl<S> PhotoUploadService<S> {
    pub fn new(storage: Arc<S>, limits: UploadLimits) -> Self {
        Self { storage, limits }
    }
}

impl<S> PhotoUploadService<S>
where
    S: FileStorage,
{
    async fn remove_written(&self, written: &[PhotoRef]) {
        for photo in written {
            if let Err(error) = self.storage.remove(StorageArea::Photos, photo.as_str()).await {
                warn!(photo = %photo, %error, "could not remove partial upload");
            }
        }
    }
}

#[async_trait]
impl<S> PhotoUploads for PhotoUploadService<S>
where
    S: FileStorage,
{
    fn limits(&self) -> UploadLimits {
        self.limits
    }

    async fn store_photos(
        &self,
        caller: &Caller,
        uploads: Vec<PhotoUpload>,
    ) -> Result<Vec<PhotoRef>, Error> {
        self.limits.check(&uploads).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "maxFiles": self.limits.max_files,
                "maxFileBytes": self.limits.max_file_bytes,
            }))
        })?;

        let mut written = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let name = PhotoRef::generate(upload.original_name.as_deref());
            if let Err(error) = self
                .storage
                .write(StorageArea::Photos, name.as_str(), &upload.bytes)
                .await
            {
                written.push(name);
                self.remove_written(&written).await;
                return Err(map_storage_error(error));
            }
            written.push(name);
        }
        info!(user_id = %caller.id(), count = written.len(), "photos uploaded");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{FileStorageError, MockFileStorage};
    use crate::domain::test_fixtures::user;
    use rstest::rstest;
    use std::sync::Mutex;

    fn upload(name: &str, len: usize) -> PhotoUpload {
        PhotoUpload {
            original_name: Some(name.to_owned()),
            bytes: vec![7; len],
        }
    }

    fn limits() -> UploadLimits {
        UploadLimits {
            max_files: 2,
            max_file_bytes: 8,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn each_upload_gets_a_fresh_name() {
        let mut storage = MockFileStorage::new();
        storage
            .expect_write()
            .withf(|area, _, bytes| *area == StorageArea::Photos && bytes.len() == 4)
            .times(2)
            .returning(|_, _, _| Ok(()));
        let service = PhotoUploadService::new(Arc::new(storage), limits());

        let names = service
            .store_photos(
                &Caller::new(user(5)),
                vec![upload("a.JPG", 4), upload("a.JPG", 4)],
            )
            .await
            .expect("stored");

        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
        assert!(names.iter().all(|name| name.as_str().ends_with(".jpg")));
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![upload("a.jpg", 1), upload("b.jpg", 1), upload("c.jpg", 1)])]
    #[case(vec![upload("a.jpg", 9)])]
    #[tokio::test]
    async fn limits_are_enforced_before_writing(#[case] uploads: Vec<PhotoUpload>) {
        let mut storage = MockFileStorage::new();
        storage.expect_write().times(0);
        let service = PhotoUploadService::new(Arc::new(storage), limits());

        let err = service
            .store_photos(&Caller::new(user(5)), uploads)
            .await
            .expect_err("over the limits");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn a_failed_write_removes_every_attempted_file() {
        let attempted = Arc::new(Mutex::new(Vec::new()));
        let removed = Arc::new(Mutex::new(Vec::new()));
        let mut storage = MockFileStorage::new();
        let seen = Arc::clone(&attempted);
        storage.expect_write().times(2).returning(move |_, name, _| {
            let mut names = seen.lock().expect("names");
            names.push(name.to_owned());
            if names.len() == 1 {
                Ok(())
            } else {
                Err(FileStorageError::io("disk full"))
            }
        });
        let gone = Arc::clone(&removed);
        storage.expect_remove().times(2).returning(move |_, name| {
            gone.lock().expect("names").push(name.to_owned());
            Ok(())
        });
        let service = PhotoUploadService::new(Arc::new(storage), limits());

        let err = service
            .store_photos(
                &Caller::new(user(5)),
                vec![upload("a.jpg", 1), upload("b.jpg", 1)],
            )
            .await
            .expect_err("disk full");

        assert_eq!(
            *removed.lock().expect("names"),
            *attempted.lock().expect("names")
        );
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
