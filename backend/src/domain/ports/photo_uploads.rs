//! Driving port for photo uploads.

use async_trait::async_trait;

use crate::domain::{Caller, Error, PhotoRef, PhotoUpload, UploadLimits};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoUploads: Send + Sync {
    /// Limits adapters should enforce while still reading the request.
    fn limits(&self) -> UploadLimits;

    /// Store every upload under a fresh name and return the names in upload
    /// order.
    async fn store_photos(
        &self,
        caller: &Caller,
        uploads: Vec<PhotoUpload>,
    ) -> Result<Vec<PhotoRef>, Error>;
}
