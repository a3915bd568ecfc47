//! Driving port for printable PDF forms.

use async_trait::async_trait;

use crate::domain::{Caller, Error, FormName, RecordId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormGeneration: Send + Sync {
    /// Render the record's store-specific form and return the file name the
    /// client can download until it expires.
    async fn create_form(&self, caller: &Caller, record: RecordId) -> Result<FormName, Error>;

    /// Bytes of a previously generated form.
    async fn open_form(&self, name: &FormName) -> Result<Vec<u8>, Error>;
}
