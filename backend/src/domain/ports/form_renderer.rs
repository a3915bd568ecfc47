//! Port for the external PDF form renderer.

use async_trait::async_trait;

use crate::domain::StoreId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by form renderer adapters.
    pub enum FormRendererError {
        /// The renderer could not be started.
        Spawn { message: String } => "form renderer could not start: {message}",
        /// The renderer exited unsuccessfully.
        Failed { message: String } => "form renderer failed: {message}",
        /// The renderer ran past its time budget and was killed.
        Timeout { seconds: u64 } => "form renderer exceeded {seconds}s",
    }
}

/// One rendering: fill the store's base layout with the field document
/// `filled` and write the PDF as `output`. Both names live in the forms
/// storage area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub store: StoreId,
    pub filled: String,
    pub output: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRenderer: Send + Sync {
    async fn render(&self, job: &RenderJob) -> Result<(), FormRendererError>;
}
