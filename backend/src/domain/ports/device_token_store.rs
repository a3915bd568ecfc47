//! Port for the shared set of registered push devices.

use async_trait::async_trait;

use crate::domain::DeviceToken;

use super::define_port_error;

define_port_error! {
    /// Errors raised by device token store adapters.
    pub enum DeviceTokenStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "device token store connection failed: {message}",
        /// Command failed during execution.
        Command { message: String } => "device token store command failed: {message}",
    }
}

/// Additive set: tokens are deduplicated and never expired here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceTokenStore: Send + Sync {
    async fn add(&self, token: &DeviceToken) -> Result<(), DeviceTokenStoreError>;

    async fn list(&self) -> Result<Vec<DeviceToken>, DeviceTokenStoreError>;
}
