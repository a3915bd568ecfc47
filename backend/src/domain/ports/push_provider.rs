//! Port for the push notification service.

use async_trait::async_trait;

use crate::domain::{DeviceToken, PushNotification};

use super::define_port_error;

define_port_error! {
    /// Errors raised by push provider adapters.
    pub enum PushProviderError {
        /// The provider refused the message for this device.
        Rejected { message: String } => "push provider rejected the message: {message}",
        /// The provider could not be reached or authenticated against.
        Transport { message: String } => "push provider request failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Deliver `notification` to a single device.
    async fn send(
        &self,
        token: &DeviceToken,
        notification: &PushNotification,
    ) -> Result<(), PushProviderError>;
}
