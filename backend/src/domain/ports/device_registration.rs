//! Driving port for push device registration.

use async_trait::async_trait;

use crate::domain::{DeviceToken, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceRegistration: Send + Sync {
    async fn register_device(&self, token: &DeviceToken) -> Result<(), Error>;
}
