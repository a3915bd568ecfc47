//! Driving port for logging in.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Inbound adapters call this to turn credentials into a user without
/// touching persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// The matching account, or `unauthorized` for an unknown username or a
    /// wrong password.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
