//! Users of the repair desk: the admin and the mechanics.
//!
//! Accounts are provisioned outside this service and are read-only here.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Numeric user identifier. `0` is reserved for the admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

/// Raised when a user id is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("user id must not be negative, got {0}")]
pub struct NegativeUserId(pub i32);

impl UserId {
    /// The reserved admin identity.
    pub const ADMIN: UserId = UserId(0);

    pub fn new(raw: i32) -> Result<Self, NegativeUserId> {
        if raw < 0 {
            return Err(NegativeUserId(raw));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_admin(self) -> bool {
        self == Self::ADMIN
    }
}

impl TryFrom<i32> for UserId {
    type Error = NegativeUserId;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public projection of a user account.
///
/// # Examples
/// ```
/// use repair_desk::domain::{User, UserId};
///
/// let user = User::new(UserId::ADMIN, "Office", "office");
/// assert!(user.id().is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    username: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            username: username.into(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Account row as read for authentication, including the stored secret.
#[derive(Clone)]
pub struct StoredUser {
    pub user: User,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredUser")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
