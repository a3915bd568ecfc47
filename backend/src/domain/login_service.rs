//! Password login against the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::repository_errors::map_user_error;
use crate::domain::{Error, LoginCredentials, User};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`LoginService`] comparing the supplied password with the stored one.
#[derive(Clone)]
pub struct PasswordLoginService<U> {
    users: Arc<U>,
}

impl<U> PasswordLoginService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> LoginService for PasswordLoginService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            debug!(username = credentials.username(), "login for unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !credentials.password_matches(&stored.password) {
            debug!(user_id = %stored.user.id(), "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(stored.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockUserRepository, UserRepositoryError};
    use crate::domain::test_fixtures::user;
    use crate::domain::{ErrorCode, StoredUser};
    use rstest::rstest;
    use zeroize::Zeroizing;

    fn service_with(found: Option<StoredUser>) -> PasswordLoginService<MockUserRepository> {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .times(1)
            .return_once(move |_| Ok(found));
        PasswordLoginService::new(Arc::new(users))
    }

    fn nikos() -> StoredUser {
        StoredUser {
            user: User::new(user(5), "Nikos", "nikos"),
            password: Zeroizing::new("s3cret".to_owned()),
        }
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts("nikos", password).expect("valid credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn matching_password_returns_the_user() {
        let found = service_with(Some(nikos()))
            .authenticate(&credentials("s3cret"))
            .await
            .expect("authenticated");
        assert_eq!(found.id(), user(5));
        assert_eq!(found.name(), "Nikos");
    }

    #[rstest]
    #[case(Some(nikos()), "wrong")]
    #[case(None, "s3cret")]
    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same(
        #[case] found: Option<StoredUser>,
        #[case] password: &str,
    ) {
        let err = service_with(found)
            .authenticate(&credentials(password))
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_outage_is_service_unavailable() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(|_| Err(UserRepositoryError::connection("refused")));
        let err = PasswordLoginService::new(Arc::new(users))
            .authenticate(&credentials("s3cret"))
            .await
            .expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
