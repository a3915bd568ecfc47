//! Login credentials.
//!
//! Handlers build [`LoginCredentials`] from the request body before calling
//! the login port, so blank input never reaches persistence.

use zeroize::Zeroizing;

/// Login payload values that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated username and password.
///
/// The username is trimmed; the password is kept exactly as typed and wiped
/// from memory on drop.
///
/// # Examples
/// ```
/// use repair_desk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" nikos ", "s3cret").unwrap();
/// assert_eq!(creds.username(), "nikos");
/// assert!(creds.password_matches("s3cret"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Compare the supplied password against a stored secret.
    pub fn password_matches(&self, stored: &str) -> bool {
        let supplied = self.password.as_bytes();
        let stored = stored.as_bytes();
        if supplied.len() != stored.len() {
            return false;
        }
        supplied
            .iter()
            .zip(stored)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("  ", "pw", LoginValidationError::EmptyUsername)]
    #[case("maria", "", LoginValidationError::EmptyPassword)]
    fn rejects_blank_parts(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("blank input must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("s3cret", true)]
    #[case("s3cret ", false)]
    #[case("S3cret", false)]
    #[case("", false)]
    fn password_comparison_is_exact(#[case] stored: &str, #[case] expected: bool) {
        let creds = LoginCredentials::try_from_parts("maria", "s3cret").expect("valid");
        assert_eq!(creds.password_matches(stored), expected);
    }
}
