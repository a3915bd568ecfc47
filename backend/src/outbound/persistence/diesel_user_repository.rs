//! PostgreSQL-backed user lookups for login.
//!
//! The password column is copied straight into a [`Zeroizing`] buffer and
//! never leaves this adapter in any other form.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use zeroize::Zeroizing;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{StoredUser, User, UserId};

use super::diesel_helpers::{ErrorKinds, map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, |message| UserRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_diesel_error(
        error,
        &ErrorKinds {
            query: |message| UserRepositoryError::query(message),
            connection: |message| UserRepositoryError::connection(message),
            reference: None,
        },
    )
}

fn row_to_user(row: UserRow) -> Result<StoredUser, UserRepositoryError> {
    let UserRow {
        id,
        name,
        username,
        password,
    } = row;
    let id = UserId::new(id).map_err(|err| UserRepositoryError::query(err.to_string()))?;
    Ok(StoredUser {
        user: User::new(id, name, username),
        password: Zeroizing::new(password),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_user).transpose()
    }
}
