//! Redis-backed device token set.

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, RunError};
use bb8_redis::redis::{AsyncCommands, RedisError};
use tracing::warn;

use crate::domain::DeviceToken;
use crate::domain::ports::{DeviceTokenStore, DeviceTokenStoreError};

/// Redis key of the shared token set.
pub const TOKEN_SET_KEY: &str = "tokens";

#[derive(Clone)]
pub struct RedisDeviceTokenStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisDeviceTokenStore {
    pub fn new(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }

    /// Build a pool for `redis_url` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceTokenStoreError::Connection`] when the URL is invalid
    /// or the pool cannot be built.
    pub async fn connect(redis_url: &str) -> Result<Self, DeviceTokenStoreError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| DeviceTokenStoreError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| DeviceTokenStoreError::connection(err.to_string()))?;
        Ok(Self::new(pool))
    }
}

fn checkout_error(error: RunError<RedisError>) -> DeviceTokenStoreError {
    DeviceTokenStoreError::connection(error.to_string())
}

fn command_error(error: RedisError) -> DeviceTokenStoreError {
    DeviceTokenStoreError::command(error.to_string())
}

/// Keep well-formed tokens; anything else in the set is skipped with a log.
fn parse_members(members: Vec<String>) -> Vec<DeviceToken> {
    members
        .into_iter()
        .filter_map(|raw| match DeviceToken::new(raw) {
            Ok(token) => Some(token),
            Err(error) => {
                warn!(%error, "ignoring malformed device token in redis set");
                None
            }
        })
        .collect()
}

#[async_trait]
impl DeviceTokenStore for RedisDeviceTokenStore {
    async fn add(&self, token: &DeviceToken) -> Result<(), DeviceTokenStoreError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;
        let _: i64 = conn
            .sadd(TOKEN_SET_KEY, token.as_str())
            .await
            .map_err(command_error)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DeviceToken>, DeviceTokenStoreError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;
        let members: Vec<String> = conn
            .smembers(TOKEN_SET_KEY)
            .await
            .map_err(command_error)?;
        Ok(parse_members(members))
    }
}
