//! Driving port for lookup tables.

use async_trait::async_trait;

use crate::domain::{Error, Lookups};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupsQuery: Send + Sync {
    async fn lookups(&self) -> Result<Lookups, Error>;
}
