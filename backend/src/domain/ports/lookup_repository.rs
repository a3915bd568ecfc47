//! Port for lookup tables.

use async_trait::async_trait;

use crate::domain::{Lookups, Store, StoreId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by lookup repository adapters.
    pub enum LookupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "lookup repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "lookup repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupRepository: Send + Sync {
    /// All lookup tables at once.
    async fn load(&self) -> Result<Lookups, LookupRepositoryError>;

    async fn find_store(&self, id: StoreId) -> Result<Option<Store>, LookupRepositoryError>;
}
