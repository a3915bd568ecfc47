//! Port for record photo associations.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{PhotoRef, RecordId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by photo repository adapters.
    pub enum PhotoRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "photo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "photo repository query failed: {message}",
        /// The record no longer exists.
        Reference { message: String } => "photo set references a missing record: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Replace the record's whole set with `photos`, keeping their order.
    ///
    /// Implementations delete and re-insert in one unit so repeating the call
    /// with the same input leaves the same set.
    async fn replace(
        &self,
        record: RecordId,
        photos: &[PhotoRef],
    ) -> Result<(), PhotoRepositoryError>;

    /// Ordered sets for the given records. Records without photos may be
    /// absent from the map.
    async fn list_for_records(
        &self,
        records: &[RecordId],
    ) -> Result<HashMap<RecordId, Vec<PhotoRef>>, PhotoRepositoryError>;
}
