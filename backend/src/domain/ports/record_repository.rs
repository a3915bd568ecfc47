//! Port for persisting record rows.
//!
//! History and photos live behind their own ports; this one only sees the
//! record's own columns.

use async_trait::async_trait;

use crate::domain::{RecordFields, RecordId, StatusId, StoredRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record repository adapters.
    pub enum RecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record repository query failed: {message}",
        /// A referenced mechanic, status or store does not exist.
        Reference { message: String } => "record references a missing row: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Insert a new row and return its id.
    async fn insert(&self, fields: &RecordFields) -> Result<RecordId, RecordRepositoryError>;

    async fn find(&self, id: RecordId) -> Result<Option<StoredRecord>, RecordRepositoryError>;

    /// Every record, newest id first.
    async fn list_all(&self) -> Result<Vec<StoredRecord>, RecordRepositoryError>;

    /// Records owned by `mechanic` whose status is not `closed`, newest id
    /// first.
    async fn list_open_by_mechanic(
        &self,
        mechanic: UserId,
        closed: StatusId,
    ) -> Result<Vec<StoredRecord>, RecordRepositoryError>;

    /// Replace every column of an existing row. Returns `false` when the row
    /// is gone.
    async fn update(
        &self,
        id: RecordId,
        fields: &RecordFields,
    ) -> Result<bool, RecordRepositoryError>;

    /// Remove the row; history and photo rows go with it. Returns `false`
    /// when nothing was deleted.
    async fn delete(&self, id: RecordId) -> Result<bool, RecordRepositoryError>;
}
