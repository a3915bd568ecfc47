//! Port for the append-only history ledger.

use async_trait::async_trait;

use crate::domain::{HistoryEntry, HistoryId, NewHistoryEntry, RecordId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by history repository adapters.
    pub enum HistoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "history repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "history repository query failed: {message}",
        /// The record or mechanic the entry points at does not exist.
        Reference { message: String } => "history entry references a missing row: {message}",
    }
}

/// There is deliberately no update or delete operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn append(&self, entry: &NewHistoryEntry)
    -> Result<HistoryEntry, HistoryRepositoryError>;

    async fn find(&self, id: HistoryId) -> Result<Option<HistoryEntry>, HistoryRepositoryError>;

    /// Entries of all the given records, newest first (date, then id).
    async fn list_for_records(
        &self,
        records: &[RecordId],
    ) -> Result<Vec<HistoryEntry>, HistoryRepositoryError>;
}
