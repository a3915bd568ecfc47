//! Driving port for record and history reads.

use async_trait::async_trait;

use crate::domain::{Caller, Error, HistoryEntry, HistoryId, Record, RecordId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsQuery: Send + Sync {
    /// `not_found` is reported before ownership is checked.
    async fn get_record(&self, caller: &Caller, id: RecordId) -> Result<Record, Error>;

    /// Admin only.
    async fn list_records(&self, caller: &Caller) -> Result<Vec<Record>, Error>;

    /// Open records of one mechanic; closed ones are left out.
    async fn list_records_by_mechanic(
        &self,
        caller: &Caller,
        mechanic: UserId,
    ) -> Result<Vec<Record>, Error>;

    async fn get_history(&self, caller: &Caller, id: HistoryId) -> Result<HistoryEntry, Error>;

    /// Newest first.
    async fn list_history(
        &self,
        caller: &Caller,
        record: RecordId,
    ) -> Result<Vec<HistoryEntry>, Error>;
}
