//! Driving port for record writes.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Record, RecordDraft, RecordId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsCommand: Send + Sync {
    /// Insert a record with its photo set and seed history, announce it to
    /// registered devices and return it hydrated.
    async fn create_record(&self, caller: &Caller, draft: RecordDraft) -> Result<Record, Error>;

    /// Replace the record's fields and photo set, append any new history and
    /// return the re-read record. Photos that dropped out of the set are
    /// handed to background cleanup.
    async fn edit_record(
        &self,
        caller: &Caller,
        id: RecordId,
        draft: RecordDraft,
    ) -> Result<Record, Error>;

    /// Admin only. Removes the record and, afterwards, its photo files.
    async fn delete_record(&self, caller: &Caller, id: RecordId) -> Result<(), Error>;
}
