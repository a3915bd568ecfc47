//! Record store and history ledger services.
//!
//! Composite writes (record row, history, photo set) are sequenced here
//! without a surrounding transaction. A failing step surfaces its error and
//! leaves the earlier steps in place.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    ArtifactCleanup, HistoryRepository, PhotoRepository, RecordAnnouncer, RecordRepository,
    RecordsCommand, RecordsQuery, StorageArea,
};
use crate::domain::repository_errors::{map_history_error, map_photo_error, map_record_error};
use crate::domain::{
    Caller, Error, HistoryDraft, HistoryEntry, HistoryId, NewHistoryEntry, PhotoRef, Record,
    RecordDraft, RecordId, RecordValidationError, StatusId, StoredRecord, UserId, orphaned,
    sort_newest_first,
};

/// Status code of records that are finished and handed back.
pub const CLOSED_STATUS: StatusId = StatusId(5);

fn validation_error(error: RecordValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "invalid_record",
    }))
}

fn not_found(id: RecordId) -> Error {
    Error::not_found(format!("record {id} not found"))
}

/// Record service implementing [`RecordsCommand`] and [`RecordsQuery`].
pub struct RecordService<R, H, P> {
    records: Arc<R>,
    history: Arc<H>,
    photos: Arc<P>,
    announcer: Arc<dyn RecordAnnouncer>,
    cleanup: Arc<dyn ArtifactCleanup>,
    clock: Arc<dyn Clock>,
    closed_status: StatusId,
}

impl<R, H, P> RecordService<R, H, P> {
    pub fn new(
        records: Arc<R>,
        history: Arc<H>,
        photos: Arc<P>,
        announcer: Arc<dyn RecordAnnouncer>,
        cleanup: Arc<dyn ArtifactCleanup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            records,
            history,
            photos,
            announcer,
            cleanup,
            clock,
            closed_status: CLOSED_STATUS,
        }
    }

    #[must_use]
    pub fn with_closed_status(mut self, closed_status: StatusId) -> Self {
        self.closed_status = closed_status;
        self
    }
}

impl<R, H, P> RecordService<R, H, P>
where
    R: RecordRepository,
    H: HistoryRepository,
    P: PhotoRepository,
{
    async fn find_stored(&self, id: RecordId) -> Result<StoredRecord, Error> {
        self.records
            .find(id)
            .await
            .map_err(map_record_error)?
            .ok_or_else(|| not_found(id))
    }

    /// Attach history and photos to each record with one query per table.
    async fn hydrate(&self, stored: Vec<StoredRecord>) -> Result<Vec<Record>, Error> {
        if stored.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<RecordId> = stored.iter().map(|record| record.id).collect();

        let mut history: HashMap<RecordId, Vec<HistoryEntry>> = HashMap::new();
        for entry in self
            .history
            .list_for_records(&ids)
            .await
            .map_err(map_history_error)?
        {
            history.entry(entry.record_id).or_default().push(entry);
        }
        let mut photos = self
            .photos
            .list_for_records(&ids)
            .await
            .map_err(map_photo_error)?;

        Ok(stored
            .into_iter()
            .map(|StoredRecord { id, fields }| {
                let mut entries = history.remove(&id).unwrap_or_default();
                sort_newest_first(&mut entries);
                Record {
                    id,
                    fields,
                    photos: photos.remove(&id).unwrap_or_default(),
                    history: entries,
                }
            })
            .collect())
    }

    async fn hydrate_one(&self, stored: StoredRecord) -> Result<Record, Error> {
        let id = stored.id;
        self.hydrate(vec![stored])
            .await?
            .pop()
            .ok_or_else(|| not_found(id))
    }

    async fn current_photos(&self, id: RecordId) -> Result<Vec<PhotoRef>, Error> {
        Ok(self
            .photos
            .list_for_records(&[id])
            .await
            .map_err(map_photo_error)?
            .remove(&id)
            .unwrap_or_default())
    }

    async fn append_history(
        &self,
        caller: &Caller,
        id: RecordId,
        drafts: Vec<HistoryDraft>,
    ) -> Result<(), Error> {
        let now = self.clock.utc();
        for draft in drafts {
            let entry = NewHistoryEntry::from_draft(draft, id, caller.id(), now);
            let appended = self
                .history
                .append(&entry)
                .await
                .map_err(map_history_error)?;
            debug!(record_id = %id, history_id = %appended.id, "history appended");
        }
        Ok(())
    }

    fn discard_photos(&self, id: RecordId, photos: Vec<PhotoRef>) {
        if photos.is_empty() {
            return;
        }
        debug!(record_id = %id, count = photos.len(), "discarding photo files");
        self.cleanup.discard(
            StorageArea::Photos,
            photos.into_iter().map(String::from).collect(),
        );
    }
}

#[async_trait]
impl<R, H, P> RecordsCommand for RecordService<R, H, P>
where
    R: RecordRepository,
    H: HistoryRepository,
    P: PhotoRepository,
{
    async fn create_record(&self, caller: &Caller, draft: RecordDraft) -> Result<Record, Error> {
        draft.validate().map_err(validation_error)?;
        let RecordDraft {
            mut fields,
            photos,
            new_history,
        } = draft;
        fields.mechanic = caller.effective_mechanic(fields.mechanic);

        let id = self
            .records
            .insert(&fields)
            .await
            .map_err(map_record_error)?;
        if !photos.is_empty() {
            self.photos
                .replace(id, &photos)
                .await
                .map_err(map_photo_error)?;
        }
        self.append_history(caller, id, new_history).await?;

        info!(record_id = %id, mechanic = %fields.mechanic, "record created");
        self.announcer.announce_new_record(id);

        let stored = self.find_stored(id).await?;
        self.hydrate_one(stored).await
    }

    async fn edit_record(
        &self,
        caller: &Caller,
        id: RecordId,
        draft: RecordDraft,
    ) -> Result<Record, Error> {
        draft.validate().map_err(validation_error)?;
        let existing = self.find_stored(id).await?;
        caller.require_owner(existing.fields.mechanic)?;

        let RecordDraft {
            mut fields,
            photos,
            new_history,
        } = draft;
        fields.mechanic = caller.effective_mechanic(fields.mechanic);
        let previous_photos = self.current_photos(id).await?;

        if !self
            .records
            .update(id, &fields)
            .await
            .map_err(map_record_error)?
        {
            return Err(not_found(id));
        }
        self.append_history(caller, id, new_history).await?;
        self.photos
            .replace(id, &photos)
            .await
            .map_err(map_photo_error)?;

        let stored = self.find_stored(id).await?;
        let record = self.hydrate_one(stored).await?;
        info!(record_id = %id, "record edited");

        self.discard_photos(id, orphaned(&previous_photos, &record.photos));
        Ok(record)
    }

    async fn delete_record(&self, caller: &Caller, id: RecordId) -> Result<(), Error> {
        caller.require_admin()?;
        let photos = self.current_photos(id).await?;
        if !self.records.delete(id).await.map_err(map_record_error)? {
            return Err(not_found(id));
        }
        info!(record_id = %id, "record deleted");
        self.discard_photos(id, photos);
        Ok(())
    }
}

#[async_trait]
impl<R, H, P> RecordsQuery for RecordService<R, H, P>
where
    R: RecordRepository,
    H: HistoryRepository,
    P: PhotoRepository,
{
    async fn get_record(&self, caller: &Caller, id: RecordId) -> Result<Record, Error> {
        let stored = self.find_stored(id).await?;
        caller.require_owner(stored.fields.mechanic)?;
        self.hydrate_one(stored).await
    }

    async fn list_records(&self, caller: &Caller) -> Result<Vec<Record>, Error> {
        caller.require_admin()?;
        let stored = self.records.list_all().await.map_err(map_record_error)?;
        self.hydrate(stored).await
    }

    async fn list_records_by_mechanic(
        &self,
        caller: &Caller,
        mechanic: UserId,
    ) -> Result<Vec<Record>, Error> {
        caller.require_owner(mechanic)?;
        let stored = self
            .records
            .list_open_by_mechanic(mechanic, self.closed_status)
            .await
            .map_err(map_record_error)?;
        self.hydrate(stored).await
    }

    async fn get_history(&self, caller: &Caller, id: HistoryId) -> Result<HistoryEntry, Error> {
        let entry = self
            .history
            .find(id)
            .await
            .map_err(map_history_error)?
            .ok_or_else(|| Error::not_found(format!("history entry {id} not found")))?;
        let owner = self.find_stored(entry.record_id).await?;
        caller.require_owner(owner.fields.mechanic)?;
        Ok(entry)
    }

    async fn list_history(
        &self,
        caller: &Caller,
        record: RecordId,
    ) -> Result<Vec<HistoryEntry>, Error> {
        let owner = self.find_stored(record).await?;
        caller.require_owner(owner.fields.mechanic)?;
        let mut entries = self
            .history
            .list_for_records(&[record])
            .await
            .map_err(map_history_error)?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "record_service_tests.rs"]
mod tests;
