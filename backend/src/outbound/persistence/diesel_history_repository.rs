//! PostgreSQL-backed history ledger.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HistoryRepository, HistoryRepositoryError};
use crate::domain::{HistoryEntry, HistoryId, NewHistoryEntry, RecordId, UserId};

use super::diesel_helpers::{ErrorKinds, map_diesel_error, map_pool_error};
use super::models::{HistoryRow, NewHistoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::history;

/// Insert-and-read adapter; there is no update or delete path.
#[derive(Clone)]
pub struct DieselHistoryRepository {
    pool: DbPool,
}

impl DieselHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> HistoryRepositoryError {
    map_pool_error(error, |message| HistoryRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> HistoryRepositoryError {
    map_diesel_error(
        error,
        &ErrorKinds {
            query: |message| HistoryRepositoryError::query(message),
            connection: |message| HistoryRepositoryError::connection(message),
            reference: Some(|message| HistoryRepositoryError::reference(message)),
        },
    )
}

fn row_to_entry(row: HistoryRow) -> Result<HistoryEntry, HistoryRepositoryError> {
    let corrupt = |message: String| HistoryRepositoryError::query(message);
    Ok(HistoryEntry {
        id: HistoryId::new(row.id).map_err(|err| corrupt(err.to_string()))?,
        record_id: RecordId::new(row.record_id).map_err(|err| corrupt(err.to_string()))?,
        mechanic: UserId::new(row.mechanic).map_err(|err| corrupt(err.to_string()))?,
        date: row.date,
        notes: row.notes,
    })
}

#[async_trait]
impl HistoryRepository for DieselHistoryRepository {
    async fn append(
        &self,
        entry: &NewHistoryEntry,
    ) -> Result<HistoryEntry, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: HistoryRow = diesel::insert_into(history::table)
            .values(&NewHistoryRow {
                record_id: entry.record_id.get(),
                mechanic: entry.mechanic.get(),
                date: entry.date,
                notes: &entry.notes,
            })
            .returning(HistoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_entry(row)
    }

    async fn find(&self, id: HistoryId) -> Result<Option<HistoryEntry>, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<HistoryRow> = history::table
            .find(id.get())
            .select(HistoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_entry).transpose()
    }

    async fn list_for_records(
        &self,
        records: &[RecordId],
    ) -> Result<Vec<HistoryEntry>, HistoryRepositoryError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = records.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<HistoryRow> = history::table
            .filter(history::record_id.eq_any(&ids))
            .select(HistoryRow::as_select())
            .order((history::date.desc(), history::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_entry).collect()
    }
}
