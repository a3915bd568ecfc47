//! PostgreSQL-backed photo sets.
//!
//! A replace deletes the record's rows and inserts the new ordered set in one
//! transaction, so readers never see a half-written set.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PhotoRepository, PhotoRepositoryError};
use crate::domain::{PhotoRef, RecordId};

use super::diesel_helpers::{ErrorKinds, map_diesel_error, map_pool_error};
use super::models::{NewPhotoRow, PhotoRow};
use super::pool::{DbPool, PoolError};
use super::schema::photos;

#[derive(Clone)]
pub struct DieselPhotoRepository {
    pool: DbPool,
}

impl DieselPhotoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PhotoRepositoryError {
    map_pool_error(error, |message| PhotoRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> PhotoRepositoryError {
    map_diesel_error(
        error,
        &ErrorKinds {
            query: |message| PhotoRepositoryError::query(message),
            connection: |message| PhotoRepositoryError::connection(message),
            reference: Some(|message| PhotoRepositoryError::reference(message)),
        },
    )
}

fn new_rows(
    record: RecordId,
    set: &[PhotoRef],
) -> Result<Vec<NewPhotoRow<'_>>, PhotoRepositoryError> {
    set.iter()
        .enumerate()
        .map(|(position, photo)| {
            let position = i32::try_from(position)
                .map_err(|_| PhotoRepositoryError::query("photo set too large"))?;
            Ok(NewPhotoRow {
                record_id: record.get(),
                position,
                name: photo.as_str(),
            })
        })
        .collect()
}

/// Group rows, already sorted by record and position, into ordered sets.
fn group_rows(
    rows: Vec<PhotoRow>,
) -> Result<HashMap<RecordId, Vec<PhotoRef>>, PhotoRepositoryError> {
    let mut sets: HashMap<RecordId, Vec<PhotoRef>> = HashMap::new();
    for row in rows {
        let record = RecordId::new(row.record_id)
            .map_err(|err| PhotoRepositoryError::query(err.to_string()))?;
        let photo =
            PhotoRef::new(row.name).map_err(|err| PhotoRepositoryError::query(err.to_string()))?;
        sets.entry(record).or_default().push(photo);
    }
    Ok(sets)
}

#[async_trait]
impl PhotoRepository for DieselPhotoRepository {
    async fn replace(
        &self,
        record: RecordId,
        set: &[PhotoRef],
    ) -> Result<(), PhotoRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let rows = new_rows(record, set)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::delete(photos::table.filter(photos::record_id.eq(record.get())))
                    .execute(conn)
                    .await?;
                if !rows.is_empty() {
                    diesel::insert_into(photos::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn list_for_records(
        &self,
        records: &[RecordId],
    ) -> Result<HashMap<RecordId, Vec<PhotoRef>>, PhotoRepositoryError> {
        if records.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<i32> = records.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<PhotoRow> = photos::table
            .filter(photos::record_id.eq_any(&ids))
            .select(PhotoRow::as_select())
            .order((photos::record_id.asc(), photos::position.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        group_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(raw: i32) -> RecordId {
        RecordId::new(raw).expect("valid record id")
    }

    #[rstest]
    fn new_rows_carry_explicit_positions() {
        let photos = vec![
            PhotoRef::new("b.jpg").expect("valid"),
            PhotoRef::new("a.jpg").expect("valid"),
        ];
        let rows = new_rows(record(3), &photos).expect("rows");
        let positions: Vec<(i32, &str)> = rows.iter().map(|row| (row.position, row.name)).collect();
        assert_eq!(positions, vec![(0, "b.jpg"), (1, "a.jpg")]);
        assert!(rows.iter().all(|row| row.record_id == 3));
    }

    #[rstest]
    fn rows_group_per_record_in_order() {
        let row = |record_id, position, name: &str| PhotoRow {
            record_id,
            position,
            name: name.to_owned(),
        };
        let sets = group_rows(vec![
            row(1, 0, "x.jpg"),
            row(1, 1, "y.jpg"),
            row(2, 0, "z.jpg"),
        ])
        .expect("grouped");

        let names = |id: i32| -> Vec<String> {
            sets[&record(id)].iter().map(ToString::to_string).collect()
        };
        assert_eq!(names(1), vec!["x.jpg", "y.jpg"]);
        assert_eq!(names(2), vec!["z.jpg"]);
    }
}
