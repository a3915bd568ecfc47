//! PostgreSQL-backed lookup tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{LookupRepository, LookupRepositoryError};
use crate::domain::{LookupEntry, Lookups, MechanicSummary, Store, StoreId};

use super::diesel_helpers::{ErrorKinds, map_diesel_error, map_pool_error};
use super::models::{LookupRow, StoreRow};
use super::pool::{DbPool, PoolError};
use super::schema::{damages, manufacturers, products, statuses, stores, users};

#[derive(Clone)]
pub struct DieselLookupRepository {
    pool: DbPool,
}

impl DieselLookupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> LookupRepositoryError {
    map_pool_error(error, |message| LookupRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> LookupRepositoryError {
    map_diesel_error(
        error,
        &ErrorKinds {
            query: |message| LookupRepositoryError::query(message),
            connection: |message| LookupRepositoryError::connection(message),
            reference: None,
        },
    )
}

fn entries(rows: Vec<LookupRow>) -> Vec<LookupEntry> {
    rows.into_iter()
        .map(|LookupRow { id, name }| LookupEntry { id, name })
        .collect()
}

fn row_to_store(row: StoreRow) -> Store {
    Store {
        id: row.id,
        name: row.name,
        address: row.address,
        phone: row.phone,
        review_link: row.review_link,
    }
}

#[async_trait]
impl LookupRepository for DieselLookupRepository {
    async fn load(&self) -> Result<Lookups, LookupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        // One snapshot for all tables.
        conn.build_transaction()
            .read_only()
            .run(|conn| {
                async move {
                    let statuses = statuses::table
                        .select((statuses::id, statuses::name))
                        .order(statuses::id.asc())
                        .load::<LookupRow>(conn)
                        .await?;
                    let products = products::table
                        .select((products::id, products::name))
                        .order(products::name.asc())
                        .load::<LookupRow>(conn)
                        .await?;
                    let manufacturers = manufacturers::table
                        .select((manufacturers::id, manufacturers::name))
                        .order(manufacturers::name.asc())
                        .load::<LookupRow>(conn)
                        .await?;
                    let damages = damages::table
                        .select((damages::id, damages::name))
                        .order(damages::name.asc())
                        .load::<LookupRow>(conn)
                        .await?;
                    let stores = stores::table
                        .select(StoreRow::as_select())
                        .order(stores::id.asc())
                        .load::<StoreRow>(conn)
                        .await?;
                    // The admin account is not a mechanic.
                    let mechanics = users::table
                        .filter(users::id.gt(0))
                        .select((users::id, users::name))
                        .order(users::name.asc())
                        .load::<LookupRow>(conn)
                        .await?;

                    Ok::<_, diesel::result::Error>(Lookups {
                        statuses: entries(statuses),
                        products: entries(products),
                        manufacturers: entries(manufacturers),
                        stores: stores.into_iter().map(row_to_store).collect(),
                        damages: entries(damages),
                        mechanics: mechanics
                            .into_iter()
                            .map(|LookupRow { id, name }| MechanicSummary { id, name })
                            .collect(),
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)
    }

    async fn find_store(&self, id: StoreId) -> Result<Option<Store>, LookupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<StoreRow> = stores::table
            .find(id.0)
            .select(StoreRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(row_to_store))
    }
}
