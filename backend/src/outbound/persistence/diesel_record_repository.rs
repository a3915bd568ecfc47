//! PostgreSQL-backed `RecordRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecordRepository, RecordRepositoryError};
use crate::domain::{
    Customer, Product, RecordFields, RecordId, StatusId, StoreId, StoredRecord, UserId,
};

use super::diesel_helpers::{ErrorKinds, map_diesel_error, map_pool_error};
use super::models::{RecordRow, RecordValues};
use super::pool::{DbPool, PoolError};
use super::schema::records;

#[derive(Clone)]
pub struct DieselRecordRepository {
    pool: DbPool,
}

impl DieselRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RecordRepositoryError {
    map_pool_error(error, |message| RecordRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> RecordRepositoryError {
    map_diesel_error(
        error,
        &ErrorKinds {
            query: |message| RecordRepositoryError::query(message),
            connection: |message| RecordRepositoryError::connection(message),
            reference: Some(|message| RecordRepositoryError::reference(message)),
        },
    )
}

fn to_values(fields: &RecordFields) -> RecordValues<'_> {
    let customer = &fields.customer;
    let product = &fields.product;
    RecordValues {
        date: fields.date,
        name: &customer.name,
        address: customer.address.as_deref(),
        area: customer.area.as_deref(),
        city: customer.city.as_deref(),
        postal_code: customer.postal_code.as_deref(),
        phone_mobile: customer.phone_mobile.as_deref(),
        phone_home: customer.phone_home.as_deref(),
        email: customer.email.as_deref(),
        product: &product.product,
        manufacturer: product.manufacturer.as_deref(),
        serial: product.serial.as_deref(),
        has_warranty: product.has_warranty,
        warranty_date: product.warranty_date,
        fee: fields.fee.as_deref(),
        advance: fields.advance.as_deref(),
        status: fields.status.0,
        mechanic: fields.mechanic.get(),
        notes_received: &fields.notes_received,
        notes_repaired: fields.notes_repaired.as_deref(),
        store: fields.store.0,
    }
}

fn row_to_record(row: RecordRow) -> Result<StoredRecord, RecordRepositoryError> {
    let id = RecordId::new(row.id).map_err(|err| RecordRepositoryError::query(err.to_string()))?;
    let mechanic =
        UserId::new(row.mechanic).map_err(|err| RecordRepositoryError::query(err.to_string()))?;
    Ok(StoredRecord {
        id,
        fields: RecordFields {
            date: row.date,
            customer: Customer {
                name: row.name,
                address: row.address,
                area: row.area,
                city: row.city,
                postal_code: row.postal_code,
                phone_mobile: row.phone_mobile,
                phone_home: row.phone_home,
                email: row.email,
            },
            product: Product {
                product: row.product,
                manufacturer: row.manufacturer,
                serial: row.serial,
                has_warranty: row.has_warranty,
                warranty_date: row.warranty_date,
            },
            fee: row.fee,
            advance: row.advance,
            status: StatusId(row.status),
            mechanic,
            notes_received: row.notes_received,
            notes_repaired: row.notes_repaired,
            store: StoreId(row.store),
        },
    })
}

fn rows_to_records(rows: Vec<RecordRow>) -> Result<Vec<StoredRecord>, RecordRepositoryError> {
    rows.into_iter().map(row_to_record).collect()
}

#[async_trait]
impl RecordRepository for DieselRecordRepository {
    async fn insert(&self, fields: &RecordFields) -> Result<RecordId, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let id: i32 = diesel::insert_into(records::table)
            .values(&to_values(fields))
            .returning(records::id)
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        RecordId::new(id).map_err(|err| RecordRepositoryError::query(err.to_string()))
    }

    async fn find(&self, id: RecordId) -> Result<Option<StoredRecord>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<RecordRow> = records::table
            .find(id.get())
            .select(RecordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_record).transpose()
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<RecordRow> = records::table
            .select(RecordRow::as_select())
            .order(records::id.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_records(rows)
    }

    async fn list_open_by_mechanic(
        &self,
        mechanic: UserId,
        closed: StatusId,
    ) -> Result<Vec<StoredRecord>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<RecordRow> = records::table
            .filter(records::mechanic.eq(mechanic.get()))
            .filter(records::status.ne(closed.0))
            .select(RecordRow::as_select())
            .order(records::id.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_records(rows)
    }

    async fn update(
        &self,
        id: RecordId,
        fields: &RecordFields,
    ) -> Result<bool, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(records::table.find(id.get()))
            .set(&to_values(fields))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(records::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn row() -> RecordRow {
        RecordRow {
            id: 4,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).expect("date"),
            name: "Eleni".to_owned(),
            address: None,
            area: None,
            city: Some("Patras".to_owned()),
            postal_code: None,
            phone_mobile: Some("6900000000".to_owned()),
            phone_home: None,
            email: None,
            product: "Fridge".to_owned(),
            manufacturer: None,
            serial: None,
            has_warranty: false,
            warranty_date: None,
            fee: None,
            advance: None,
            status: 1,
            mechanic: 5,
            notes_received: String::new(),
            notes_repaired: None,
            store: 2,
        }
    }

    #[rstest]
    fn rows_convert_to_records() {
        let record = row_to_record(row()).expect("valid row");
        assert_eq!(record.id.get(), 4);
        assert_eq!(record.fields.mechanic.get(), 5);
        assert_eq!(record.fields.store, StoreId(2));
        assert_eq!(record.fields.customer.mobile(), Some("6900000000"));
    }

    #[rstest]
    fn values_mirror_the_fields() {
        let record = row_to_record(row()).expect("valid row");
        let values = to_values(&record.fields);
        assert_eq!(values.name, "Eleni");
        assert_eq!(values.city, Some("Patras"));
        assert_eq!(values.mechanic, 5);
        assert_eq!(values.store, 2);
    }

    #[rstest]
    fn corrupt_ids_are_query_errors() {
        let mut bad = row();
        bad.mechanic = -1;
        assert!(matches!(
            row_to_record(bad),
            Err(RecordRepositoryError::Query { .. })
        ));
    }
}
