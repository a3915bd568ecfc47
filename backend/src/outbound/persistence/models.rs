//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::{history, photos, records, stores, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub password: String,
}

/// `id, name` pair shared by the plain lookup tables.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct LookupRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StoreRow {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub review_link: String,
}

/// Row struct for reading from the records table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecordRow {
    pub id: i32,
    pub date: NaiveDate,
    pub name: String,
    pub address: Option<String>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone_mobile: Option<String>,
    pub phone_home: Option<String>,
    pub email: Option<String>,
    pub product: String,
    pub manufacturer: Option<String>,
    pub serial: Option<String>,
    pub has_warranty: bool,
    pub warranty_date: Option<NaiveDate>,
    pub fee: Option<String>,
    pub advance: Option<String>,
    pub status: i32,
    pub mechanic: i32,
    pub notes_received: String,
    pub notes_repaired: Option<String>,
    pub store: i32,
}

/// Column values for inserting or fully replacing a record.
///
/// `treat_none_as_null` makes an update clear columns the client left out.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = records)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RecordValues<'a> {
    pub date: NaiveDate,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub area: Option<&'a str>,
    pub city: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub phone_mobile: Option<&'a str>,
    pub phone_home: Option<&'a str>,
    pub email: Option<&'a str>,
    pub product: &'a str,
    pub manufacturer: Option<&'a str>,
    pub serial: Option<&'a str>,
    pub has_warranty: bool,
    pub warranty_date: Option<NaiveDate>,
    pub fee: Option<&'a str>,
    pub advance: Option<&'a str>,
    pub status: i32,
    pub mechanic: i32,
    pub notes_received: &'a str,
    pub notes_repaired: Option<&'a str>,
    pub store: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HistoryRow {
    pub id: i32,
    pub record_id: i32,
    pub mechanic: i32,
    pub date: DateTime<Utc>,
    pub notes: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = history)]
pub(crate) struct NewHistoryRow<'a> {
    pub record_id: i32,
    pub mechanic: i32,
    pub date: DateTime<Utc>,
    pub notes: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PhotoRow {
    pub record_id: i32,
    pub position: i32,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = photos)]
pub(crate) struct NewPhotoRow<'a> {
    pub record_id: i32,
    pub position: i32,
    pub name: &'a str,
}
