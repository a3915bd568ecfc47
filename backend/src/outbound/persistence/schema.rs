//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Staff accounts. Id `0` is the admin.
    users (id) {
        id -> Int4,
        name -> Varchar,
        username -> Varchar,
        password -> Varchar,
    }
}

diesel::table! {
    statuses (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    products (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    manufacturers (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    damages (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    /// Shops; each has its own base PDF layout and SMS details.
    stores (id) {
        id -> Int4,
        name -> Varchar,
        address -> Varchar,
        phone -> Varchar,
        review_link -> Varchar,
    }
}

diesel::table! {
    /// Repair tickets. Customer and product columns are flattened.
    records (id) {
        id -> Int4,
        date -> Date,
        name -> Varchar,
        address -> Nullable<Varchar>,
        area -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        postal_code -> Nullable<Varchar>,
        phone_mobile -> Nullable<Varchar>,
        phone_home -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        product -> Varchar,
        manufacturer -> Nullable<Varchar>,
        serial -> Nullable<Varchar>,
        has_warranty -> Bool,
        warranty_date -> Nullable<Date>,
        fee -> Nullable<Varchar>,
        advance -> Nullable<Varchar>,
        status -> Int4,
        mechanic -> Int4,
        notes_received -> Text,
        notes_repaired -> Nullable<Text>,
        store -> Int4,
    }
}

diesel::table! {
    /// Append-only ledger; rows go away only with their record.
    history (id) {
        id -> Int4,
        record_id -> Int4,
        mechanic -> Int4,
        date -> Timestamptz,
        notes -> Text,
    }
}

diesel::table! {
    /// Ordered photo set of each record.
    photos (record_id, position) {
        record_id -> Int4,
        position -> Int4,
        name -> Varchar,
    }
}

diesel::joinable!(history -> records (record_id));
diesel::joinable!(photos -> records (record_id));
diesel::joinable!(records -> statuses (status));
diesel::joinable!(records -> stores (store));

diesel::allow_tables_to_appear_in_same_query!(
    damages,
    history,
    manufacturers,
    photos,
    products,
    records,
    statuses,
    stores,
    users,
);
