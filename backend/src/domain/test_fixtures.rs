//! Shared builders for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use super::{
    Customer, Product, RecordFields, RecordId, StatusId, Store, StoreId, StoredRecord, UserId,
};

pub(crate) fn user(raw: i32) -> UserId {
    UserId::new(raw).expect("fixture user id")
}

pub(crate) fn record_id(raw: i32) -> RecordId {
    RecordId::new(raw).expect("fixture record id")
}

pub(crate) fn fields(mechanic: i32) -> RecordFields {
    RecordFields {
        date: NaiveDate::from_ymd_opt(2025, 3, 1).expect("fixture date"),
        customer: Customer {
            name: "Eleni Papadopoulou".to_owned(),
            city: Some("Patras".to_owned()),
            phone_mobile: Some("6900000000".to_owned()),
            ..Customer::default()
        },
        product: Product {
            product: "Washing machine".to_owned(),
            manufacturer: Some("Bosch".to_owned()),
            ..Product::default()
        },
        fee: None,
        advance: Some("20".to_owned()),
        status: StatusId(1),
        mechanic: user(mechanic),
        notes_received: "drum does not spin".to_owned(),
        notes_repaired: None,
        store: StoreId(1),
    }
}

pub(crate) fn stored(id: i32, mechanic: i32) -> StoredRecord {
    StoredRecord {
        id: record_id(id),
        fields: fields(mechanic),
    }
}

pub(crate) fn store(id: i32) -> Store {
    Store {
        id,
        name: "Central".to_owned(),
        address: "Maizonos 10".to_owned(),
        phone: "2610000000".to_owned(),
        review_link: "https://example.test/review".to_owned(),
    }
}

pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 7, 10, 30, 0)
        .single()
        .expect("fixture timestamp")
}

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_now()
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock)
}
