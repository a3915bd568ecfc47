//! Lookup tables used by the intake form and by the notification templates.

use serde::{Deserialize, Serialize};

/// Plain `{id, name}` lookup row (status, product, manufacturer, damage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: i32,
    pub name: String,
}

/// Shop front whose details appear in customer messages and on forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub review_link: String,
}

/// Mechanic as shown in pickers: id and display name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechanicSummary {
    pub id: i32,
    pub name: String,
}

/// Everything the client needs to fill its drop-downs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookups {
    pub statuses: Vec<LookupEntry>,
    pub products: Vec<LookupEntry>,
    pub manufacturers: Vec<LookupEntry>,
    pub stores: Vec<Store>,
    pub damages: Vec<LookupEntry>,
    pub mechanics: Vec<MechanicSummary>,
}
