//! Repair records.
//!
//! A record is one customer intake: who brought what, who is working on it,
//! where it stands. The history ledger and the photo set hang off it and are
//! hydrated on every read.
//!
//! JSON shape is flat camelCase: customer and product attributes sit beside
//! the record's own fields.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{HistoryDraft, HistoryEntry, PhotoRef, PhotoValidationError, UserId, validate_photo_set};

/// Record identifier, always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct RecordId(i32);

/// Raised for zero or negative record ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("record id must be a positive integer, got {0}")]
pub struct InvalidRecordId(pub i32);

impl RecordId {
    pub fn new(raw: i32) -> Result<Self, InvalidRecordId> {
        if raw < 1 {
            return Err(InvalidRecordId(raw));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for RecordId {
    type Error = InvalidRecordId;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for i32 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status lookup code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(pub i32);

/// Store lookup code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(pub i32);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone_mobile: Option<String>,
    #[serde(default)]
    pub phone_home: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Customer {
    /// Mobile number usable for SMS, if one is on file.
    pub fn mobile(&self) -> Option<&str> {
        self.phone_mobile
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
    }
}

/// Appliance brought in for repair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub has_warranty: bool,
    #[serde(default)]
    pub warranty_date: Option<NaiveDate>,
}

/// Editable record attributes, replaced wholesale on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub advance: Option<String>,
    pub status: StatusId,
    /// Owning mechanic.
    pub mechanic: UserId,
    #[serde(default)]
    pub notes_received: String,
    #[serde(default)]
    pub notes_repaired: Option<String>,
    pub store: StoreId,
}

/// Payload for creating or editing a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    #[serde(flatten)]
    pub fields: RecordFields,
    /// Complete ordered photo set after the write.
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    /// History entries to append.
    #[serde(default)]
    pub new_history: Vec<HistoryDraft>,
}

/// Record row without its hydrated collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub fields: RecordFields,
}

/// Fully hydrated record as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: RecordFields,
    pub photos: Vec<PhotoRef>,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
}

impl Record {
    pub fn mechanic(&self) -> UserId {
        self.fields.mechanic
    }
}

/// Record payload rejected before any write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    #[error("customer name must not be empty")]
    EmptyCustomerName,
    #[error("product must not be empty")]
    EmptyProduct,
    #[error("history entry {index} has empty notes")]
    EmptyHistoryNotes { index: usize },
    #[error(transparent)]
    Photos(#[from] PhotoValidationError),
}

impl RecordValidationError {
    /// Offending payload field, reported back to clients.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyCustomerName => "name",
            Self::EmptyProduct => "product",
            Self::EmptyHistoryNotes { .. } => "newHistory",
            Self::Photos(_) => "photos",
        }
    }
}

impl RecordDraft {
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.fields.customer.name.trim().is_empty() {
            return Err(RecordValidationError::EmptyCustomerName);
        }
        if self.fields.product.product.trim().is_empty() {
            return Err(RecordValidationError::EmptyProduct);
        }
        if let Some(index) = self
            .new_history
            .iter()
            .position(|entry| entry.notes.trim().is_empty())
        {
            return Err(RecordValidationError::EmptyHistoryNotes { index });
        }
        validate_photo_set(&self.photos)?;
        Ok(())
    }
}
