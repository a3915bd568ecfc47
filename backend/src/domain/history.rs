//! History ledger entries.
//!
//! Entries are append-only: created alongside a record write, never edited
//! or removed on their own. Listings are newest first.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RecordId, UserId};

/// Identifier of a history entry, always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct HistoryId(i32);

/// Raised for zero or negative history ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("history id must be a positive integer, got {0}")]
pub struct InvalidHistoryId(pub i32);

impl HistoryId {
    pub fn new(raw: i32) -> Result<Self, InvalidHistoryId> {
        if raw < 1 {
            return Err(InvalidHistoryId(raw));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for HistoryId {
    type Error = InvalidHistoryId;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HistoryId> for i32 {
    fn from(value: HistoryId) -> Self {
        value.0
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub record_id: RecordId,
    /// Who recorded the entry.
    pub mechanic: UserId,
    pub date: DateTime<Utc>,
    pub notes: String,
}

impl HistoryEntry {
    /// Newest first; equal timestamps fall back to the higher id.
    pub fn newest_first(a: &HistoryEntry, b: &HistoryEntry) -> Ordering {
        b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id))
    }
}

/// Client-supplied entry to append on create or edit.
///
/// `recordId` and `mechanic` are never taken from the client; the service
/// fills them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDraft {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub notes: String,
}

/// Fully resolved entry ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub record_id: RecordId,
    pub mechanic: UserId,
    pub date: DateTime<Utc>,
    pub notes: String,
}

impl NewHistoryEntry {
    pub fn from_draft(
        draft: HistoryDraft,
        record_id: RecordId,
        mechanic: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            record_id,
            mechanic,
            date: draft.date.unwrap_or(now),
            notes: draft.notes,
        }
    }
}

/// Sort `entries` into ledger order in place.
pub fn sort_newest_first(entries: &mut [HistoryEntry]) {
    entries.sort_by(HistoryEntry::newest_first);
}
