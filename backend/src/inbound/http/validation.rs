//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path segments arrive as strings so malformed ids become `400` responses
//! with field details instead of actix's default `404`.

use serde_json::json;

use crate::domain::{Error, HistoryId, RecordId, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const RECORD_ID: FieldName = FieldName::new("id");
pub(crate) const HISTORY_ID: FieldName = FieldName::new("id");
pub(crate) const MECHANIC_ID: FieldName = FieldName::new("mechanic");
pub(crate) const RECORD_REF: FieldName = FieldName::new("recordId");

pub(crate) fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid identifier")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidId.as_str(),
    }))
}

fn parse_id<T, E>(
    value: &str,
    field: FieldName,
    build: impl FnOnce(i32) -> Result<T, E>,
) -> Result<T, Error> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .and_then(|raw| build(raw).ok())
        .ok_or_else(|| invalid_id_error(field, value))
}

pub(crate) fn parse_record_id(value: &str, field: FieldName) -> Result<RecordId, Error> {
    parse_id(value, field, RecordId::new)
}

pub(crate) fn parse_history_id(value: &str, field: FieldName) -> Result<HistoryId, Error> {
    parse_id(value, field, HistoryId::new)
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_id(value, field, UserId::new)
}
