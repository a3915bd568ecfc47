//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; these mirrors describe their JSON
//! shape for the generated document and live where framework concerns
//! belong.

#![expect(
    dead_code,
    reason = "Fields are read only by utoipa schema generation"
)]

use chrono::{DateTime, NaiveDate, Utc};
use utoipa::ToSchema;

/// Stable machine-readable error codes.
#[derive(ToSchema)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "upstream_failure")]
    UpstreamFailure,
    #[schema(rename = "integration_timeout")]
    IntegrationTimeout,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Error payload returned by every endpoint.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    #[schema(example = "record 7 not found")]
    message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// Logged-in account. `id` 0 is the admin.
#[derive(ToSchema)]
pub struct UserSchema {
    #[schema(example = 3)]
    id: i32,
    #[schema(example = "Nikos Georgiou")]
    name: String,
    #[schema(example = "nikos")]
    username: String,
}

/// One status note on a record.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct HistoryEntrySchema {
    id: i32,
    record_id: i32,
    mechanic: i32,
    date: DateTime<Utc>,
    notes: String,
}

/// History note supplied on create or edit.
#[derive(ToSchema)]
pub struct HistoryDraftSchema {
    /// Defaults to the time of the request.
    date: Option<DateTime<Utc>>,
    notes: String,
}

/// Record payload for create and edit.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RecordDraftSchema {
    date: NaiveDate,
    name: String,
    address: Option<String>,
    area: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    phone_mobile: Option<String>,
    phone_home: Option<String>,
    email: Option<String>,
    product: String,
    manufacturer: Option<String>,
    serial: Option<String>,
    has_warranty: bool,
    warranty_date: Option<NaiveDate>,
    fee: Option<String>,
    advance: Option<String>,
    status: i32,
    /// Ignored for mechanics, who always own what they write.
    mechanic: i32,
    notes_received: String,
    notes_repaired: Option<String>,
    store: i32,
    /// Complete ordered photo set after the write.
    photos: Vec<String>,
    new_history: Vec<HistoryDraftSchema>,
}

/// Hydrated record.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RecordSchema {
    id: i32,
    date: NaiveDate,
    name: String,
    address: Option<String>,
    area: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    phone_mobile: Option<String>,
    phone_home: Option<String>,
    email: Option<String>,
    product: String,
    manufacturer: Option<String>,
    serial: Option<String>,
    has_warranty: bool,
    warranty_date: Option<NaiveDate>,
    fee: Option<String>,
    advance: Option<String>,
    status: i32,
    mechanic: i32,
    notes_received: String,
    notes_repaired: Option<String>,
    store: i32,
    photos: Vec<String>,
    /// Newest first.
    history: Vec<HistoryEntrySchema>,
}

#[derive(ToSchema)]
pub struct LookupEntrySchema {
    id: i32,
    name: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct StoreSchema {
    id: i32,
    name: String,
    address: String,
    phone: String,
    review_link: String,
}

/// Drop-down contents for the intake form.
#[derive(ToSchema)]
pub struct LookupsSchema {
    statuses: Vec<LookupEntrySchema>,
    products: Vec<LookupEntrySchema>,
    manufacturers: Vec<LookupEntrySchema>,
    stores: Vec<StoreSchema>,
    damages: Vec<LookupEntrySchema>,
    mechanics: Vec<LookupEntrySchema>,
}

#[derive(ToSchema)]
pub enum SmsKindSchema {
    #[schema(rename = "repaired")]
    Repaired,
    #[schema(rename = "unrepairable")]
    Unrepairable,
    #[schema(rename = "thanks")]
    Thanks,
}

/// Confirmation that the provider delivered the message.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SmsReceiptSchema {
    message_id: String,
    record_id: i32,
    kind: SmsKindSchema,
    to: String,
}

/// Delivery report posted by the SMS provider.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct DeliveryReportSchema {
    message_id: String,
    delivery_status_code: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn properties(schema: utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>) -> Vec<String> {
        match schema {
            utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(object)) => {
                object.properties.keys().cloned().collect()
            }
            _ => panic!("expected an object schema"),
        }
    }

    #[test]
    fn record_schema_uses_camel_case_keys() {
        let keys = properties(RecordSchema::schema());
        assert!(keys.contains(&"phoneMobile".to_owned()));
        assert!(keys.contains(&"notesReceived".to_owned()));
        assert!(!keys.contains(&"phone_mobile".to_owned()));
    }

    #[test]
    fn error_schema_exposes_trace_id() {
        let keys = properties(ErrorSchema::schema());
        assert!(keys.contains(&"traceId".to_owned()));
    }
}
