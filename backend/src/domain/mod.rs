//! Domain primitives, aggregates and services.
//!
//! Purpose: define the repair desk's entities (records, history, photo
//! sets, users), the authorization gate every protected operation goes
//! through, and the services implementing the driving ports. Adapters only
//! ever see the types re-exported here and the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifiers.
//! - Caller / Role: authenticated identity and its access policy.
//! - Record, RecordDraft, HistoryEntry, PhotoRef: the record aggregate.
//! - RecordService, FormService, SmsDispatcher, PushDispatcher and friends:
//!   driving port implementations.

pub mod access;
pub mod auth;
pub mod error;
pub mod forms;
pub mod history;
pub mod login_service;
pub mod lookups;
pub mod lookups_service;
pub mod notifications;
pub mod photo_upload_service;
pub mod photos;
pub mod ports;
pub mod record;
pub mod record_service;
pub(crate) mod repository_errors;
pub mod trace_id;
pub mod user;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::access::{Caller, Role};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::forms::{
    FORM_RETENTION, FormName, FormNameError, FormService, FormTemplate, FormTemplateError,
    form_values,
};
pub use self::history::{
    HistoryDraft, HistoryEntry, HistoryId, InvalidHistoryId, NewHistoryEntry, sort_newest_first,
};
pub use self::login_service::PasswordLoginService;
pub use self::lookups::{LookupEntry, Lookups, MechanicSummary, Store};
pub use self::lookups_service::LookupsService;
pub use self::notifications::{
    CorrelationId, DeliveryOutcome, DeliveryReport, DeviceToken, DeviceTokenError, FanOutSummary,
    OutboundSms, PendingDeliveries, PushDispatcher, PushNotification, SmsDispatcher, SmsKind,
    SmsReceipt, compose_message,
};
pub use self::photo_upload_service::PhotoUploadService;
pub use self::photos::{
    PhotoRef, PhotoUpload, PhotoValidationError, UploadLimitError, UploadLimits, orphaned,
    validate_photo_set,
};
pub use self::record::{
    Customer, InvalidRecordId, Product, Record, RecordDraft, RecordFields, RecordId,
    RecordValidationError, StatusId, StoreId, StoredRecord,
};
pub use self::record_service::{CLOSED_STATUS, RecordService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NegativeUserId, StoredUser, User, UserId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use repair_desk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
