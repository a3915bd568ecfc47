//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http` together with
//! the schema mirrors from [`crate::inbound::http::schemas`], so domain types
//! stay free of utoipa derives. Swagger UI serves the document in debug
//! builds.

use crate::inbound::http::forms::FormCreated;
use crate::inbound::http::schemas::{
    DeliveryReportSchema, ErrorCodeSchema, ErrorSchema, HistoryDraftSchema, HistoryEntrySchema,
    LookupEntrySchema, LookupsSchema, RecordDraftSchema, RecordSchema, SmsKindSchema,
    SmsReceiptSchema, StoreSchema, UserSchema,
};
use crate::inbound::http::sms::SmsRequest;
use crate::inbound::http::users::{LoginRequest, LoginResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the repair desk REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Repair desk API",
        description = "Repair records, history, photos, printable forms and customer notifications."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::records::list_records,
        crate::inbound::http::records::list_records_by_mechanic,
        crate::inbound::http::records::get_record,
        crate::inbound::http::records::create_record,
        crate::inbound::http::records::edit_record,
        crate::inbound::http::records::delete_record,
        crate::inbound::http::history::get_history,
        crate::inbound::http::history::list_history,
        crate::inbound::http::media::upload_photos,
        crate::inbound::http::forms::create_form,
        crate::inbound::http::forms::download_form,
        crate::inbound::http::sms::send_sms,
        crate::inbound::http::sms::delivery_callback,
        crate::inbound::http::sms::delivery_callback_query,
        crate::inbound::http::lookups::get_lookups,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        LoginRequest,
        LoginResponse,
        RecordSchema,
        RecordDraftSchema,
        HistoryEntrySchema,
        HistoryDraftSchema,
        LookupsSchema,
        LookupEntrySchema,
        StoreSchema,
        SmsKindSchema,
        SmsRequest,
        SmsReceiptSchema,
        DeliveryReportSchema,
        FormCreated,
    )),
    tags(
        (name = "users", description = "Login and logout"),
        (name = "records", description = "Repair records"),
        (name = "history", description = "Record history ledger"),
        (name = "media", description = "Photo uploads"),
        (name = "forms", description = "Printable service forms"),
        (name = "sms", description = "Customer SMS and delivery reports"),
        (name = "lookups", description = "Drop-down lookup tables"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
