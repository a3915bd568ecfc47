//! Customer SMS handlers.
//!
//! ```text
//! POST /api/v1/records/{id}/sms  {"kind":"repaired"}
//! POST /api/v1/sms/callback      {"messageId":"...","deliveryStatusCode":1}
//! GET  /api/v1/sms/callback?messageId=...&deliveryStatusCode=1
//! ```
//!
//! The send request stays open until the provider reports delivery. The
//! callback endpoints always answer `200` so providers do not retry reports
//! for sends nobody is waiting on.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{DeliveryReport, SmsKind, SmsReceipt};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DeliveryReportSchema, ErrorSchema, SmsKindSchema, SmsReceiptSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{RECORD_ID, parse_record_id};

/// Message template to send.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SmsRequest {
    #[schema(value_type = SmsKindSchema)]
    pub kind: SmsKind,
}

/// Send a templated message to the record's customer and wait for delivery.
#[utoipa::path(
    post,
    path = "/api/v1/records/{id}/sms",
    params(("id" = i32, Path, description = "Record id")),
    request_body = SmsRequest,
    responses(
        (status = 200, description = "Delivered", body = SmsReceiptSchema),
        (status = 400, description = "No mobile number or template data", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema),
        (status = 502, description = "Provider rejected or failed delivery", body = ErrorSchema)
    ),
    tags = ["sms"],
    operation_id = "sendSms"
)]
#[post("/records/{id}/sms")]
pub async fn send_sms(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SmsRequest>,
) -> ApiResult<web::Json<SmsReceipt>> {
    let caller = session.require_caller()?;
    let record = parse_record_id(&path, RECORD_ID)?;
    let receipt = state.sms.send(&caller, record, payload.kind).await?;
    Ok(web::Json(receipt))
}

fn acknowledge(state: &HttpState, report: DeliveryReport) -> HttpResponse {
    let message_id = report.message_id.clone();
    if !state.sms.record_delivery(report) {
        debug!(message_id = %message_id, "delivery report for unknown message ignored");
    }
    HttpResponse::Ok().finish()
}

/// Delivery report delivered as JSON.
#[utoipa::path(
    post,
    path = "/api/v1/sms/callback",
    request_body = DeliveryReportSchema,
    responses((status = 200, description = "Report accepted")),
    tags = ["sms"],
    operation_id = "smsCallback",
    security([])
)]
#[post("/sms/callback")]
pub async fn delivery_callback(
    state: web::Data<HttpState>,
    payload: web::Json<DeliveryReport>,
) -> HttpResponse {
    acknowledge(&state, payload.into_inner())
}

/// Delivery report delivered as query parameters.
#[utoipa::path(
    get,
    path = "/api/v1/sms/callback",
    params(
        ("messageId" = String, Query, description = "Correlation id sent with the message"),
        ("deliveryStatusCode" = i32, Query, description = "Provider delivery status")
    ),
    responses((status = 200, description = "Report accepted")),
    tags = ["sms"],
    operation_id = "smsCallbackQuery",
    security([])
)]
#[get("/sms/callback")]
pub async fn delivery_callback_query(
    state: web::Data<HttpState>,
    query: web::Query<DeliveryReport>,
) -> HttpResponse {
    acknowledge(&state, query.into_inner())
}
