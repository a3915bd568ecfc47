//! History ledger handlers.
//!
//! ```text
//! GET /api/v1/history/{id}
//! GET /api/v1/history/of/{recordId}
//! ```

use actix_web::{get, web};

use crate::domain::HistoryEntry;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, HistoryEntrySchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{HISTORY_ID, RECORD_REF, parse_history_id, parse_record_id};

/// One history entry; visible to the owner of its record.
#[utoipa::path(
    get,
    path = "/api/v1/history/{id}",
    params(("id" = i32, Path, description = "History entry id")),
    responses(
        (status = 200, description = "History entry", body = HistoryEntrySchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such entry", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "getHistoryEntry"
)]
#[get("/history/{id}")]
pub async fn get_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<HistoryEntry>> {
    let caller = session.require_caller()?;
    let id = parse_history_id(&path, HISTORY_ID)?;
    let entry = state.records_query.get_history(&caller, id).await?;
    Ok(web::Json(entry))
}

/// A record's history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/history/of/{recordId}",
    params(("recordId" = i32, Path, description = "Record id")),
    responses(
        (status = 200, description = "History, newest first", body = [HistoryEntrySchema]),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "listRecordHistory"
)]
#[get("/history/of/{record_id}")]
pub async fn list_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<HistoryEntry>>> {
    let caller = session.require_caller()?;
    let record = parse_record_id(&path, RECORD_REF)?;
    let entries = state.records_query.list_history(&caller, record).await?;
    Ok(web::Json(entries))
}
