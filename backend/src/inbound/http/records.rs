//! Record handlers.
//!
//! ```text
//! GET    /api/v1/records
//! POST   /api/v1/records
//! GET    /api/v1/records/{id}
//! PUT    /api/v1/records/{id}
//! DELETE /api/v1/records/{id}
//! GET    /api/v1/records/by/{mechanic}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use tracing::info;

use crate::domain::{Record, RecordDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RecordDraftSchema, RecordSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{MECHANIC_ID, RECORD_ID, parse_record_id, parse_user_id};

/// Every record. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/records",
    responses(
        (status = 200, description = "All records", body = [RecordSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin only", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "listRecords"
)]
#[get("/records")]
pub async fn list_records(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Record>>> {
    let caller = session.require_caller()?;
    let records = state.records_query.list_records(&caller).await?;
    Ok(web::Json(records))
}

/// Open records of one mechanic.
#[utoipa::path(
    get,
    path = "/api/v1/records/by/{mechanic}",
    params(("mechanic" = i32, Path, description = "Mechanic id")),
    responses(
        (status = 200, description = "Open records", body = [RecordSchema]),
        (status = 400, description = "Invalid mechanic id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Another mechanic's records", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "listRecordsByMechanic"
)]
#[get("/records/by/{mechanic}")]
pub async fn list_records_by_mechanic(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record>>> {
    let caller = session.require_caller()?;
    let mechanic = parse_user_id(&path, MECHANIC_ID)?;
    let records = state
        .records_query
        .list_records_by_mechanic(&caller, mechanic)
        .await?;
    Ok(web::Json(records))
}

/// One hydrated record.
#[utoipa::path(
    get,
    path = "/api/v1/records/{id}",
    params(("id" = i32, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record", body = RecordSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "getRecord"
)]
#[get("/records/{id}")]
pub async fn get_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Record>> {
    let caller = session.require_caller()?;
    let id = parse_record_id(&path, RECORD_ID)?;
    let record = state.records_query.get_record(&caller, id).await?;
    Ok(web::Json(record))
}

/// Create a record with its photos and first history entries.
#[utoipa::path(
    post,
    path = "/api/v1/records",
    request_body = RecordDraftSchema,
    responses(
        (status = 201, description = "Created", body = RecordSchema),
        (status = 400, description = "Invalid record", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "createRecord"
)]
#[post("/records")]
pub async fn create_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecordDraft>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let record = state
        .records
        .create_record(&caller, payload.into_inner())
        .await?;
    info!(user_id = %caller.id(), record_id = %record.id, "record created");
    Ok(HttpResponse::Created().json(record))
}

/// Replace a record's fields and photo set, appending new history.
#[utoipa::path(
    put,
    path = "/api/v1/records/{id}",
    params(("id" = i32, Path, description = "Record id")),
    request_body = RecordDraftSchema,
    responses(
        (status = 200, description = "Updated record", body = RecordSchema),
        (status = 400, description = "Invalid record", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "editRecord"
)]
#[put("/records/{id}")]
pub async fn edit_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecordDraft>,
) -> ApiResult<web::Json<Record>> {
    let caller = session.require_caller()?;
    let id = parse_record_id(&path, RECORD_ID)?;
    let record = state
        .records
        .edit_record(&caller, id, payload.into_inner())
        .await?;
    Ok(web::Json(record))
}

/// Delete a record. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/records/{id}",
    params(("id" = i32, Path, description = "Record id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin only", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "deleteRecord"
)]
#[delete("/records/{id}")]
pub async fn delete_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let id = parse_record_id(&path, RECORD_ID)?;
    state.records.delete_record(&caller, id).await?;
    info!(user_id = %caller.id(), record_id = %id, "record deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
