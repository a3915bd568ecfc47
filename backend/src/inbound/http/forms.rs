//! Printable form handlers.
//!
//! ```text
//! POST /api/v1/records/{id}/form   -> {"name":"deltio_7_2025_3_7_0a1b2c3d.pdf"}
//! GET  /api/v1/forms/{name}        -> application/pdf
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Error, FormName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{RECORD_ID, parse_record_id};

/// Name of a freshly rendered form.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FormCreated {
    /// Download name, valid for a few minutes.
    #[schema(value_type = String, example = "deltio_7_2025_3_7_0a1b2c3d.pdf")]
    pub name: FormName,
}

/// Render the record's store-specific form.
#[utoipa::path(
    post,
    path = "/api/v1/records/{id}/form",
    params(("id" = i32, Path, description = "Record id")),
    responses(
        (status = 201, description = "Form rendered", body = FormCreated),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema),
        (status = 502, description = "Renderer failed", body = ErrorSchema),
        (status = 504, description = "Renderer timed out", body = ErrorSchema)
    ),
    tags = ["forms"],
    operation_id = "createForm"
)]
#[post("/records/{id}/form")]
pub async fn create_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let record = parse_record_id(&path, RECORD_ID)?;
    let name = state.forms.create_form(&caller, record).await?;
    info!(user_id = %caller.id(), record_id = %record, form = %name, "form rendered");
    Ok(HttpResponse::Created().json(FormCreated { name }))
}

/// Download a rendered form until it expires.
#[utoipa::path(
    get,
    path = "/api/v1/forms/{name}",
    params(("name" = String, Path, description = "Form name returned at creation")),
    responses(
        (status = 200, description = "PDF document (application/pdf)"),
        (status = 400, description = "Not a form name", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown or expired", body = ErrorSchema)
    ),
    tags = ["forms"],
    operation_id = "downloadForm"
)]
#[get("/forms/{name}")]
pub async fn download_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_caller()?;
    let name = FormName::parse(path.into_inner()).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "name", "code": "invalid_form_name" }))
    })?;
    let bytes = state.forms.open_form(&name).await?;
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{name}\""),
        ))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(bytes))
}
