//! Lookup table handler.
//!
//! ```text
//! GET /api/v1/lookups
//! ```

use actix_web::{get, web};

use crate::domain::Lookups;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, LookupsSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Statuses, products, manufacturers, stores, damages and mechanics.
#[utoipa::path(
    get,
    path = "/api/v1/lookups",
    responses(
        (status = 200, description = "Lookup tables", body = LookupsSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["lookups"],
    operation_id = "getLookups"
)]
#[get("/lookups")]
pub async fn get_lookups(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Lookups>> {
    session.require_caller()?;
    let lookups = state.lookups.lookups().await?;
    Ok(web::Json(lookups))
}
