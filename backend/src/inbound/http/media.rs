//! Photo upload handler.
//!
//! ```text
//! POST /api/v1/media   multipart/form-data; one or more `file` parts
//! ```
//!
//! Limits are enforced while the body streams in so an oversized request is
//! refused without buffering it whole.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{post, web};
use futures_util::TryStreamExt as _;
use serde_json::json;

use crate::domain::{Error, PhotoRef, PhotoUpload, UploadLimitError, UploadLimits};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Multipart part name carrying photo bytes.
pub const FILE_FIELD: &str = "file";

fn limit_error(limits: UploadLimits, err: UploadLimitError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "maxFiles": limits.max_files,
        "maxFileBytes": limits.max_file_bytes,
    }))
}

fn multipart_error(err: MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

async fn read_file(mut field: Field, limits: UploadLimits) -> Result<PhotoUpload, Error> {
    let original_name = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .map(str::to_owned);
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limits.max_file_bytes {
            return Err(limit_error(
                limits,
                UploadLimitError::FileTooLarge {
                    max: limits.max_file_bytes,
                },
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(PhotoUpload {
        original_name,
        bytes,
    })
}

async fn collect_uploads(
    mut payload: Multipart,
    limits: UploadLimits,
) -> Result<Vec<PhotoUpload>, Error> {
    let mut uploads = Vec::new();
    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            while field.try_next().await.map_err(multipart_error)?.is_some() {}
            continue;
        }
        if uploads.len() == limits.max_files {
            return Err(limit_error(
                limits,
                UploadLimitError::TooManyFiles {
                    max: limits.max_files,
                },
            ));
        }
        uploads.push(read_file(field, limits).await?);
    }
    Ok(uploads)
}

/// Store uploaded photos and return their generated names in upload order.
#[utoipa::path(
    post,
    path = "/api/v1/media",
    request_body(content_type = "multipart/form-data", description = "One or more `file` parts"),
    responses(
        (status = 200, description = "Stored photo names", body = [String]),
        (status = 400, description = "No files, too many, or too large", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["media"],
    operation_id = "uploadPhotos"
)]
#[post("/media")]
pub async fn upload_photos(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Multipart,
) -> ApiResult<web::Json<Vec<PhotoRef>>> {
    let caller = session.require_caller()?;
    let uploads = collect_uploads(payload, state.photos.limits()).await?;
    let names = state.photos.store_photos(&caller, uploads).await?;
    Ok(web::Json(names))
}
