//! HTTP adapter mapping for domain errors.
//!
//! Status codes follow the error code: client mistakes are 4xx, an
//! unreachable database is 503, a refusing SMS gateway, push service or PDF
//! renderer is 502 and a renderer running past its budget is 504.

use std::borrow::Cow;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::UpstreamFailure => StatusCode::BAD_GATEWAY,
        ErrorCode::IntegrationTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent to the client. Internal failures lose their message; failed
/// integrations are logged since the caller only sees the summary.
fn public_view(error: &Error) -> Cow<'_, Error> {
    match error.code() {
        ErrorCode::InternalError => {
            error!(
                trace_id = error.trace_id(),
                message = error.message(),
                "internal error redacted from response"
            );
            let redacted = Error::internal("Internal server error");
            Cow::Owned(match error.trace_id() {
                Some(id) => redacted.with_trace_id(id.to_owned()),
                None => redacted,
            })
        }
        ErrorCode::UpstreamFailure | ErrorCode::IntegrationTimeout => {
            warn!(
                trace_id = error.trace_id(),
                code = ?error.code(),
                message = error.message(),
                "integration failure returned to client"
            );
            Cow::Borrowed(error)
        }
        _ => Cow::Borrowed(error),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(public_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
