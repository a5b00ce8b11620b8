//! HTTP adapter mapping for failures.
//!
//! Purpose: let handlers return [`Failure`] with `?` and still produce a safe
//! response when the error normaliser middleware is not installed. The
//! middleware replaces this fallback body with the mode-aware rendering.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::domain::{Failure, TRACE_ID_HEADER, TraceId, normalise};

use super::render::redacted_envelope;

/// Convenient result alias for HTTP handlers.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tour_backend::domain::AppError;
/// use tour_backend::inbound::http::ApiResult;
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(AppError::forbidden("nope").into())
/// }
/// ```
pub type ApiResult<T> = Result<T, Failure>;

impl ResponseError for Failure {
    fn status_code(&self) -> StatusCode {
        redacted_envelope(&normalise(self)).0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, envelope) = redacted_envelope(&normalise(self));
        let mut builder = HttpResponse::build(status);
        if let Some(id) = TraceId::current() {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        builder.json(envelope)
    }
}
