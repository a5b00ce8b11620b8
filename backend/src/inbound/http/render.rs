//! Rendering failures into client responses.
//!
//! [`ErrorRenderer::render`] is a pure decision over the deployment mode, the
//! request target and the failure. It returns an [`ErrorResponse`] value;
//! turning that into an [`HttpResponse`] is the only framework-specific step.
//!
//! ```text
//! development (defaults applied, no classification)
//!   Api  -> JSON { status, error, message, stack }
//!   Page -> report; error page with the message
//! production (classified)
//!   Api,  operational     -> JSON { status, message }
//!   Api,  non-operational -> report; JSON { status: "error", message: "Something went wrong" }, 500
//!   Page, operational     -> error page with the message
//!   Page, non-operational -> report; error page with "Please try again later."
//! ```

use std::sync::Arc;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::domain::ports::FailureReporter;
use crate::domain::{DeploymentMode, ErrorStatus, Failure, NormalizedError, normalise};

use super::templates::{Templates, template_failure};

/// Title of the rendered error page.
pub const ERROR_PAGE_TITLE: &str = "Something went wrong!";
/// Message replacing non-operational failures on the API surface.
pub const GENERIC_API_MESSAGE: &str = "Something went wrong";
/// Message replacing non-operational failures on rendered pages.
pub const GENERIC_PAGE_MESSAGE: &str = "Please try again later.";

const API_PREFIX: &str = "/api";

/// Which client surface a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTarget {
    /// JSON API consumers.
    Api,
    /// Browsers requesting rendered pages.
    Page,
}

impl RequestTarget {
    /// Classify a request path: anything starting with `/api` is the API.
    ///
    /// # Examples
    /// ```
    /// use tour_backend::inbound::http::render::RequestTarget;
    ///
    /// assert_eq!(RequestTarget::from_path("/api/v1/tours"), RequestTarget::Api);
    /// assert_eq!(RequestTarget::from_path("/tour/the-sea-explorer"), RequestTarget::Page);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        if path.starts_with(API_PREFIX) {
            Self::Api
        } else {
            Self::Page
        }
    }
}

/// Body of a rendered error.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// JSON envelope for API clients.
    Json(Value),
    /// Rendered error page.
    Html(String),
    /// Plain-text fallback used when the error page cannot be rendered.
    Text(String),
}

/// Status and body chosen for a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// HTTP status to respond with.
    pub status: StatusCode,
    /// Response body.
    pub body: ErrorBody,
}

impl ErrorResponse {
    /// Build the framework response.
    #[must_use]
    pub fn into_http_response(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        match self.body {
            ErrorBody::Json(value) => builder.json(value),
            ErrorBody::Html(html) => builder.content_type(ContentType::html()).body(html),
            ErrorBody::Text(text) => builder.content_type(ContentType::plaintext()).body(text),
        }
    }
}

/// Error envelope returned to API clients in production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    /// `fail` for client errors, `error` otherwise.
    #[schema(value_type = String, example = "fail")]
    pub status: ErrorStatus,
    /// Client-safe message.
    #[schema(example = "Invalid _id: wwwww.")]
    pub message: String,
}

/// Map a normalised error to a valid HTTP status, falling back to 500.
#[must_use]
pub fn status_for(status_code: u16) -> StatusCode {
    StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Production API status and envelope for a normalised error.
///
/// Operational errors keep their status and message; everything else
/// collapses to a generic 500.
#[must_use]
pub fn redacted_envelope(shaped: &NormalizedError) -> (StatusCode, ErrorEnvelope) {
    if shaped.is_operational {
        (
            status_for(shaped.status_code),
            ErrorEnvelope {
                status: shaped.status,
                message: shaped.message.clone(),
            },
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorEnvelope {
                status: ErrorStatus::Error,
                message: GENERIC_API_MESSAGE.to_owned(),
            },
        )
    }
}

/// Decides and renders the response for every failure.
///
/// Built once at start-up and shared read-only between workers.
pub struct ErrorRenderer {
    mode: DeploymentMode,
    templates: Arc<Templates>,
    reporter: Arc<dyn FailureReporter>,
}

impl ErrorRenderer {
    /// Renderer for `mode` using the given page templates and operator
    /// reporter.
    #[must_use]
    pub fn new(
        mode: DeploymentMode,
        templates: Arc<Templates>,
        reporter: Arc<dyn FailureReporter>,
    ) -> Self {
        Self {
            mode,
            templates,
            reporter,
        }
    }

    /// Deployment mode fixed at construction.
    #[must_use]
    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    /// Choose the response for `failure` on `target`.
    ///
    /// Never fails: template errors are reported and replaced by a plain-text
    /// body carrying the same message.
    #[must_use]
    pub fn render(&self, failure: &Failure, target: RequestTarget) -> ErrorResponse {
        match self.mode {
            DeploymentMode::Development => self.render_development(failure, target),
            DeploymentMode::Production => self.render_production(failure, target),
        }
    }

    fn render_development(&self, failure: &Failure, target: RequestTarget) -> ErrorResponse {
        let shaped = NormalizedError::passthrough(failure);
        let status = status_for(shaped.status_code);
        match target {
            RequestTarget::Api => {
                let mut body = json!({
                    "status": shaped.status,
                    "error": failure,
                    "message": shaped.message,
                });
                if let (Some(stack), Value::Object(fields)) = (shaped.stack, &mut body) {
                    fields.insert("stack".to_owned(), Value::String(stack));
                }
                ErrorResponse {
                    status,
                    body: ErrorBody::Json(body),
                }
            }
            RequestTarget::Page => {
                self.reporter.report(failure);
                self.page(status, &shaped.message)
            }
        }
    }

    fn render_production(&self, failure: &Failure, target: RequestTarget) -> ErrorResponse {
        let shaped = normalise(failure);
        if !shaped.is_operational {
            self.reporter.report(failure);
        }
        match target {
            RequestTarget::Api => {
                let (status, envelope) = redacted_envelope(&shaped);
                ErrorResponse {
                    status,
                    body: ErrorBody::Json(json!(envelope)),
                }
            }
            RequestTarget::Page if shaped.is_operational => {
                self.page(status_for(shaped.status_code), &shaped.message)
            }
            RequestTarget::Page => self.page(status_for(shaped.status_code), GENERIC_PAGE_MESSAGE),
        }
    }

    fn page(&self, status: StatusCode, msg: &str) -> ErrorResponse {
        let body = match self.templates.render_error(ERROR_PAGE_TITLE, msg) {
            Ok(html) => ErrorBody::Html(html),
            Err(err) => {
                self.reporter.report(&template_failure(&err));
                ErrorBody::Text(msg.to_owned())
            }
        };
        ErrorResponse { status, body }
    }
}
