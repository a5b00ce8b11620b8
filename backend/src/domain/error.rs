//! Operational errors raised deliberately by application logic.
//!
//! An [`AppError`] describes an expected, user-facing condition such as a
//! missing resource or a malformed request. Its message is always safe to
//! show to clients. Anything else that goes wrong is a
//! [`RawFailure`](crate::domain::RawFailure) and has to be classified before
//! it can be exposed.

use std::panic::Location;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with existing state.
    Conflict,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

impl ErrorCode {
    /// HTTP status code conventionally associated with this code.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::InternalError => 500,
        }
    }
}

/// Client-facing status label carried in every error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStatus {
    /// The client sent something the server refuses (4xx).
    Fail,
    /// The server could not complete the request.
    Error,
}

impl ErrorStatus {
    /// Derive the label from a status code: `fail` for 4xx, `error` otherwise.
    ///
    /// # Examples
    /// ```
    /// use tour_backend::domain::ErrorStatus;
    ///
    /// assert_eq!(ErrorStatus::from_status_code(404), ErrorStatus::Fail);
    /// assert_eq!(ErrorStatus::from_status_code(503), ErrorStatus::Error);
    /// ```
    #[must_use]
    pub const fn from_status_code(status_code: u16) -> Self {
        if status_code >= 400 && status_code < 500 {
            Self::Fail
        } else {
            Self::Error
        }
    }

    /// Wire representation of the label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
/// - `status` always agrees with the status code of `code`.
///
/// # Examples
/// ```
/// use tour_backend::domain::{AppError, ErrorCode, ErrorStatus};
///
/// let err = AppError::not_found("No tour found with that ID");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.status_code(), 404);
/// assert_eq!(err.status(), ErrorStatus::Fail);
/// assert!(err.is_operational());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    code: ErrorCode,
    message: String,
    stack: String,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorValidationError {
    /// The message was empty or whitespace only.
    EmptyMessage,
}

impl std::fmt::Display for AppErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for AppErrorValidationError {}

impl AppError {
    /// Create a new error, panicking if validation fails.
    ///
    /// # Panics
    /// Panics when `message` is empty once trimmed.
    #[track_caller]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    ///
    /// The caller's source location is recorded as the error's stack.
    #[track_caller]
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, AppErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(AppErrorValidationError::EmptyMessage);
        }
        let stack = format!("AppError: {message}\n    at {}", Location::caller());
        Ok(Self {
            code,
            message,
            stack,
        })
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message, safe to show to clients.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status code derived from [`AppError::code`].
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.code.status_code()
    }

    /// Status label derived from [`AppError::status_code`].
    #[must_use]
    pub fn status(&self) -> ErrorStatus {
        ErrorStatus::from_status_code(self.status_code())
    }

    /// Operational errors are always safe to expose.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        true
    }

    /// Source location at which the error was raised.
    #[must_use]
    pub fn stack(&self) -> &str {
        self.stack.as_str()
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    #[track_caller]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    #[track_caller]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    #[track_caller]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

/// Wire shape used when an operational error is dumped in full.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppErrorDto {
    code: ErrorCode,
    status_code: u16,
    status: ErrorStatus,
    is_operational: bool,
    message: String,
    stack: String,
}

impl From<&AppError> for AppErrorDto {
    fn from(value: &AppError) -> Self {
        Self {
            code: value.code,
            status_code: value.status_code(),
            status: value.status(),
            is_operational: true,
            message: value.message.clone(),
            stack: value.stack.clone(),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        AppErrorDto::from(self).serialize(serializer)
    }
}
