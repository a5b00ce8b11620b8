//! Classification of raw failures into client-safe errors.
//!
//! [`classify`] inspects a fixed set of [`RawFailure`] fields and names the
//! failure as one of a closed set of [`FailureKind`]s. [`normalise`] then
//! builds a fresh [`NormalizedError`] from any [`Failure`]; recognised raw
//! failures are upgraded to operational errors with a safe message, anything
//! else keeps its unknown status.
//!
//! Patterns are checked in this order and the first match wins:
//!
//! | Signal | Kind | Status |
//! |---|---|---|
//! | `path` plus a truthy `value` | [`FailureKind::Cast`] | 400 |
//! | `code == 11000` | [`FailureKind::DuplicateKey`] | 400 |
//! | `_message` is a validation marker | [`FailureKind::Validation`] | 400 |
//! | `name == "JsonWebTokenError"` | [`FailureKind::InvalidToken`] | 401 |
//! | `name == "TokenExpiredError"` | [`FailureKind::ExpiredToken`] | 401 |
//! | anything else | [`FailureKind::Unknown`] | raw, default 500 |

use serde::Serialize;
use serde_json::Value;

use super::{ErrorStatus, Failure, RawFailure};

/// Driver error code reported for unique-index violations.
pub const DUPLICATE_KEY_CODE: i64 = 11000;

/// Summaries the data layer emits when schema validation fails.
pub const VALIDATION_MARKERS: [&str; 4] = [
    "Tour validation failed",
    "User validation failed",
    "Review validation failed",
    "Booking validation failed",
];

/// Failure name emitted for tokens with a bad signature or shape.
pub const INVALID_TOKEN_NAME: &str = "JsonWebTokenError";

/// Failure name emitted for tokens past their expiry.
pub const EXPIRED_TOKEN_NAME: &str = "TokenExpiredError";

const DEFAULT_STATUS_CODE: u16 = 500;
const RECOGNISED_CLIENT_STATUS: u16 = 400;
const RECOGNISED_AUTH_STATUS: u16 = 401;

/// Recognised shape of a raw failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// A malformed identifier or value in a query or update.
    Cast {
        /// Offending field.
        path: String,
        /// Offending value, rendered for display.
        value: String,
    },
    /// A unique-constraint violation.
    DuplicateKey {
        /// The conflicting value.
        value: String,
    },
    /// Schema validation rejected the document.
    Validation {
        /// One message per offending field, in reporting order.
        messages: Vec<String>,
    },
    /// The authentication token was tampered with or malformed.
    InvalidToken,
    /// The authentication token has expired.
    ExpiredToken,
    /// Nothing recognisable; treat as a programming or infrastructure error.
    Unknown,
}

impl FailureKind {
    /// Whether the kind maps to a client-safe operational error.
    #[must_use]
    pub fn is_recognised(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Client-safe message for recognised kinds.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Cast { path, value } => Some(format!("Invalid {path}: {value}.")),
            Self::DuplicateKey { value } => Some(format!(
                "Duplicate field value: {value}. Please use another value!"
            )),
            Self::Validation { messages } => {
                Some(format!("Invalid input data. {}", messages.join(". ")))
            }
            Self::InvalidToken => Some("Invalid token. Please log in again!".to_owned()),
            Self::ExpiredToken => Some("Your token has expired! Please log in again.".to_owned()),
            Self::Unknown => None,
        }
    }

    /// Status code for recognised kinds.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Cast { .. } | Self::DuplicateKey { .. } | Self::Validation { .. } => {
                Some(RECOGNISED_CLIENT_STATUS)
            }
            Self::InvalidToken | Self::ExpiredToken => Some(RECOGNISED_AUTH_STATUS),
            Self::Unknown => None,
        }
    }
}

/// Name the shape of a raw failure.
///
/// Pure: the same input always yields the same kind and nothing is mutated.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use tour_backend::domain::{FailureKind, RawFailure, classify};
///
/// let raw = RawFailure::cast("_id", "wwwww");
/// assert_eq!(
///     classify(&raw),
///     FailureKind::Cast { path: "_id".into(), value: "wwwww".into() }
/// );
/// assert_eq!(classify(&RawFailure::unexpected("ECONNRESET")), FailureKind::Unknown);
/// ```
#[must_use]
pub fn classify(raw: &RawFailure) -> FailureKind {
    if let Some(kind) = cast_kind(raw) {
        return kind;
    }
    if raw.code == Some(DUPLICATE_KEY_CODE) {
        return FailureKind::DuplicateKey {
            value: duplicate_value(raw),
        };
    }
    if raw
        .validation_message
        .as_deref()
        .is_some_and(|marker| VALIDATION_MARKERS.contains(&marker))
    {
        return FailureKind::Validation {
            messages: validation_messages(raw),
        };
    }
    match raw.name.as_deref() {
        Some(INVALID_TOKEN_NAME) => FailureKind::InvalidToken,
        Some(EXPIRED_TOKEN_NAME) => FailureKind::ExpiredToken,
        _ => FailureKind::Unknown,
    }
}

fn cast_kind(raw: &RawFailure) -> Option<FailureKind> {
    let path = raw.path.as_ref()?;
    let value = raw.value.as_ref().filter(|value| is_truthy(value))?;
    Some(FailureKind::Cast {
        path: path.clone(),
        value: display_value(value),
    })
}

fn duplicate_value(raw: &RawFailure) -> String {
    let Some(key_value) = raw.key_value.as_ref() else {
        return "unknown".to_owned();
    };
    key_value
        .get("name")
        .or_else(|| key_value.values().next())
        .map_or_else(|| "unknown".to_owned(), display_value)
}

fn validation_messages(raw: &RawFailure) -> Vec<String> {
    raw.errors
        .iter()
        .flatten()
        .map(|(field, detail)| {
            detail
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| detail.as_str())
                .map_or_else(|| format!("{field} is invalid"), str::to_owned)
        })
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Client-facing shape every failure is reduced to before rendering.
///
/// Built fresh from a [`Failure`]; the input is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    /// HTTP status code to respond with.
    pub status_code: u16,
    /// `fail` or `error`.
    pub status: ErrorStatus,
    /// Message; only safe to expose when `is_operational` is true.
    pub message: String,
    /// Whether the message is safe for clients.
    pub is_operational: bool,
    /// Stack trace carried over from the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl NormalizedError {
    /// Apply defaults without classifying: status code 500 and status
    /// `error` when the failure did not supply them.
    ///
    /// # Examples
    /// ```
    /// use tour_backend::domain::{ErrorStatus, Failure, NormalizedError, RawFailure};
    ///
    /// let failure = Failure::from(RawFailure::cast("_id", "abc"));
    /// let shaped = NormalizedError::passthrough(&failure);
    /// assert_eq!(shaped.status_code, 500);
    /// assert_eq!(shaped.status, ErrorStatus::Error);
    /// assert!(!shaped.is_operational);
    /// ```
    #[must_use]
    pub fn passthrough(failure: &Failure) -> Self {
        match failure {
            Failure::Operational(err) => Self {
                status_code: err.status_code(),
                status: err.status(),
                message: err.message().to_owned(),
                is_operational: true,
                stack: Some(err.stack().to_owned()),
            },
            Failure::Raw(raw) => Self {
                status_code: raw.status_code.unwrap_or(DEFAULT_STATUS_CODE),
                status: raw_status(raw),
                message: raw.message.clone().unwrap_or_default(),
                is_operational: false,
                stack: raw.stack.clone(),
            },
        }
    }
}

fn raw_status(raw: &RawFailure) -> ErrorStatus {
    match raw.status.as_deref() {
        Some("fail") => ErrorStatus::Fail,
        _ => ErrorStatus::Error,
    }
}

/// Classify a failure and build its client-facing shape.
///
/// Operational errors pass through with their own fields. Raw failures that
/// match a known pattern become operational with a safe message and keep the
/// raw stack; unmatched raw failures keep their message and stay
/// non-operational.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use tour_backend::domain::{ErrorStatus, Failure, RawFailure, normalise};
///
/// let mut key_value = serde_json::Map::new();
/// key_value.insert("name".into(), json!("Paris Getaway"));
/// let failure = Failure::from(RawFailure::duplicate_key(key_value));
///
/// let shaped = normalise(&failure);
/// assert_eq!(shaped.status_code, 400);
/// assert_eq!(shaped.status, ErrorStatus::Fail);
/// assert_eq!(
///     shaped.message,
///     "Duplicate field value: Paris Getaway. Please use another value!"
/// );
/// ```
#[must_use]
pub fn normalise(failure: &Failure) -> NormalizedError {
    let Failure::Raw(raw) = failure else {
        return NormalizedError::passthrough(failure);
    };
    let kind = classify(raw);
    match (kind.status_code(), kind.message()) {
        (Some(status_code), Some(message)) => NormalizedError {
            status_code,
            status: ErrorStatus::from_status_code(status_code),
            message,
            is_operational: true,
            stack: raw.stack.clone(),
        },
        _ => NormalizedError::passthrough(failure),
    }
}
