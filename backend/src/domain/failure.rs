//! Failures that reach the edge of the request pipeline.
//!
//! Handlers and ports return [`Failure`]: either an operational [`AppError`]
//! raised on purpose, or a [`RawFailure`] describing whatever went wrong in
//! the infrastructure underneath. Raw failures keep the loose shape of the
//! data layer payloads they come from so adapters can hand them over
//! verbatim; the classifier decides later whether any of it is safe to show.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AppError;

/// Failure payload surfaced by infrastructure (data access, token checks, the
/// HTTP framework itself).
///
/// Every field is optional. Field names follow the data layer's JSON
/// conventions so payloads deserialise without translation.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use tour_backend::domain::RawFailure;
///
/// let raw: RawFailure = serde_json::from_value(json!({
///     "code": 11000,
///     "keyValue": { "name": "Paris Getaway" }
/// }))
/// .expect("valid payload");
/// assert_eq!(raw.code, Some(11000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFailure {
    /// Library-specific failure name, e.g. `CastError` or `TokenExpiredError`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Internal message; never exposed in production.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// HTTP status code suggested by the raiser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Status label suggested by the raiser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Stack trace captured where the failure originated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Field that failed to cast, e.g. `_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Value that failed to cast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Numeric driver error code, e.g. `11000` for duplicate keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Conflicting key/value pairs of a duplicate-key violation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_value: Option<Map<String, Value>>,
    /// Summary marker of a schema validation failure, e.g.
    /// `Tour validation failed`.
    #[serde(
        rename = "_message",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub validation_message: Option<String>,
    /// Per-field validation details keyed by field name, in the order the data
    /// layer reported them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Map<String, Value>>,
}

impl RawFailure {
    /// Unexpected failure carrying only a message.
    ///
    /// # Examples
    /// ```
    /// use tour_backend::domain::RawFailure;
    ///
    /// let raw = RawFailure::unexpected("ECONNRESET");
    /// assert_eq!(raw.message.as_deref(), Some("ECONNRESET"));
    /// ```
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// A value that could not be cast to the type of `path`.
    pub fn cast(path: impl Into<String>, value: impl Into<Value>) -> Self {
        let path = path.into();
        let value = value.into();
        Self {
            name: Some("CastError".to_owned()),
            message: Some(format!("Cast failed for value {value} at path \"{path}\"")),
            path: Some(path),
            value: Some(value),
            ..Self::default()
        }
    }

    /// A unique index rejected the write.
    pub fn duplicate_key(key_value: Map<String, Value>) -> Self {
        Self {
            name: Some("MongoServerError".to_owned()),
            message: Some("E11000 duplicate key error".to_owned()),
            code: Some(super::classify::DUPLICATE_KEY_CODE),
            key_value: Some(key_value),
            ..Self::default()
        }
    }

    /// Schema validation rejected a document.
    ///
    /// `marker` is the data layer's summary, e.g. `Tour validation failed`;
    /// `errors` maps each offending field to its detail object.
    pub fn validation(marker: impl Into<String>, errors: Map<String, Value>) -> Self {
        let marker = marker.into();
        Self {
            name: Some("ValidationError".to_owned()),
            message: Some(marker.clone()),
            validation_message: Some(marker),
            errors: Some(errors),
            ..Self::default()
        }
    }

    /// A token-verification library failure identified by its `name`.
    pub fn token(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Attach the status code suggested by the raiser.
    #[must_use]
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Attach the stack trace captured at the origin.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

impl std::fmt::Display for RawFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.name, &self.message) {
            (Some(name), Some(message)) => write!(f, "{name}: {message}"),
            (None, Some(message)) => f.write_str(message),
            (Some(name), None) => f.write_str(name),
            (None, None) => f.write_str("unknown failure"),
        }
    }
}

impl std::error::Error for RawFailure {}

/// Any failure a handler can return.
///
/// Serialises untagged: an operational error dumps its own fields, a raw
/// failure dumps the payload it arrived with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Failure {
    /// Raised on purpose by application logic.
    Operational(AppError),
    /// Surfaced by infrastructure; must be classified before exposure.
    Raw(RawFailure),
}

impl Failure {
    /// Whether the failure was raised on purpose by application logic.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Operational(_))
    }

    /// Best available internal message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Operational(err) => Some(err.message()),
            Self::Raw(raw) => raw.message.as_deref(),
        }
    }

    /// Stack trace, if one was captured.
    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::Operational(err) => Some(err.stack()),
            Self::Raw(raw) => raw.stack.as_deref(),
        }
    }

    /// Status code supplied by the raiser, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Operational(err) => Some(err.status_code()),
            Self::Raw(raw) => raw.status_code,
        }
    }

    /// Library-specific failure name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Operational(_) => Some("AppError"),
            Self::Raw(raw) => raw.name.as_deref(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operational(err) => err.fmt(f),
            Self::Raw(raw) => raw.fmt(f),
        }
    }
}

impl std::error::Error for Failure {}

impl From<AppError> for Failure {
    fn from(value: AppError) -> Self {
        Self::Operational(value)
    }
}

impl From<RawFailure> for Failure {
    fn from(value: RawFailure) -> Self {
        Self::Raw(value)
    }
}
