//! Domain primitives and the failure model.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP adapters
//! and the error pipeline. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - AppError: operational error raised on
//!   purpose, safe to show clients.
//! - RawFailure / Failure: infrastructure failures and the union handlers
//!   return.
//! - classify / normalise: reduce any failure to a `NormalizedError`.
//! - DeploymentMode: development or production verbosity.
//! - Tour, GeoPoint, WithinQuery: catalogue entities and search parameters.

pub mod classify;
pub mod deployment_mode;
pub mod error;
pub mod failure;
pub mod geo;
pub mod ports;
pub mod tour;
pub mod trace_id;

pub use self::classify::{FailureKind, NormalizedError, classify, normalise};
pub use self::deployment_mode::{DeploymentMode, UnknownDeploymentMode};
pub use self::error::{AppError, AppErrorValidationError, ErrorCode, ErrorStatus};
pub use self::failure::{Failure, RawFailure};
pub use self::geo::{DistanceUnit, GeoPoint, WithinQuery};
pub use self::tour::{Difficulty, Tour, TourDistance, TourId};
pub use self::trace_id::TraceId;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
