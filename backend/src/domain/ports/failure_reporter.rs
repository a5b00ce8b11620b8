//! Driven port for reporting failures to operators.
//!
//! The error renderer calls the reporter whenever a failure is not safe to
//! show clients in full, so operators still see the detail that was
//! withheld.

use tracing::error;

use crate::domain::{Failure, TraceId};

/// Operator-facing sink for failures.
#[cfg_attr(test, mockall::automock)]
pub trait FailureReporter: Send + Sync {
    /// Record `failure` with all of its internal detail.
    fn report(&self, failure: &Failure);
}

/// Reporter emitting one structured `tracing` event per failure.
///
/// Tags the event with the current [`TraceId`] when one is in scope.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureReporter;

impl FailureReporter for TracingFailureReporter {
    fn report(&self, failure: &Failure) {
        let trace_id = TraceId::current().map(|id| id.to_string());
        error!(
            trace_id = trace_id.as_deref().unwrap_or("-"),
            name = failure.name().unwrap_or("-"),
            status_code = failure.status_code(),
            operational = failure.is_operational(),
            detail = failure.message().unwrap_or_default(),
            stack = failure.stack().unwrap_or_default(),
            failure = ?failure,
            "ERROR 💥"
        );
    }
}
