//! Tour booking backend library.
//!
//! Every failure raised while serving a request, whether an operational
//! [`domain::AppError`] or a raw infrastructure [`domain::RawFailure`], is
//! normalised by the [`ErrorNormalizer`] middleware into a response whose
//! detail depends on the configured [`domain::DeploymentMode`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::{ErrorNormalizer, Trace};
