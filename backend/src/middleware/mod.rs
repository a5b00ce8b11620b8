//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns:
//! trace correlation and normalising every failure into a client response.

pub mod normalizer;
pub mod trace;

pub use normalizer::ErrorNormalizer;
pub use trace::Trace;
