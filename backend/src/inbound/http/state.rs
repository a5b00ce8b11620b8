//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::TourCatalogue;

use super::templates::Templates;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Catalogue read port.
    pub tours: Arc<dyn TourCatalogue>,
    /// Page templates.
    pub templates: Arc<Templates>,
}

impl HttpState {
    /// Bundle the catalogue port and page templates.
    #[must_use]
    pub fn new(tours: Arc<dyn TourCatalogue>, templates: Arc<Templates>) -> Self {
        Self { tours, templates }
    }
}
