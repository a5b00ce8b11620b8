//! Domain ports and supporting types for the hexagonal boundary.

mod failure_reporter;
mod tour_catalogue;

#[cfg(test)]
pub use failure_reporter::MockFailureReporter;
pub use failure_reporter::{FailureReporter, TracingFailureReporter};
#[cfg(test)]
pub use tour_catalogue::MockTourCatalogue;
pub use tour_catalogue::{FixtureTourCatalogue, TourCatalogue};
