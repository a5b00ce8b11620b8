//! Tour summaries served by the catalogue.

use serde::Serialize;
use utoipa::ToSchema;

use super::GeoPoint;

const OBJECT_ID_LEN: usize = 24;

/// Catalogue identifier: a 24 character hexadecimal object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "5c88fa8cf4afda39709c2955")]
pub struct TourId(String);

impl TourId {
    /// Validate and wrap an identifier.
    ///
    /// Returns `None` when `raw` is not a 24 character hexadecimal string.
    ///
    /// # Examples
    /// ```
    /// use tour_backend::domain::TourId;
    ///
    /// assert!(TourId::parse("5c88fa8cf4afda39709c2955").is_some());
    /// assert!(TourId::parse("wwwww").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == OBJECT_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit());
        valid.then(|| Self(raw.to_ascii_lowercase()))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for TourId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How demanding a tour is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Suitable for everyone.
    Easy,
    /// Requires reasonable fitness.
    Medium,
    /// Only for experienced hikers.
    Difficult,
}

/// Public summary of a tour.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    /// Catalogue identifier.
    pub id: TourId,
    /// Display name.
    #[schema(example = "The Forest Hiker")]
    pub name: String,
    /// URL slug derived from the name.
    #[schema(example = "the-forest-hiker")]
    pub slug: String,
    /// One-line teaser.
    pub summary: String,
    /// Price in US dollars.
    pub price: f64,
    /// Tour length in days.
    pub duration: u32,
    /// Demand on participants.
    pub difficulty: Difficulty,
    /// Average review rating.
    pub ratings_average: f64,
    /// Where the tour starts.
    pub start_location: GeoPoint,
}

/// Distance from a search centre to a tour's start.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourDistance {
    /// Catalogue identifier.
    pub id: TourId,
    /// Display name.
    pub name: String,
    /// Distance in the requested unit.
    pub distance: f64,
}
