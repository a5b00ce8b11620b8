//! Driving port for reading the tour catalogue.
//!
//! Inbound adapters (HTTP handlers and rendered pages) use this port to look
//! tours up without knowing the backing store. Stores surface their own
//! failures as [`Failure`] so the error normaliser can classify them.

use async_trait::async_trait;

use crate::domain::{
    AppError, Difficulty, DistanceUnit, Failure, GeoPoint, RawFailure, Tour, TourDistance, TourId,
    WithinQuery,
};

/// Domain use-case port for catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TourCatalogue: Send + Sync {
    /// Every tour in the catalogue.
    async fn all(&self) -> Result<Vec<Tour>, Failure>;

    /// Look a tour up by identifier.
    ///
    /// A malformed identifier surfaces as a raw cast failure on `_id`; an
    /// unknown identifier as an operational 404.
    async fn by_id(&self, id: &str) -> Result<Tour, Failure>;

    /// Look a tour up by URL slug.
    async fn by_slug(&self, slug: &str) -> Result<Option<Tour>, Failure>;

    /// Tours starting inside the search radius.
    async fn within(&self, query: &WithinQuery) -> Result<Vec<Tour>, Failure>;

    /// Distance from `center` to every tour's start, nearest first.
    async fn distances(
        &self,
        center: &GeoPoint,
        unit: DistanceUnit,
    ) -> Result<Vec<TourDistance>, Failure>;
}

/// Temporary in-memory catalogue used until persistence is wired.
#[derive(Debug, Clone)]
pub struct FixtureTourCatalogue {
    tours: Vec<Tour>,
}

impl Default for FixtureTourCatalogue {
    fn default() -> Self {
        Self {
            tours: fixture_tours(),
        }
    }
}

impl FixtureTourCatalogue {
    /// Catalogue backed by the given tours.
    #[must_use]
    pub fn with_tours(tours: Vec<Tour>) -> Self {
        Self { tours }
    }
}

#[async_trait]
impl TourCatalogue for FixtureTourCatalogue {
    async fn all(&self) -> Result<Vec<Tour>, Failure> {
        Ok(self.tours.clone())
    }

    async fn by_id(&self, id: &str) -> Result<Tour, Failure> {
        let Some(id) = TourId::parse(id) else {
            return Err(RawFailure::cast("_id", id).into());
        };
        self.tours
            .iter()
            .find(|tour| tour.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("No tour found with that ID").into())
    }

    async fn by_slug(&self, slug: &str) -> Result<Option<Tour>, Failure> {
        Ok(self.tours.iter().find(|tour| tour.slug == slug).cloned())
    }

    async fn within(&self, query: &WithinQuery) -> Result<Vec<Tour>, Failure> {
        Ok(self
            .tours
            .iter()
            .filter(|tour| query.contains(&tour.start_location))
            .cloned()
            .collect())
    }

    #[expect(clippy::float_arithmetic, reason = "unit conversion is float maths")]
    async fn distances(
        &self,
        center: &GeoPoint,
        unit: DistanceUnit,
    ) -> Result<Vec<TourDistance>, Failure> {
        let mut distances: Vec<TourDistance> = self
            .tours
            .iter()
            .map(|tour| TourDistance {
                id: tour.id.clone(),
                name: tour.name.clone(),
                distance: center.distance_metres(&tour.start_location) * unit.multiplier(),
            })
            .collect();
        distances.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(distances)
    }
}

struct FixtureTour {
    id: &'static str,
    name: &'static str,
    slug: &'static str,
    summary: &'static str,
    price: f64,
    duration: u32,
    difficulty: Difficulty,
    ratings_average: f64,
    lat: f64,
    lng: f64,
}

const FIXTURE_TOURS: [FixtureTour; 4] = [
    FixtureTour {
        id: "5c88fa8cf4afda39709c2951",
        name: "The Forest Hiker",
        slug: "the-forest-hiker",
        summary: "Breathtaking hike through the Canadian Banff National Park",
        price: 397.0,
        duration: 5,
        difficulty: Difficulty::Easy,
        ratings_average: 4.8,
        lat: 51.417_611,
        lng: -116.214_531,
    },
    FixtureTour {
        id: "5c88fa8cf4afda39709c2955",
        name: "The Sea Explorer",
        slug: "the-sea-explorer",
        summary: "Exploring the jaw-dropping US east coast by foot and by boat",
        price: 497.0,
        duration: 7,
        difficulty: Difficulty::Medium,
        ratings_average: 4.8,
        lat: 25.781_842,
        lng: -80.128_473,
    },
    FixtureTour {
        id: "5c88fa8cf4afda39709c295a",
        name: "The Snow Adventurer",
        slug: "the-snow-adventurer",
        summary: "Exciting adventure in the snow with snowboarding and skiing",
        price: 997.0,
        duration: 4,
        difficulty: Difficulty::Difficult,
        ratings_average: 4.5,
        lat: 39.190_872,
        lng: -106.822_318,
    },
    FixtureTour {
        id: "5c88fa8cf4afda39709c2961",
        name: "The Park Camper",
        slug: "the-park-camper",
        summary: "Breathing in Nature in America's most spectacular National Parks",
        price: 1497.0,
        duration: 10,
        difficulty: Difficulty::Medium,
        ratings_average: 4.9,
        lat: 36.110_904,
        lng: -115.172_652,
    },
];

fn fixture_tours() -> Vec<Tour> {
    FIXTURE_TOURS
        .iter()
        .filter_map(|fixture| {
            Some(Tour {
                id: TourId::parse(fixture.id)?,
                name: fixture.name.to_owned(),
                slug: fixture.slug.to_owned(),
                summary: fixture.summary.to_owned(),
                price: fixture.price,
                duration: fixture.duration,
                difficulty: fixture.difficulty,
                ratings_average: fixture.ratings_average,
                start_location: GeoPoint {
                    lat: fixture.lat,
                    lng: fixture.lng,
                },
            })
        })
        .collect()
}
