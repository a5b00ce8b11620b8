//! Geospatial query parameters for tour search.
//!
//! Parses the `lat,lng` centre, distance and unit path segments used by the
//! tour search endpoints and converts them into the radian radius and
//! distance multiplier a geospatial store expects.

use serde::Serialize;
use utoipa::ToSchema;

use super::AppError;

/// Earth radius in miles, used to turn a distance into radians.
pub const EARTH_RADIUS_MILES: f64 = 3963.2;
/// Earth radius in kilometres, used to turn a distance into radians.
pub const EARTH_RADIUS_KILOMETRES: f64 = 6378.1;
/// Earth radius in metres, the base unit of computed distances.
pub const EARTH_RADIUS_METRES: f64 = 6_378_100.0;

const METRES_TO_MILES: f64 = 0.000_621_371;
const METRES_TO_KILOMETRES: f64 = 0.001;
const CENTRE_FORMAT_MESSAGE: &str = "Please provide latitude and longitude in the format lat,lng.";

/// Unit in which distances are supplied and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Statute miles (`mi`).
    Miles,
    /// Kilometres (any other unit segment).
    Kilometres,
}

impl DistanceUnit {
    /// Parse a unit path segment: `mi` selects miles, anything else
    /// kilometres.
    #[must_use]
    pub fn from_segment(segment: &str) -> Self {
        if segment == "mi" {
            Self::Miles
        } else {
            Self::Kilometres
        }
    }

    /// Earth radius expressed in this unit.
    #[must_use]
    pub const fn earth_radius(self) -> f64 {
        match self {
            Self::Miles => EARTH_RADIUS_MILES,
            Self::Kilometres => EARTH_RADIUS_KILOMETRES,
        }
    }

    /// Factor converting metres into this unit.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Miles => METRES_TO_MILES,
            Self::Kilometres => METRES_TO_KILOMETRES,
        }
    }
}

/// A point on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Parse a `lat,lng` path segment.
    ///
    /// # Errors
    /// Returns an operational 400 error when either part is missing or not a
    /// finite number.
    ///
    /// # Examples
    /// ```
    /// use tour_backend::domain::GeoPoint;
    ///
    /// let point = GeoPoint::parse("34.111745,-118.113491").expect("valid centre");
    /// assert_eq!(point.lng, -118.113491);
    /// assert!(GeoPoint::parse("34.111745").is_err());
    /// ```
    pub fn parse(segment: &str) -> Result<Self, AppError> {
        let mut parts = segment.split(',');
        let lat = parts.next().and_then(parse_coordinate);
        let lng = parts.next().and_then(parse_coordinate);
        match (lat, lng) {
            (Some(lat), Some(lng)) => Ok(Self { lat, lng }),
            _ => Err(AppError::invalid_request(CENTRE_FORMAT_MESSAGE)),
        }
    }

    /// Great-circle distance to `other` in metres (haversine formula).
    #[expect(clippy::float_arithmetic, reason = "haversine is float maths")]
    #[must_use]
    pub fn distance_metres(&self, other: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METRES * a.sqrt().asin()
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// "Tours within `distance` of `center`" search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithinQuery {
    /// Search radius in `unit`.
    pub distance: f64,
    /// Search centre.
    pub center: GeoPoint,
    /// Unit of `distance`.
    pub unit: DistanceUnit,
}

impl WithinQuery {
    /// Parse the distance, centre and unit path segments.
    ///
    /// # Errors
    /// Returns an operational 400 error when the centre is malformed or the
    /// distance is not a finite, non-negative number.
    pub fn parse(distance: &str, center: &str, unit: &str) -> Result<Self, AppError> {
        let distance = distance
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| AppError::invalid_request("Please provide a non-negative distance."))?;
        Ok(Self {
            distance,
            center: GeoPoint::parse(center)?,
            unit: DistanceUnit::from_segment(unit),
        })
    }

    /// Radius in radians, as used by spherical `$centerSphere` style queries.
    ///
    /// # Examples
    /// ```
    /// use tour_backend::domain::WithinQuery;
    ///
    /// let query = WithinQuery::parse("3963.2", "0,0", "mi").expect("valid query");
    /// assert!((query.radius_radians() - 1.0).abs() < f64::EPSILON);
    /// ```
    #[expect(clippy::float_arithmetic, reason = "radius conversion is float maths")]
    #[must_use]
    pub fn radius_radians(&self) -> f64 {
        self.distance / self.unit.earth_radius()
    }

    /// Whether `point` lies inside the search radius.
    #[expect(clippy::float_arithmetic, reason = "radius conversion is float maths")]
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.center.distance_metres(point) <= self.radius_radians() * EARTH_RADIUS_METRES
    }
}
