//! Tour read endpoints.
//!
//! ```text
//! GET /api/v1/tours
//! GET /api/v1/tours/{id}
//! GET /api/v1/tours/tours-within/{distance}/center/{latlng}/unit/{unit}
//! GET /api/v1/tours/distances/{latlng}/unit/{unit}
//! ```

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DistanceUnit, GeoPoint, Tour, TourDistance, WithinQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::render::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

const SUCCESS: &str = "success";

/// Tours wrapped in the collection envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct TourListData {
    /// Matching tours.
    pub data: Vec<Tour>,
}

/// Response payload for tour collections.
#[derive(Debug, Serialize, ToSchema)]
pub struct TourListResponse {
    /// Always `success`.
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    /// Number of tours returned.
    pub results: usize,
    /// Wrapped tours.
    pub data: TourListData,
}

impl From<Vec<Tour>> for TourListResponse {
    fn from(tours: Vec<Tour>) -> Self {
        Self {
            status: SUCCESS,
            results: tours.len(),
            data: TourListData { data: tours },
        }
    }
}

/// One tour wrapped in the document envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct TourData {
    /// The tour.
    pub data: Tour,
}

/// Response payload for a single tour.
#[derive(Debug, Serialize, ToSchema)]
pub struct TourResponse {
    /// Always `success`.
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    /// Wrapped tour.
    pub data: TourData,
}

/// Distances wrapped in the collection envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct TourDistancesData {
    /// Distances, nearest first.
    pub data: Vec<TourDistance>,
}

/// Response payload for the distances query.
#[derive(Debug, Serialize, ToSchema)]
pub struct TourDistancesResponse {
    /// Always `success`.
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    /// Wrapped distances.
    pub data: TourDistancesData,
}

/// List every tour.
#[utoipa::path(
    get,
    path = "/api/v1/tours",
    responses(
        (status = 200, description = "All tours", body = TourListResponse),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["tours"],
    operation_id = "listTours"
)]
#[get("/tours")]
pub async fn list_tours(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let tours = state.tours.all().await?;
    Ok(HttpResponse::Ok().json(TourListResponse::from(tours)))
}

/// Fetch one tour by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/tours/{id}",
    params(("id" = String, Path, description = "24 character hexadecimal tour id")),
    responses(
        (status = 200, description = "The tour", body = TourResponse),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelope),
        (status = 404, description = "No tour with that identifier", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["tours"],
    operation_id = "getTour"
)]
#[get("/tours/{id}")]
pub async fn get_tour(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let tour = state.tours.by_id(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TourResponse {
        status: SUCCESS,
        data: TourData { data: tour },
    }))
}

/// Tours starting within a radius of a point.
#[utoipa::path(
    get,
    path = "/api/v1/tours/tours-within/{distance}/center/{latlng}/unit/{unit}",
    params(
        ("distance" = f64, Path, description = "Search radius in `unit`"),
        ("latlng" = String, Path, description = "Centre as `lat,lng`", example = "34.111745,-118.113491"),
        ("unit" = String, Path, description = "`mi` for miles, anything else for kilometres")
    ),
    responses(
        (status = 200, description = "Tours inside the radius", body = TourListResponse),
        (status = 400, description = "Malformed centre or distance", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["tours"],
    operation_id = "getToursWithin"
)]
#[get("/tours/tours-within/{distance}/center/{latlng}/unit/{unit}")]
pub async fn tours_within(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult<HttpResponse> {
    let (distance, latlng, unit) = path.into_inner();
    let query = WithinQuery::parse(&distance, &latlng, &unit)?;
    let tours = state.tours.within(&query).await?;
    Ok(HttpResponse::Ok().json(TourListResponse::from(tours)))
}

/// Distance from a point to every tour's start.
#[utoipa::path(
    get,
    path = "/api/v1/tours/distances/{latlng}/unit/{unit}",
    params(
        ("latlng" = String, Path, description = "Origin as `lat,lng`", example = "34.111745,-118.113491"),
        ("unit" = String, Path, description = "`mi` for miles, anything else for kilometres")
    ),
    responses(
        (status = 200, description = "Distances, nearest first", body = TourDistancesResponse),
        (status = 400, description = "Malformed origin", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["tours"],
    operation_id = "getTourDistances"
)]
#[get("/tours/distances/{latlng}/unit/{unit}")]
pub async fn tour_distances(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (latlng, unit) = path.into_inner();
    let center = GeoPoint::parse(&latlng)?;
    let distances = state
        .tours
        .distances(&center, DistanceUnit::from_segment(&unit))
        .await?;
    Ok(HttpResponse::Ok().json(TourDistancesResponse {
        status: SUCCESS,
        data: TourDistancesData { data: distances },
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use rstest::{fixture, rstest};
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{FixtureTourCatalogue, MockTourCatalogue, TourCatalogue};
    use crate::domain::{Failure, RawFailure};
    use crate::inbound::http::templates::Templates;

    fn state_with(tours: Arc<dyn TourCatalogue>) -> web::Data<HttpState> {
        let templates = Arc::new(Templates::new().expect("templates"));
        web::Data::new(HttpState::new(tours, templates))
    }

    #[fixture]
    fn fixture_state() -> web::Data<HttpState> {
        state_with(Arc::new(FixtureTourCatalogue::default()))
    }

    async fn get_json(state: web::Data<HttpState>, uri: &str) -> (u16, Value) {
        let app = test::init_service(
            App::new().app_data(state).service(
                web::scope("/api/v1")
                    .service(list_tours)
                    .service(tours_within)
                    .service(tour_distances)
                    .service(get_tour),
            ),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status().as_u16();
        let bytes = test::read_body(res).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn lists_tours_with_a_result_count(fixture_state: web::Data<HttpState>) {
        let (status, body) = get_json(fixture_state, "/api/v1/tours").await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "success");
        assert_eq!(body["results"], 4);
        assert_eq!(body["data"]["data"].as_array().map(Vec::len), Some(4));
    }

    #[rstest]
    #[actix_web::test]
    async fn tours_within_filters_by_radius(fixture_state: web::Data<HttpState>) {
        let (status, body) = get_json(
            fixture_state,
            "/api/v1/tours/tours-within/400/center/34.111745,-118.113491/unit/mi",
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["results"], 1);
        assert_eq!(body["data"]["data"][0]["name"], "The Park Camper");
    }

    #[rstest]
    #[actix_web::test]
    async fn distances_are_reported_in_the_requested_unit(fixture_state: web::Data<HttpState>) {
        let (status, body) = get_json(
            fixture_state,
            "/api/v1/tours/distances/34.111745,-118.113491/unit/km",
        )
        .await;
        assert_eq!(status, 200);
        let nearest = body["data"]["data"][0]["distance"]
            .as_f64()
            .expect("distance");
        assert!((300.0..400.0).contains(&nearest), "unexpected distance {nearest}");
    }

    #[rstest]
    #[actix_web::test]
    async fn get_tour_returns_the_document(fixture_state: web::Data<HttpState>) {
        let (status, body) = get_json(fixture_state, "/api/v1/tours/5c88fa8cf4afda39709c2951").await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["data"]["slug"], "the-forest-hiker");
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_centres_surface_operational_errors(fixture_state: web::Data<HttpState>) {
        let (status, _) = get_json(
            fixture_state,
            "/api/v1/tours/tours-within/400/center/34.111745/unit/mi",
        )
        .await;
        assert_eq!(status, 400);
    }

    #[rstest]
    #[actix_web::test]
    async fn port_failures_propagate_to_the_error_pipeline() {
        let mut catalogue = MockTourCatalogue::new();
        catalogue
            .expect_all()
            .times(1)
            .returning(|| Err(Failure::from(RawFailure::unexpected("ECONNRESET"))));

        let (status, _) = get_json(state_with(Arc::new(catalogue)), "/api/v1/tours").await;

        assert_eq!(status, 500);
    }
}
