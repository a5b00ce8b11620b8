//! Application harness shared by the error-response suites.
//!
//! Builds the same middleware stack as the server binary around a
//! configurable catalogue and a recording operator reporter, then drives a
//! single request through it with the actix test utilities.

use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::web::Bytes;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::Value;

use tour_backend::domain::ports::{FailureReporter, FixtureTourCatalogue, TourCatalogue};
use tour_backend::domain::{
    DeploymentMode, DistanceUnit, Failure, GeoPoint, Tour, TourDistance, WithinQuery,
};
use tour_backend::inbound::http::render::ErrorRenderer;
use tour_backend::inbound::http::state::HttpState;
use tour_backend::inbound::http::templates::Templates;
use tour_backend::inbound::http::tours::{get_tour, list_tours, tour_distances, tours_within};
use tour_backend::inbound::http::views::{overview, tour_page};
use tour_backend::middleware::normalizer::not_found;
use tour_backend::{ErrorNormalizer, Trace};

/// Reporter double keeping every failure it was handed.
#[derive(Clone, Default)]
pub(crate) struct RecordingReporter {
    reports: Arc<Mutex<Vec<Failure>>>,
}

impl RecordingReporter {
    pub(crate) fn reports(&self) -> Vec<Failure> {
        self.reports.lock().expect("reporter lock").clone()
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, failure: &Failure) {
        self.reports
            .lock()
            .expect("reporter lock")
            .push(failure.clone());
    }
}

/// Catalogue double that fails every query with the same failure.
pub(crate) struct FailingCatalogue {
    failure: Failure,
}

impl FailingCatalogue {
    pub(crate) fn new(failure: impl Into<Failure>) -> Self {
        Self {
            failure: failure.into(),
        }
    }
}

#[async_trait]
impl TourCatalogue for FailingCatalogue {
    async fn all(&self) -> Result<Vec<Tour>, Failure> {
        Err(self.failure.clone())
    }

    async fn by_id(&self, _id: &str) -> Result<Tour, Failure> {
        Err(self.failure.clone())
    }

    async fn by_slug(&self, _slug: &str) -> Result<Option<Tour>, Failure> {
        Err(self.failure.clone())
    }

    async fn within(&self, _query: &WithinQuery) -> Result<Vec<Tour>, Failure> {
        Err(self.failure.clone())
    }

    async fn distances(
        &self,
        _origin: &GeoPoint,
        _unit: DistanceUnit,
    ) -> Result<Vec<TourDistance>, Failure> {
        Err(self.failure.clone())
    }
}

/// What a client observed for one request.
#[derive(Debug)]
pub(crate) struct Observed {
    pub(crate) status: u16,
    pub(crate) content_type: Option<String>,
    pub(crate) body: Bytes,
}

impl Observed {
    pub(crate) fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }

    pub(crate) fn text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("UTF-8 body")
    }
}

/// Catalogue used when a scenario does not inject a failure.
pub(crate) fn fixture_catalogue() -> Arc<dyn TourCatalogue> {
    Arc::new(FixtureTourCatalogue::default())
}

/// Send `GET path` through the full middleware stack.
pub(crate) async fn get(
    mode: DeploymentMode,
    catalogue: Arc<dyn TourCatalogue>,
    reporter: RecordingReporter,
    path: &str,
) -> Observed {
    let templates = Arc::new(Templates::new().expect("templates register"));
    let renderer = Arc::new(ErrorRenderer::new(
        mode,
        Arc::clone(&templates),
        Arc::new(reporter),
    ));
    let api = web::scope("/api/v1")
        .service(tours_within)
        .service(tour_distances)
        .service(list_tours)
        .service(get_tour);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::new(catalogue, templates)))
            .wrap(ErrorNormalizer::new(renderer))
            .wrap(Trace)
            .service(api)
            .service(overview)
            .service(tour_page)
            .default_service(web::to(not_found)),
    )
    .await;
    let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
    observe(res).await
}

async fn observe<B: MessageBody>(res: ServiceResponse<B>) -> Observed {
    let status = res.status().as_u16();
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = test::read_body(res).await;
    Observed {
        status,
        content_type,
        body,
    }
}
