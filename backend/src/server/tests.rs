//! Tests for the application wiring: route order, middleware order and
//! fallback handling.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::Value;

use tour_backend::domain::{DeploymentMode, TRACE_ID_HEADER};

use super::*;

fn deps(mode: DeploymentMode) -> AppDependencies {
    let templates = Arc::new(Templates::new().expect("templates register"));
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(HttpState::new(
            Arc::new(FixtureTourCatalogue::default()),
            Arc::clone(&templates),
        )),
        renderer: Arc::new(ErrorRenderer::new(
            mode,
            templates,
            Arc::new(TracingFailureReporter),
        )),
    }
}

#[rstest]
#[case("/api/v1/tours/tours-within/400/center/34.111745,-118.113491/unit/mi")]
#[case("/api/v1/tours/distances/34.111745,-118.113491/unit/km")]
#[actix_web::test]
async fn geo_routes_take_precedence_over_tour_ids(#[case] uri: &str) {
    let app = test::init_service(build_app(deps(DeploymentMode::Production))).await;
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "success");
}

#[actix_web::test]
async fn unmatched_routes_are_normalised_and_traced() {
    let app = test::init_service(build_app(deps(DeploymentMode::Production))).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/bookings").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        serde_json::json!({
            "status": "fail",
            "message": "Can't find /api/v1/bookings on this server!",
        })
    );
}

#[actix_web::test]
async fn unknown_tour_page_renders_error_page() {
    let app = test::init_service(build_app(deps(DeploymentMode::Production))).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/tour/the-moon-walker").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = test::read_body(res).await;
    let html = std::str::from_utf8(&body).expect("utf-8 page");
    assert!(html.contains("There is no tour with that name."));
}

#[actix_web::test]
async fn health_probes_are_mounted() {
    let deps = deps(DeploymentMode::Development);
    deps.health_state.mark_ready();
    let app = test::init_service(build_app(deps)).await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}
