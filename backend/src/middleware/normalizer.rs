//! Middleware turning every failure into a client response.
//!
//! Wrapped around the whole application, [`ErrorNormalizer`] inspects each
//! response for an attached error: a handler returning `Err`, an extractor
//! rejecting the request, or an inner middleware failing outright. The error
//! is converted to a [`Failure`] and handed to the [`ErrorRenderer`] exactly
//! once; successful responses pass through untouched.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::{Error, HttpRequest, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::{AppError, ErrorStatus, Failure, RawFailure};
use crate::inbound::http::ApiResult;
use crate::inbound::http::render::{ErrorRenderer, RequestTarget};

/// Error normalising middleware.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::App;
/// use tour_backend::ErrorNormalizer;
/// use tour_backend::domain::DeploymentMode;
/// use tour_backend::domain::ports::TracingFailureReporter;
/// use tour_backend::inbound::http::render::ErrorRenderer;
/// use tour_backend::inbound::http::templates::Templates;
///
/// let renderer = ErrorRenderer::new(
///     DeploymentMode::Production,
///     Arc::new(Templates::new().expect("templates")),
///     Arc::new(TracingFailureReporter),
/// );
/// let app = App::new().wrap(ErrorNormalizer::new(Arc::new(renderer)));
/// ```
#[derive(Clone)]
pub struct ErrorNormalizer {
    renderer: Arc<ErrorRenderer>,
}

impl ErrorNormalizer {
    /// Normaliser rendering through `renderer`.
    #[must_use]
    pub fn new(renderer: Arc<ErrorRenderer>) -> Self {
        Self { renderer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorNormalizer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorNormalizerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorNormalizerMiddleware {
            service,
            renderer: Arc::clone(&self.renderer),
        }))
    }
}

/// Service wrapper produced by [`ErrorNormalizer`].
///
/// Applications should not use this type directly.
pub struct ErrorNormalizerMiddleware<S> {
    service: S,
    renderer: Arc<ErrorRenderer>,
}

/// Convert any framework error into a [`Failure`].
///
/// Failures raised by handlers are recovered as-is; other framework errors
/// become unnamed raw failures carrying their status code, the matching
/// status label and their message.
#[must_use]
pub fn failure_from_error(err: &Error) -> Failure {
    if let Some(failure) = err.as_error::<Failure>() {
        return failure.clone();
    }
    let status_code = err.as_response_error().status_code().as_u16();
    RawFailure {
        status: Some(ErrorStatus::from_status_code(status_code).as_str().to_owned()),
        ..RawFailure::unexpected(err.to_string()).with_status_code(status_code)
    }
    .into()
}

fn render(renderer: &ErrorRenderer, target: RequestTarget, err: &Error) -> HttpResponse {
    renderer
        .render(&failure_from_error(err), target)
        .into_http_response()
}

impl<S, B> Service<ServiceRequest> for ErrorNormalizerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let renderer = Arc::clone(&self.renderer);
        // The router needs sole ownership of the request, so only the target
        // is captured here.
        let target = RequestTarget::from_path(req.path());
        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let Some(err) = res.response().error() else {
                        return Ok(res.map_into_left_body());
                    };
                    let response = render(&renderer, target, err);
                    Ok(res.into_response(response).map_into_right_body())
                }
                Err(err) => {
                    let response = render(&renderer, target, &err);
                    Err(InternalError::from_response(err, response).into())
                }
            }
        })
    }
}

/// Default service raising a 404 for every unmatched route.
///
/// # Errors
/// Always returns an operational not-found failure naming the path.
pub async fn not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(AppError::not_found(format!("Can't find {} on this server!", req.path())).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeploymentMode;
    use crate::domain::ports::{MockFailureReporter, TracingFailureReporter};
    use crate::inbound::http::templates::Templates;
    use actix_web::body::to_bytes;
    use actix_web::{App, test as atest, web};
    use rstest::rstest;
    use serde_json::{Value, json};
    use tracing_test::traced_test;

    fn normalizer(mode: DeploymentMode) -> ErrorNormalizer {
        let mut reporter = MockFailureReporter::new();
        reporter.expect_report().return_const(());
        let templates = Templates::new().expect("templates");
        ErrorNormalizer::new(Arc::new(ErrorRenderer::new(
            mode,
            Arc::new(templates),
            Arc::new(reporter),
        )))
    }

    async fn missing_item(id: web::Path<String>) -> ApiResult<HttpResponse> {
        Err(AppError::not_found(format!("No item {id}")).into())
    }

    async fn broken_item(_id: web::Path<String>) -> ApiResult<HttpResponse> {
        Err(RawFailure::unexpected("ECONNRESET").into())
    }

    #[actix_web::test]
    async fn successful_responses_pass_through() {
        let app = atest::init_service(
            App::new()
                .wrap(normalizer(DeploymentMode::Production))
                .route("/api/ok", web::get().to(|| async { HttpResponse::Ok().body("fine") })),
        )
        .await;
        let res = atest::call_service(&app, atest::TestRequest::get().uri("/api/ok").to_request()).await;
        assert_eq!(res.status(), 200);
        assert_eq!(atest::read_body(res).await, "fine");
    }

    #[actix_web::test]
    async fn unmatched_routes_name_the_path() {
        let app = atest::init_service(
            App::new()
                .wrap(normalizer(DeploymentMode::Production))
                .default_service(web::to(not_found)),
        )
        .await;
        let req = atest::TestRequest::get().uri("/api/v1/nowhere").to_request();
        let res = atest::call_service(&app, req).await;
        assert_eq!(res.status(), 404);
        let body: Value = atest::read_body_json(res).await;
        assert_eq!(
            body,
            json!({ "status": "fail", "message": "Can't find /api/v1/nowhere on this server!" })
        );
    }

    #[actix_web::test]
    async fn extractor_failures_keep_their_status() {
        let app = atest::init_service(
            App::new()
                .wrap(normalizer(DeploymentMode::Development))
                .route(
                    "/api/count/{n}",
                    web::get().to(|n: web::Path<u32>| async move { n.to_string() }),
                ),
        )
        .await;
        let req = atest::TestRequest::get().uri("/api/count/many").to_request();
        let res = atest::call_service(&app, req).await;
        assert_eq!(res.status(), 404);
        let body: Value = atest::read_body_json(res).await;
        assert_eq!(body.get("status"), Some(&json!("fail")));
        assert!(body.pointer("/error/name").is_none());
    }

    #[rstest]
    #[case::development(DeploymentMode::Development)]
    #[case::production(DeploymentMode::Production)]
    #[actix_web::test]
    async fn handler_failures_on_parameterised_routes_are_rendered(#[case] mode: DeploymentMode) {
        let app = atest::init_service(
            App::new()
                .wrap(normalizer(mode))
                .route("/api/items/{id}", web::get().to(missing_item)),
        )
        .await;
        let req = atest::TestRequest::get().uri("/api/items/42").to_request();
        let res = atest::call_service(&app, req).await;
        assert_eq!(res.status(), 404);
        let body: Value = atest::read_body_json(res).await;
        assert_eq!(body.get("status"), Some(&json!("fail")));
        assert_eq!(body.get("message"), Some(&json!("No item 42")));
        assert_eq!(body.get("error").is_some(), mode == DeploymentMode::Development);
    }

    #[rstest]
    #[case::development(DeploymentMode::Development)]
    #[case::production(DeploymentMode::Production)]
    #[actix_web::test]
    async fn page_failures_on_parameterised_routes_are_rendered(#[case] mode: DeploymentMode) {
        let app = atest::init_service(
            App::new()
                .wrap(normalizer(mode))
                .route("/tour/{slug}", web::get().to(missing_item)),
        )
        .await;
        let req = atest::TestRequest::get().uri("/tour/the-moon-walker").to_request();
        let res = atest::call_service(&app, req).await;
        assert_eq!(res.status(), 404);
        let header = res
            .headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        assert!(header.is_some_and(|value| value.starts_with("text/html")));
        let body = atest::read_body(res).await;
        let text = std::str::from_utf8(&body).expect("UTF-8 body");
        assert!(text.contains("No item the-moon-walker"));
    }

    #[actix_web::test]
    async fn inner_middleware_errors_are_rendered() {
        let app = atest::init_service(
            App::new()
                .wrap_fn(|_req, _srv| async {
                    Err::<ServiceResponse, Error>(actix_web::error::ErrorServiceUnavailable(
                        "maintenance window",
                    ))
                })
                .wrap(normalizer(DeploymentMode::Production))
                .route("/api/ok", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let req = atest::TestRequest::get().uri("/api/ok").to_request();
        let err = atest::try_call_service(&app, req)
            .await
            .err()
            .expect("inner middleware error");

        let response = err.error_response();
        assert_eq!(response.status(), 500);
        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        let body: Value = serde_json::from_slice(&bytes).expect("JSON body");
        assert_eq!(body, json!({ "status": "error", "message": "Something went wrong" }));
    }

    #[traced_test]
    #[actix_web::test]
    async fn unexpected_failures_are_logged_once() {
        let renderer = ErrorRenderer::new(
            DeploymentMode::Production,
            Arc::new(Templates::new().expect("templates")),
            Arc::new(TracingFailureReporter),
        );
        let app = atest::init_service(
            App::new()
                .wrap(ErrorNormalizer::new(Arc::new(renderer)))
                .route("/api/items/{id}", web::get().to(broken_item)),
        )
        .await;
        let req = atest::TestRequest::get().uri("/api/items/7").to_request();
        let res = atest::call_service(&app, req).await;
        assert_eq!(res.status(), 500);

        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|line| line.contains("ECONNRESET")).count() {
                1 => Ok(()),
                n => Err(format!("expected one operator event, found {n}")),
            }
        });
    }

    #[rstest]
    fn framework_errors_become_unnamed_raw_failures() {
        let err = actix_web::error::ErrorPayloadTooLarge("payload too large");
        let Failure::Raw(raw) = failure_from_error(&err) else {
            panic!("expected a raw failure");
        };
        assert_eq!(raw.status_code, Some(413));
        assert_eq!(raw.status.as_deref(), Some("fail"));
        assert_eq!(raw.message.as_deref(), Some("payload too large"));
        assert!(raw.name.is_none());
    }
}
