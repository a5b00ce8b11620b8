//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

#[cfg(debug_assertions)]
use tour_backend::doc::ApiDoc;
use tour_backend::domain::ports::{FixtureTourCatalogue, TracingFailureReporter};
use tour_backend::inbound::http::health::{HealthState, live, ready};
use tour_backend::inbound::http::render::ErrorRenderer;
use tour_backend::inbound::http::state::HttpState;
use tour_backend::inbound::http::templates::Templates;
use tour_backend::inbound::http::tours::{get_tour, list_tours, tour_distances, tours_within};
use tour_backend::inbound::http::views::{overview, tour_page};
use tour_backend::middleware::normalizer::not_found;
use tour_backend::{ErrorNormalizer, Trace};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    renderer: Arc<ErrorRenderer>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        renderer,
    } = deps;

    let api = web::scope("/api/v1")
        .service(tours_within)
        .service(tour_distances)
        .service(list_tours)
        .service(get_tour);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(ErrorNormalizer::new(renderer))
        .wrap(Trace)
        .service(api)
        .service(overview)
        .service(tour_page)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(not_found))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the page templates fail to register,
/// or when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig { bind_addr, mode } = config;

    let templates = Arc::new(
        Templates::new()
            .map_err(|e| std::io::Error::other(format!("template registration failed: {e}")))?,
    );
    let renderer = Arc::new(ErrorRenderer::new(
        mode,
        Arc::clone(&templates),
        Arc::new(TracingFailureReporter),
    ));
    let http_state = web::Data::new(HttpState::new(
        Arc::new(FixtureTourCatalogue::default()),
        templates,
    ));

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            renderer: Arc::clone(&renderer),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, mode = %mode, "server listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests;
