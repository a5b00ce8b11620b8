//! Server-rendered pages.
//!
//! ```text
//! GET /
//! GET /tour/{slug}
//! ```

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};

use crate::domain::AppError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::templates::template_failure;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Overview page listing every tour.
#[get("/")]
pub async fn overview(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let tours = state.tours.all().await?;
    let page = state
        .templates
        .render_overview(&tours)
        .map_err(|err| template_failure(&err))?;
    Ok(html(page))
}

/// Detail page for one tour, looked up by slug.
#[get("/tour/{slug}")]
pub async fn tour_page(
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let tour = state
        .tours
        .by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("There is no tour with that name."))?;
    let page = state
        .templates
        .render_tour(&tour)
        .map_err(|err| template_failure(&err))?;
    Ok(html(page))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::FixtureTourCatalogue;
    use crate::inbound::http::templates::Templates;

    fn state(templates: Templates) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(FixtureTourCatalogue::default()),
            Arc::new(templates),
        ))
    }

    async fn get(state: web::Data<HttpState>, uri: &str) -> (u16, String) {
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(overview)
                .service(tour_page),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status().as_u16();
        let body = test::read_body(res).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[rstest]
    #[case("/", "All Tours")]
    #[case("/tour/the-snow-adventurer", "The Snow Adventurer Tour")]
    #[actix_web::test]
    async fn pages_render_with_titles(#[case] uri: &str, #[case] title: &str) {
        let (status, body) = get(state(Templates::new().expect("templates")), uri).await;
        assert_eq!(status, 200);
        assert!(body.contains(title));
    }

    #[actix_web::test]
    async fn unknown_slugs_are_not_found() {
        let (status, body) = get(state(Templates::new().expect("templates")), "/tour/atlantis").await;
        assert_eq!(status, 404);
        assert!(body.contains("There is no tour with that name."));
    }

    #[actix_web::test]
    async fn template_failures_are_not_operational() {
        let (status, body) = get(state(Templates::unregistered()), "/").await;
        assert_eq!(status, 500);
        assert!(!body.contains("TemplateError"));
    }
}
