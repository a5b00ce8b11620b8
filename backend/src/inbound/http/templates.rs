//! Server-rendered HTML pages.
//!
//! Templates are embedded at compile time and registered once at start-up;
//! rendering is then read-only and safe to share across workers. Values are
//! HTML-escaped because every template name ends in `.html`.

use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::{Failure, RawFailure, Tour};

const BASE_TEMPLATE: &str = "base.html";
const ERROR_TEMPLATE: &str = "error.html";
const OVERVIEW_TEMPLATE: &str = "overview.html";
const TOUR_TEMPLATE: &str = "tour.html";

/// Registered page templates.
#[derive(Debug)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Register the embedded templates.
    ///
    /// # Errors
    /// Returns the parse error when an embedded template is malformed.
    ///
    /// # Examples
    /// ```
    /// use tour_backend::inbound::http::templates::Templates;
    ///
    /// let templates = Templates::new().expect("embedded templates parse");
    /// let html = templates
    ///     .render_error("Something went wrong!", "Please try again later.")
    ///     .expect("error page renders");
    /// assert!(html.contains("Please try again later."));
    /// ```
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (BASE_TEMPLATE, include_str!("../../../templates/base.html")),
            (ERROR_TEMPLATE, include_str!("../../../templates/error.html")),
            (
                OVERVIEW_TEMPLATE,
                include_str!("../../../templates/overview.html"),
            ),
            (TOUR_TEMPLATE, include_str!("../../../templates/tour.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Engine with nothing registered, so every render fails.
    #[cfg(test)]
    pub(crate) fn unregistered() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Render the error page.
    ///
    /// # Errors
    /// Returns the template engine error when rendering fails.
    pub fn render_error(&self, title: &str, msg: &str) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("msg", msg);
        self.tera.render(ERROR_TEMPLATE, &context)
    }

    /// Render the tour overview page.
    ///
    /// # Errors
    /// Returns the template engine error when rendering fails.
    pub fn render_overview(&self, tours: &[Tour]) -> Result<String, tera::Error> {
        self.render(
            OVERVIEW_TEMPLATE,
            &OverviewPage {
                title: "All Tours",
                tours,
            },
        )
    }

    /// Render the detail page of one tour.
    ///
    /// # Errors
    /// Returns the template engine error when rendering fails.
    pub fn render_tour(&self, tour: &Tour) -> Result<String, tera::Error> {
        self.render(
            TOUR_TEMPLATE,
            &TourPage {
                title: format!("{} Tour", tour.name),
                tour,
            },
        )
    }

    fn render(&self, template: &str, page: &impl Serialize) -> Result<String, tera::Error> {
        let context = Context::from_serialize(page)?;
        self.tera.render(template, &context)
    }
}

/// Describe a rendering error, with its causes, as a raw failure for the
/// error pipeline.
#[must_use]
pub fn template_failure(err: &tera::Error) -> Failure {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message = format!("{message}: {cause}");
        source = cause.source();
    }
    RawFailure {
        name: Some("TemplateError".to_owned()),
        ..RawFailure::unexpected(message)
    }
    .into()
}

#[derive(Serialize)]
struct OverviewPage<'a> {
    title: &'a str,
    tours: &'a [Tour],
}

#[derive(Serialize)]
struct TourPage<'a> {
    title: String,
    tour: &'a Tour,
}
