//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the tour endpoints, the health probes and the error
//! envelope every API failure is rendered as. The document backs Swagger UI
//! in debug builds.

use utoipa::OpenApi;

use crate::domain::{DistanceUnit, GeoPoint, Tour, TourDistance};
use crate::inbound::http::render::ErrorEnvelope;
use crate::inbound::http::tours::{TourDistancesResponse, TourListResponse, TourResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tour backend API",
        description = "Tour catalogue queries, rendered pages and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::tours::list_tours,
        crate::inbound::http::tours::get_tour,
        crate::inbound::http::tours::tours_within,
        crate::inbound::http::tours::tour_distances,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        Tour,
        TourDistance,
        GeoPoint,
        DistanceUnit,
        TourListResponse,
        TourResponse,
        TourDistancesResponse
    )),
    tags(
        (name = "tours", description = "Tour catalogue queries"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("ErrorEnvelope", "status")]
    #[case("ErrorEnvelope", "message")]
    #[case("Tour", "startLocation")]
    #[case("TourListResponse", "results")]
    fn schemas_expose_wire_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas
            .get(schema)
            .unwrap_or_else(|| panic!("{schema} schema registered"));
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    fn geo_routes_are_documented() {
        let doc = ApiDoc::openapi();
        assert!(
            doc.paths
                .paths
                .contains_key("/api/v1/tours/tours-within/{distance}/center/{latlng}/unit/{unit}")
        );
        assert!(doc.paths.paths.contains_key("/api/v1/tours/distances/{latlng}/unit/{unit}"));
    }
}
