//! OpenAPI document for the REST surface.
//!
//! The document is assembled from the `#[utoipa::path]` annotations on the
//! handlers and served as plain JSON at `/api-docs/openapi.json`; no UI is
//! bundled with the server.

use axum::Json;
use utoipa::OpenApi;

use crate::network::handlers;

/// Top-level OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skip Hire API",
        description = "Booking records and skip catalog for the skip-hire wizard."
    ),
    paths(
        handlers::bookings::create_booking,
        handlers::bookings::list_bookings,
        handlers::bookings::get_booking,
        handlers::bookings::update_booking,
        handlers::bookings::delete_booking,
        handlers::skips::skips_by_location,
        handlers::health::health_handler,
        handlers::health::liveness_handler,
        handlers::health::readiness_handler,
    ),
    components(schemas(
        skiphire_core::booking::Booking,
        skiphire_core::booking::NewBooking,
        skiphire_core::booking::BookingPatch,
        skiphire_core::booking::WasteType,
        skiphire_core::booking::HeavyWasteType,
        skiphire_core::booking::HeavyWastePercentage,
        skiphire_core::catalog::SkipOffer,
        crate::network::error::ErrorBody,
    )),
    tags(
        (name = "bookings", description = "Booking record CRUD"),
        (name = "skips", description = "Skip catalog lookup"),
        (name = "health", description = "Probes and health detail")
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document as JSON.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for route in [
            "/api/bookings",
            "/api/bookings/{id}",
            "/api/skips/by-location",
            "/health",
            "/health/live",
            "/health/ready",
        ] {
            assert!(paths.contains_key(route), "missing {route}");
        }
    }

    #[test]
    fn document_serializes_to_json() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("\"openapi\""));
        assert!(json.contains("NewBooking"));
    }
}
