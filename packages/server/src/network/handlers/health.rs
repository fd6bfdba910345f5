//! Health detail and probe endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;
use crate::network::HealthState;

/// Health detail document: lifecycle state, booking count, uptime.
///
/// Answers 200 unconditionally; the `state` field says whether the server
/// is actually taking traffic, so a monitor can tell draining from down.
/// `bookings` is `null` when the storage backend cannot be queried.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Health detail document"))
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let health = state.shutdown.health_state();
    let bookings = state.repo.count().await.ok();
    let uptime_secs = state.start_time.elapsed().as_secs();

    Json(json!({
        "state": health.as_str(),
        "bookings": bookings,
        "uptime_secs": uptime_secs,
    }))
}

/// Liveness probe. Answers 200 whenever the process can respond at all;
/// dependencies are not consulted, since a failing liveness probe gets the
/// pod restarted.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe. 200 only in the `Ready` state; 503 while starting,
/// draining, or stopped, which takes the instance out of load-balancer
/// rotation.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Accepting requests"),
        (status = 503, description = "Starting up or shutting down")
    )
)]
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.shutdown.health_state() == HealthState::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use skiphire_core::booking::{NewBooking, WasteType};

    use super::*;
    use crate::network::handlers::testing::empty_state;

    fn sample_new() -> NewBooking {
        NewBooking {
            user_id: None,
            postcode: "NR32 1AB".to_string(),
            waste_types: vec![WasteType::Garden],
            heavy_waste_types: None,
            heavy_waste_percentage: None,
            skip_size: None,
            permit_required: false,
            delivery_date: None,
            contact_name: "Jo Bloggs".to_string(),
            contact_email: "jo@example.com".to_string(),
            contact_phone: "07700 900123".to_string(),
            payment_completed: false,
        }
    }

    #[tokio::test]
    async fn health_document_has_state_count_and_uptime() {
        let state = empty_state();
        state.shutdown.set_ready();

        let response = health_handler(State(state)).await;
        let json = response.0;

        assert_eq!(json["state"], "ready");
        assert_eq!(json["bookings"], 0);
        assert!(json["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn health_document_shows_starting_before_ready() {
        let state = empty_state();
        let response = health_handler(State(state)).await;
        assert_eq!(response.0["state"], "starting");
    }

    #[tokio::test]
    async fn health_document_shows_draining_after_trigger() {
        let state = empty_state();
        state.shutdown.set_ready();
        state.shutdown.trigger_shutdown();

        let response = health_handler(State(state)).await;
        assert_eq!(response.0["state"], "draining");
    }

    #[tokio::test]
    async fn health_document_counts_stored_bookings() {
        let state = empty_state();
        state.repo.create(sample_new()).await.unwrap();

        let response = health_handler(State(state)).await;
        assert_eq!(response.0["bookings"], 1);
    }

    #[tokio::test]
    async fn liveness_is_always_ok() {
        let status = liveness_handler().await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_is_ok_when_ready() {
        let state = empty_state();
        state.shutdown.set_ready();

        let status = readiness_handler(State(state)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_fails_while_starting() {
        let state = empty_state();
        let status = readiness_handler(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn readiness_fails_while_draining() {
        let state = empty_state();
        state.shutdown.set_ready();
        state.shutdown.trigger_shutdown();

        let status = readiness_handler(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
