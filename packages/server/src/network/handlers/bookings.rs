//! Booking CRUD endpoint handlers.
//!
//! Request bodies are taken as raw [`Bytes`] and parsed here rather than
//! through `Json<T>`, so malformed JSON produces a 400 with the same
//! `{"error": ...}` body shape as every other failure.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use metrics::counter;
use skiphire_core::booking::{Booking, BookingPatch, NewBooking};

use super::AppState;
use crate::network::error::{ApiError, ErrorBody};

fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Validation(e.to_string()))
}

/// Creates a booking from the posted JSON document.
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "bookings",
    request_body = NewBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Malformed JSON or blank required fields", body = ErrorBody)
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let new: NewBooking = parse_body(&body)?;
    let booking = state.repo.create(new).await?;

    counter!("bookings_created_total").increment(1);
    tracing::info!(id = booking.id, "booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Lists every booking, ordered by id.
#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = "bookings",
    responses((status = 200, description = "All bookings ordered by id", body = [Booking]))
)]
pub async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.repo.list().await?))
}

/// Fetches one booking by id.
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    tag = "bookings",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "The booking", body = Booking),
        (status = 404, description = "No booking with this id", body = ErrorBody)
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.repo.get(id).await?))
}

/// Applies a partial update to a booking.
#[utoipa::path(
    patch,
    path = "/api/bookings/{id}",
    tag = "bookings",
    params(("id" = i64, Path, description = "Booking id")),
    request_body = BookingPatch,
    responses(
        (status = 200, description = "The patched booking", body = Booking),
        (status = 400, description = "Malformed JSON or patch blanks a required field", body = ErrorBody),
        (status = 404, description = "No booking with this id", body = ErrorBody)
    )
)]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Booking>, ApiError> {
    let patch: BookingPatch = parse_body(&body)?;
    let booking = state.repo.update(id, patch).await?;

    tracing::info!(id, "booking updated");
    Ok(Json(booking))
}

/// Deletes a booking by id.
#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    tag = "bookings",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 404, description = "No booking with this id", body = ErrorBody)
    )
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.repo.delete(id).await?;

    counter!("bookings_deleted_total").increment(1);
    tracing::info!(id, "booking deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;
    use crate::network::handlers::testing::empty_state;

    const VALID_BODY: &str = r#"{
        "postcode": "NR32 1AB",
        "wasteTypes": ["garden", "household"],
        "contactName": "Jo Bloggs",
        "contactEmail": "jo@example.com",
        "contactPhone": "07700 900123"
    }"#;

    async fn create(state: &AppState, body: &str) -> Booking {
        let (status, Json(booking)) =
            create_booking(State(state.clone()), Bytes::from(body.to_string()))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        booking
    }

    #[tokio::test]
    async fn create_returns_201_and_assigns_sequential_ids() {
        let state = empty_state();
        let first = create(&state, VALID_BODY).await;
        let second = create(&state, VALID_BODY).await;
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.postcode, "NR32 1AB");
        assert!(!first.payment_completed);
        assert!(first.created_at <= chrono::Utc::now());
    }

    #[tokio::test]
    async fn create_with_malformed_json_is_400() {
        let state = empty_state();
        let err = create_booking(State(state), Bytes::from_static(b"{not json"))
            .await
            .unwrap_err();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_with_blank_required_field_is_400_naming_the_field() {
        let state = empty_state();
        let body = r#"{
            "postcode": "   ",
            "wasteTypes": ["garden"],
            "contactName": "Jo",
            "contactEmail": "jo@example.com",
            "contactPhone": "07700 900123"
        }"#;
        let err = create_booking(State(state), Bytes::from(body.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(&err, ApiError::Validation(msg) if msg.contains("postcode")));
    }

    #[tokio::test]
    async fn get_returns_the_stored_booking() {
        let state = empty_state();
        let created = create(&state, VALID_BODY).await;
        let Json(fetched) = get_booking(State(state), Path(created.id)).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_booking_is_404() {
        let state = empty_state();
        let err = get_booking(State(state), Path(42)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(
            err.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn list_returns_bookings_ordered_by_id() {
        let state = empty_state();
        create(&state, VALID_BODY).await;
        create(&state, VALID_BODY).await;
        create(&state, VALID_BODY).await;

        let Json(all) = list_bookings(State(state)).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn update_patches_only_the_named_fields() {
        let state = empty_state();
        let created = create(&state, VALID_BODY).await;

        let patch = r#"{"skipSize": "8 Yard Skip", "paymentCompleted": true}"#;
        let Json(updated) = update_booking(
            State(state),
            Path(created.id),
            Bytes::from(patch.to_string()),
        )
        .await
        .unwrap();

        assert_eq!(updated.skip_size.as_deref(), Some("8 Yard Skip"));
        assert!(updated.payment_completed);
        assert_eq!(updated.contact_name, created.contact_name);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_missing_booking_is_404() {
        let state = empty_state();
        let err = update_booking(State(state), Path(7), Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn update_that_blanks_a_required_field_is_400() {
        let state = empty_state();
        let created = create(&state, VALID_BODY).await;

        let err = update_booking(
            State(state),
            Path(created.id),
            Bytes::from_static(br#"{"contactEmail": "  "}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(&err, ApiError::Validation(msg) if msg.contains("contactEmail")));
    }

    #[tokio::test]
    async fn delete_then_get_is_404() {
        let state = empty_state();
        let created = create(&state, VALID_BODY).await;

        let status = delete_booking(State(state.clone()), Path(created.id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = get_booking(State(state), Path(created.id)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn delete_missing_booking_is_404() {
        let state = empty_state();
        let err = delete_booking(State(state), Path(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
