//! API error type mapping domain failures to HTTP responses.
//!
//! Every error leaves the server as a JSON body of the shape
//! `{"error": "..."}` with a status code matched to the failure class.
//! Internal errors are logged in full but reported to clients with a
//! generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::CatalogError;
use crate::storage::StoreError;

/// JSON body returned for every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
}

/// Errors surfaced to API clients.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Request body or parameters failed validation.
    #[error("{0}")]
    Validation(String),
    /// No booking exists with the requested id.
    #[error("Booking not found")]
    NotFound,
    /// The upstream skip catalog could not be queried.
    #[error("skip catalog unavailable: {0}")]
    Upstream(String),
    /// Unexpected internal failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(err) => {
                tracing::error!(error = ?err, "request failed with internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e.to_string()),
            StoreError::NotFound => Self::NotFound,
            StoreError::Backend(e) => Self::Internal(e),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skiphire_core::booking::ValidationError;

    async fn body_bytes(resp: Response) -> Vec<u8> {
        axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn not_found_maps_to_404_with_exact_body() {
        let resp = ApiError::from(StoreError::NotFound).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(resp).await, br#"{"error":"Booking not found"}"#);
    }

    #[tokio::test]
    async fn validation_maps_to_400_and_names_the_fields() {
        let err = StoreError::from(ValidationError {
            fields: vec!["postcode", "contactEmail"],
        });
        let resp = ApiError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = String::from_utf8(body_bytes(resp).await).unwrap();
        assert!(body.contains("postcode"));
        assert!(body.contains("contactEmail"));
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_502() {
        let resp = ApiError::from(CatalogError::Upstream { status: 500 }).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body = String::from_utf8(body_bytes(resp).await).unwrap();
        assert!(body.contains("catalog"));
        assert!(body.contains("500"));
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_detail() {
        let resp = ApiError::Internal(anyhow::anyhow!("redb: corrupt page 17")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(resp).await, br#"{"error":"internal server error"}"#);
    }
}
