//! Skip catalog endpoint handler.

use axum::extract::{Query, State};
use axum::Json;
use metrics::counter;
use serde::Deserialize;
use skiphire_core::catalog::SkipOffer;
use utoipa::IntoParams;

use super::AppState;
use crate::network::error::{ApiError, ErrorBody};

/// Query parameters for the by-location catalog lookup.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SkipsQuery {
    /// Postcode to price skips for.
    pub postcode: String,
    /// Area name; the upstream accepts an empty string.
    #[serde(default)]
    pub area: String,
}

/// Lists the skips offered for a location.
///
/// The upstream catalog document is passed through verbatim. Eligibility
/// filtering against waste selections is a client-side wizard rule, so this
/// endpoint never hides offers other than what the upstream already omits.
#[utoipa::path(
    get,
    path = "/api/skips/by-location",
    tag = "skips",
    params(SkipsQuery),
    responses(
        (status = 200, description = "Offers for this location", body = [SkipOffer]),
        (status = 502, description = "Upstream catalog unavailable", body = ErrorBody)
    )
)]
pub async fn skips_by_location(
    State(state): State<AppState>,
    Query(query): Query<SkipsQuery>,
) -> Result<Json<Vec<SkipOffer>>, ApiError> {
    match state.catalog.by_location(&query.postcode, &query.area).await {
        Ok(offers) => {
            counter!("catalog_requests_total", "outcome" => "ok").increment(1);
            Ok(Json(offers))
        }
        Err(err) => {
            counter!("catalog_requests_total", "outcome" => "error").increment(1);
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;
    use crate::network::handlers::testing::{offer, state_with_catalog, FailingCatalog, StaticCatalog};

    fn query(postcode: &str) -> Query<SkipsQuery> {
        Query(SkipsQuery {
            postcode: postcode.to_string(),
            area: String::new(),
        })
    }

    #[tokio::test]
    async fn returns_offers_from_the_catalog() {
        let state = state_with_catalog(Arc::new(StaticCatalog(vec![
            offer(1, 4, true),
            offer(2, 8, false),
        ])));

        let Json(offers) = skips_by_location(State(state), query("NR32")).await.unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].id, 1);
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_bad_gateway() {
        let state = state_with_catalog(Arc::new(FailingCatalog));

        let err = skips_by_location(State(state), query("NR32")).await.unwrap_err();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn area_defaults_to_empty_when_absent() {
        let q: SkipsQuery = serde_json::from_str(r#"{"postcode": "NR32"}"#).unwrap();
        assert_eq!(q.postcode, "NR32");
        assert_eq!(q.area, "");
    }
}
