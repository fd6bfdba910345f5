//! Tower middleware stack wrapped around every route.
//!
//! Layers are listed outermost first: the top layer sees the request
//! earliest and the response latest.

use axum::http::header::HeaderName;
use axum::http::Method;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::config::NetworkConfig;

/// Wraps the router in the full middleware stack, outermost to innermost:
/// request-id assignment (UUID v4 `X-Request-Id`), trace spans, gzip
/// compression, the body-size cap, CORS, the request timeout, and finally
/// request-id propagation onto the response.
#[must_use]
pub fn apply(router: Router, config: &NetworkConfig) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    let cors = build_cors_layer(&config.cors_origins);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
            .layer(cors)
            .layer(TimeoutLayer::new(config.request_timeout))
            .layer(PropagateRequestIdLayer::new(x_request_id))
            .into_inner(),
    )
}

/// CORS layer for the configured origins. A `"*"` entry allows any origin;
/// otherwise each parseable entry joins an explicit allowlist. The method
/// list covers the whole CRUD surface, PATCH and DELETE included.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}
