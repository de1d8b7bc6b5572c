//! Router setup and configuration.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{health, id};
use crate::api::middleware::SnowflakeRequestId;
use crate::api::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    // Health and metrics routes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/metrics", get(health::metrics));

    // ID generation routes
    let id_routes = Router::new()
        .route("/snowflake", get(id::generate_snowflake))
        .route("/formatted", get(id::generate_formatted))
        .route("/decode", get(id::decode))
        .route("/info", get(id::info));

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(SnowflakeRequestId::new(
            state.generator.clone(),
        )))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer(&state.config.server.allowed_origins));

    Router::new()
        .merge(health_routes)
        .nest("/v1/id", id_routes)
        .layer(middleware)
        .with_state(state)
}

/// CORS policy for the configured browser origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
