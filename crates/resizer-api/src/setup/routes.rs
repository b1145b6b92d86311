//! Route configuration

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use resizer_core::Config;
use resizer_infra::request_id_middleware;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

/// Build the application router
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    Router::new()
        .route("/resize", post(handlers::resize::resize))
        .route("/base64", post(handlers::base64::to_base64))
        .route("/metrics", get(handlers::metrics::metrics))
        .route("/health", get(handlers::health::liveness_check))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(config.max_body_bytes())),
        )
}
