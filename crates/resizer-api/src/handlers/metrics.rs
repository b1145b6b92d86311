use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse};
use resizer_worker::PROMETHEUS_CONTENT_TYPE;

use crate::state::AppState;

/// Process counters in the Prometheus text exposition format.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "health",
    responses(
        (status = 200, description = "Prometheus text exposition", content_type = "text/plain", body = String)
    )
)]
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.orchestrator.counters().render_prometheus(),
    )
}
