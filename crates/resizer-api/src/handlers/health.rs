use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness check - answers as long as the process serves requests
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "alive" })))
}
