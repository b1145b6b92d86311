//! `POST /base64`: resize to the first requested size and return the
//! encoded image instead of storing it.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use resizer_core::{ErrorMetadata, ResizeRequest};
use resizer_worker::RequestContext;

use crate::error::{
    error_response, ResponseBody, ResponseBodyError, ValidatedJson, REQUEST_ERROR_KEY,
};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/base64",
    tag = "resize",
    request_body = ResizeRequest,
    responses(
        (status = 200, description = "Base64-encoded webp of the first size", body = ResponseBody<String>),
        (status = 400, description = "Invalid request, fetch or processing failure", body = ResponseBody<String>)
    )
)]
pub async fn to_base64(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ResizeRequest>,
) -> Response {
    let ctx = RequestContext::with_timeout(state.request_timeout());
    let _cancel_on_drop = ctx.drop_guard();

    match state.orchestrator.to_base64(&request, &ctx).await {
        Ok(encoded) => (StatusCode::OK, Json(ResponseBody::ok(encoded))).into_response(),
        Err(error) => {
            tracing::debug!(url = %request.url, error = %error, "Base64 conversion failed");
            error_response(
                StatusCode::BAD_REQUEST,
                vec![ResponseBodyError::new(
                    REQUEST_ERROR_KEY,
                    error.client_message(),
                )],
            )
        }
    }
}
