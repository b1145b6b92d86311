//! `POST /resize`: produce and store every variant of an image.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use resizer_core::{Manifest, ResizeRequest};
use resizer_infra::RequestId;
use resizer_worker::{RequestContext, RequestOutcome};

use crate::error::{
    error_response, HttpAppError, ResponseBody, ResponseBodyError, ValidatedJson,
};
use crate::state::AppState;

/// HTTP rendering of a [`RequestOutcome`].
pub struct ResizeResponse(pub RequestOutcome);

impl IntoResponse for ResizeResponse {
    fn into_response(self) -> Response {
        match self.0 {
            RequestOutcome::Ok(manifest) => {
                (StatusCode::OK, Json(ResponseBody::ok(manifest))).into_response()
            }
            RequestOutcome::PartialFailure(failures) => {
                tracing::warn!(failed = failures.len(), "Resize finished with failed variants");
                error_response(
                    StatusCode::CONFLICT,
                    failures.iter().map(ResponseBodyError::from).collect(),
                )
            }
            RequestOutcome::Fatal(error) => HttpAppError(error).into_response(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/resize",
    tag = "resize",
    request_body = ResizeRequest,
    responses(
        (status = 200, description = "Every variant stored", body = ResponseBody<Manifest>),
        (status = 400, description = "Malformed body, invalid url or sizes", body = ResponseBody<Manifest>),
        (status = 409, description = "Fetch failed or some variants failed", body = ResponseBody<Manifest>)
    )
)]
pub async fn resize(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    ValidatedJson(request): ValidatedJson<ResizeRequest>,
) -> ResizeResponse {
    let request_id = request_id.map(|Extension(id)| id.0).unwrap_or_default();
    tracing::info!(
        request_id = %request_id,
        url = %request.url,
        key = %request.key,
        sizes = request.sizes.len(),
        "Resize requested"
    );

    let ctx = RequestContext::with_timeout(state.request_timeout());
    // Abandons outstanding variants when the client goes away.
    let _cancel_on_drop = ctx.drop_guard();

    ResizeResponse(state.orchestrator.resize(&request, &ctx).await)
}
