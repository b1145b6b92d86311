//! HTTP response bodies and error conversion
//!
//! Every endpoint answers with `{"status": "ok", "data": ...}` or
//! `{"status": "error", "errors": [{"key": ..., "error": ...}]}`.
//! Request-level failures (including JSON rejections from [`ValidatedJson`])
//! are rendered through [`HttpAppError`].

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use resizer_core::{AppError, ErrorMetadata, LogLevel};
use resizer_worker::TaskFailure;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

/// Error key of request-level problems (bad JSON, invalid sizes, ...).
pub const REQUEST_ERROR_KEY: &str = "request";

/// Error key of failures that are not tied to a variant.
pub const UNKNOWN_ERROR_KEY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseBodyError {
    /// Variant label (`"640x480"`, `"original"`, `"fallback"`), `"request"` or `"unknown"`.
    pub key: String,
    pub error: String,
}

impl ResponseBodyError {
    pub fn new(key: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            error: error.into(),
        }
    }
}

impl From<&TaskFailure> for ResponseBodyError {
    fn from(failure: &TaskFailure) -> Self {
        Self::new(failure.label.clone(), failure.cause.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResponseBody<T> {
    /// `"ok"` or `"error"`
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ResponseBodyError>>,
}

impl<T> ResponseBody<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn error(errors: Vec<ResponseBodyError>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            errors: Some(errors),
        }
    }
}

/// Render an error body with the given status.
pub fn error_response(status: StatusCode, errors: Vec<ResponseBodyError>) -> Response {
    (status, Json(ResponseBody::<()>::error(errors))).into_response()
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: AppError lives in resizer-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "error decoding JSON body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor answering 400 in the common error shape on
/// deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

pub(crate) fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, error_code, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, error_code, "Error occurred");
        }
    }
}

/// Key reported for a request-level error: `"request"` for client errors,
/// `"unknown"` otherwise.
pub fn error_key(error: &AppError) -> &'static str {
    if error.http_status_code() == 400 {
        REQUEST_ERROR_KEY
    } else {
        UNKNOWN_ERROR_KEY
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status =
            StatusCode::from_u16(app_error.http_status_code()).unwrap_or(StatusCode::CONFLICT);

        log_error(app_error);

        error_response(
            status,
            vec![ResponseBodyError::new(
                error_key(app_error),
                app_error.client_message(),
            )],
        )
    }
}
