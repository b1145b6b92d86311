//! Error types module
//!
//! Request-level errors of the resize service. Per-variant failures are not
//! represented here: they are collected by the worker and reported as a
//! partial failure. `AppError` covers what aborts a whole request.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for upstream failures outside our control
    Warn,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// Default HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "FETCH_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Request cancelled: {0}")]
    Cancelled(String),
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", LogLevel::Debug),
        AppError::Fetch(_) => (409, "FETCH_ERROR", LogLevel::Warn),
        AppError::ImageProcessing(_) => (409, "IMAGE_PROCESSING_ERROR", LogLevel::Warn),
        AppError::Cancelled(_) => (409, "CANCELLED", LogLevel::Warn),
    }
}

impl AppError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Fetch(_) => "Fetch",
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::Cancelled(_) => "Cancelled",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg)
            | AppError::Fetch(ref msg)
            | AppError::ImageProcessing(ref msg)
            | AppError::Cancelled(ref msg) => msg.clone(),
        }
    }
}
