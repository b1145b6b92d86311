//! Resizer Infrastructure Library
//!
//! Shared infrastructure of the resize service:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Source image fetching over HTTP

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "fetch")]
pub mod fetch;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{get_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "fetch")]
pub use fetch::{parse_source_url, FetchError, ReqwestFetcher, SourceFetcher};
