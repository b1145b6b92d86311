//! Fixed constants shared across crates.

use std::time::Duration;

/// Output format used for the original-size variant and every requested size.
pub const DEFAULT_FORMAT: &str = "webp";

/// Label of the variant that keeps the source dimensions.
pub const ORIGINAL_LABEL: &str = "original";

/// Label of the configured fallback variant, whatever its size.
pub const FALLBACK_LABEL: &str = "fallback";

/// Label used for the counters of inline base64 conversions.
pub const BASE64_LABEL: &str = "base64";

/// Number of attempts for retried operations (source fetch, variant store).
pub const RETRY_ATTEMPTS: u32 = 3;

/// Fixed delay between two attempts of a retried operation.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Default timeout of the HTTP client used to download source images.
pub const HTTP_CLIENT_TIMEOUT_SECS: u64 = 5;

/// Default deadline of one resize batch.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default port of the HTTP server.
pub const DEFAULT_PORT: u16 = 8000;

/// Default maximum size of a JSON request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
