//! Resizer Worker Library
//!
//! Variant fan-out of the resize service:
//! - [`planner`] derives the variants of a request and their storage keys
//! - [`executor`] runs one task per variant and joins them all
//! - [`aggregator`] collects per-variant failures
//! - [`manifest`] assembles the sorted result of a successful batch
//! - [`retry`] retries fetches and stores with a fixed delay
//!
//! [`ResizeOrchestrator`] drives a whole request and owns the process
//! counters exposed on `/metrics`.

pub mod aggregator;
pub mod context;
pub mod counters;
pub mod executor;
pub mod manifest;
pub mod orchestrator;
pub mod planner;
pub mod retry;

// Test helpers (fakes of the external capabilities)
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use aggregator::{ErrorAggregator, TaskError, TaskFailure};
pub use context::{Interrupted, RequestContext};
pub use counters::{CounterSnapshot, Counters, PROMETHEUS_CONTENT_TYPE};
pub use executor::{TaskExecutor, TaskOutcome, TaskSuccess};
pub use orchestrator::{RequestOutcome, ResizeOrchestrator};
pub use planner::{plan, PlanError};
pub use retry::{retry_with_fixed_delay, retry_with_fixed_delay_if, RetryPolicy};
