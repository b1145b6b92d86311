//! Resizer API Library
//!
//! This crate provides the HTTP handlers, response types and application setup.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{HttpAppError, ResponseBody, ResponseBodyError, ValidatedJson};
pub use state::AppState;
