//! HTTP handlers

pub mod base64;
pub mod health;
pub mod metrics;
pub mod resize;
