//! Resizer Storage Library
//!
//! This crate provides the blob store capability used to persist produced
//! variants: the [`BlobStore`] trait and its S3, local filesystem and
//! in-memory implementations.
//!
//! # Storage key format
//!
//! Keys are produced by the variant planner (`{prefix}/{name}.{format}`).
//! Keys must not be empty, contain a `..` segment or start with `/`. Every
//! backend validates them through [`validate_key`] before writing, and the
//! planner applies the same rule before any work starts.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::validate_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use resizer_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{BlobStore, StorageError, StorageResult};
