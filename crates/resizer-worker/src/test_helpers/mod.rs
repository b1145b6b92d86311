//! Fakes of the external capabilities, for tests.

pub mod fakes;
pub mod fixtures;

pub use fakes::{FakeTransform, FlakyStore, StaticFetcher};
pub use fixtures::{png_bytes, source_metadata};
