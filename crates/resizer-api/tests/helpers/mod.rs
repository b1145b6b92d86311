//! Test helpers: build AppState and router for integration tests.
//!
//! The router is the production one; only the fetcher and the blob store
//! are replaced by in-process fakes.

use axum_test::TestServer;
use bytes::Bytes;
use resizer_api::setup::routes;
use resizer_api::state::AppState;
use resizer_core::{Config, FallbackVariant, ResizerConfig};
use resizer_processing::ImageTransformer;
use resizer_worker::test_helpers::{png_bytes, FlakyStore, StaticFetcher};
use resizer_worker::{ResizeOrchestrator, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

/// URL served by the fake fetcher.
pub const SOURCE_URL: &str = "http://images.test/cat.png";

/// Width and height of the served source image.
pub const SOURCE_WIDTH: u32 = 64;
pub const SOURCE_HEIGHT: u32 = 32;

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<FlakyStore>,
    pub fetcher: Arc<StaticFetcher>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn stored_keys(&self) -> Vec<String> {
        self.store.stored().keys()
    }
}

pub fn source_image() -> Bytes {
    png_bytes(SOURCE_WIDTH, SOURCE_HEIGHT)
}

/// App whose store accepts every write.
pub fn setup_test_app() -> TestApp {
    build_app(FlakyStore::new(), None)
}

pub fn setup_test_app_with_store(store: FlakyStore) -> TestApp {
    build_app(store, None)
}

pub fn setup_test_app_with_fallback(fallback: FallbackVariant) -> TestApp {
    build_app(FlakyStore::new(), Some(fallback))
}

pub fn setup_test_app_with_fallback_and_store(
    fallback: FallbackVariant,
    store: FlakyStore,
) -> TestApp {
    build_app(store, Some(fallback))
}

/// App whose source answers 503 for the first `failures` fetches.
pub fn setup_test_app_with_flaky_source(failures: usize) -> TestApp {
    build_app_with_fetcher(source_fetcher().failing_first(failures), FlakyStore::new(), None)
}

fn source_fetcher() -> StaticFetcher {
    StaticFetcher::new().with_body(SOURCE_URL, source_image())
}

fn build_app(store: FlakyStore, fallback: Option<FallbackVariant>) -> TestApp {
    build_app_with_fetcher(source_fetcher(), store, fallback)
}

fn build_app_with_fetcher(
    fetcher: StaticFetcher,
    store: FlakyStore,
    fallback: Option<FallbackVariant>,
) -> TestApp {
    let config = Config::from(ResizerConfig {
        request_timeout_secs: 10,
        ..ResizerConfig::default()
    });

    let store = Arc::new(store);
    let fetcher = Arc::new(fetcher);

    let orchestrator = ResizeOrchestrator::new(
        fetcher.clone(),
        Arc::new(ImageTransformer::new()),
        store.clone(),
        fallback,
    )
    .with_retry_policy(RetryPolicy::new(3, Duration::from_millis(5)));

    let state = Arc::new(AppState::new(config.clone(), orchestrator));
    let router = routes::setup_routes(&config, state);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        store,
        fetcher,
    }
}
