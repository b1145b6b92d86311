use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use resizer_core::{SourceMetadata, StorageBackend};
use resizer_infra::fetch::{FetchError, SourceFetcher};
use resizer_processing::{ImageTransform, TransformError, TransformOptions};
use resizer_storage::{BlobStore, MemoryStorage, StorageError, StorageResult};

async fn random_sleep(max_delay_ms: u64) {
    if max_delay_ms == 0 {
        return;
    }
    let delay = rand::rng().random_range(0..=max_delay_ms);
    tokio::time::sleep(Duration::from_millis(delay)).await;
}

/// Fetcher serving fixed bodies by URL; unknown URLs answer 404. The first
/// `failing_first` calls answer 503 whatever the URL.
#[derive(Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, Bytes>,
    failures_before_success: usize,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: Bytes) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }

    pub fn failing_first(mut self, failures: usize) -> Self {
        self.failures_before_success = failures;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures_before_success {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            });
        }
        self.bodies.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Transform returning `"{W}x{H}.{format}"` as output bytes after a random
/// delay, so that tasks complete in shuffled order.
pub struct FakeTransform {
    metadata: SourceMetadata,
    max_delay_ms: u64,
    fail_widths: HashSet<u32>,
    panic_widths: HashSet<u32>,
    calls: AtomicUsize,
}

impl FakeTransform {
    pub fn new(metadata: SourceMetadata) -> Self {
        Self {
            metadata,
            max_delay_ms: 0,
            fail_widths: HashSet::new(),
            panic_widths: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_random_delay(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Fail every transform targeting this width.
    pub fn failing_width(mut self, width: u32) -> Self {
        self.fail_widths.insert(width);
        self
    }

    /// Panic inside every transform targeting this width.
    pub fn panicking_width(mut self, width: u32) -> Self {
        self.panic_widths.insert(width);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageTransform for FakeTransform {
    async fn metadata(&self, _data: Bytes) -> Result<SourceMetadata, TransformError> {
        Ok(self.metadata.clone())
    }

    async fn transform(
        &self,
        _data: Bytes,
        options: TransformOptions,
    ) -> Result<Bytes, TransformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        random_sleep(self.max_delay_ms).await;

        let width = options.width.unwrap_or(self.metadata.width);
        let height = options.height.unwrap_or(self.metadata.height);
        if self.panic_widths.contains(&width) {
            panic!("transform blew up for width {}", width);
        }
        if self.fail_widths.contains(&width) {
            return Err(TransformError::Decode(format!(
                "corrupt input for {}x{}",
                width, height
            )));
        }
        Ok(Bytes::from(format!("{}x{}.{}", width, height, options.format)))
    }
}

/// Store that fails the first `failures_per_key` puts of every key, and
/// every put of the keys marked broken, before writing to memory.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStorage,
    failures_per_key: usize,
    broken_keys: HashSet<String>,
    max_delay_ms: u64,
    attempts: Mutex<HashMap<String, usize>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(mut self, failures_per_key: usize) -> Self {
        self.failures_per_key = failures_per_key;
        self
    }

    pub fn broken_key(mut self, key: &str) -> Self {
        self.broken_keys.insert(key.to_string());
        self
    }

    pub fn with_random_delay(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Number of `put` calls seen for `key`.
    pub fn attempts(&self, key: &str) -> usize {
        let attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        attempts.get(key).copied().unwrap_or(0)
    }

    pub fn stored(&self) -> &MemoryStorage {
        &self.inner
    }
}

#[async_trait]
impl BlobStore for FlakyStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
            let count = attempts.entry(key.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        random_sleep(self.max_delay_ms).await;

        if self.broken_keys.contains(key) || attempt <= self.failures_per_key {
            return Err(StorageError::UploadFailed(format!(
                "simulated outage on attempt {} for {}",
                attempt, key
            )));
        }
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
