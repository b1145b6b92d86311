//! Request-level flow of a resize: validate, plan, fetch, fan out, aggregate.

use std::sync::Arc;
use std::time::Instant;

use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use resizer_core::constants::BASE64_LABEL;
use resizer_core::{AppError, FallbackVariant, Manifest, ResizeRequest, VariantSpec};
use resizer_infra::fetch::{parse_source_url, SourceFetcher};
use resizer_processing::{ImageTransform, OutputFormat, TransformOptions};
use resizer_storage::BlobStore;

use crate::aggregator::{ErrorAggregator, TaskFailure};
use crate::context::RequestContext;
use crate::counters::Counters;
use crate::executor::{TaskExecutor, TaskOutcome};
use crate::manifest;
use crate::planner;
use crate::retry::RetryPolicy;

/// Outcome of one resize request.
#[derive(Debug)]
pub enum RequestOutcome {
    /// Every planned variant was stored or skipped.
    Ok(Manifest),
    /// At least one variant failed; successful variants stay stored.
    PartialFailure(Vec<TaskFailure>),
    /// The request failed before any variant was produced.
    Fatal(AppError),
}

/// Owns the external capabilities and the counters of the service.
pub struct ResizeOrchestrator {
    fetcher: Arc<dyn SourceFetcher>,
    transform: Arc<dyn ImageTransform>,
    executor: TaskExecutor,
    counters: Arc<Counters>,
    fallback: Option<FallbackVariant>,
    retry: RetryPolicy,
}

impl ResizeOrchestrator {
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        transform: Arc<dyn ImageTransform>,
        store: Arc<dyn BlobStore>,
        fallback: Option<FallbackVariant>,
    ) -> Self {
        let counters = Arc::new(Counters::new());
        let executor = TaskExecutor::new(transform.clone(), store, counters.clone());
        Self {
            fetcher,
            transform,
            executor,
            counters,
            fallback,
            retry: RetryPolicy::default(),
        }
    }

    /// Policy used for both the source fetch and the variant stores.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.executor = self.executor.with_retry_policy(retry);
        self.retry = retry;
        self
    }

    pub fn counters(&self) -> &Arc<Counters> {
        &self.counters
    }

    pub fn fallback(&self) -> Option<&FallbackVariant> {
        self.fallback.as_ref()
    }

    /// Produce and store every variant of `request`.
    pub async fn resize(&self, request: &ResizeRequest, ctx: &RequestContext) -> RequestOutcome {
        let specs = match self.prepare(request) {
            Ok(specs) => specs,
            Err(e) => return RequestOutcome::Fatal(e),
        };

        let source = match self.fetch_source(&request.url, ctx).await {
            Ok(source) => source,
            Err(e) => {
                self.counters.record_failure();
                tracing::info!(url = %request.url, error = %e, "Failed to download image");
                return RequestOutcome::Fatal(e);
            }
        };

        let metadata = match self.transform.metadata(source.clone()).await {
            Ok(metadata) => metadata,
            Err(e) => {
                self.counters.record_failure();
                tracing::info!(url = %request.url, error = %e, "Failed to read image metadata");
                return RequestOutcome::Fatal(AppError::ImageProcessing(e.to_string()));
            }
        };

        let start = Instant::now();
        let planned = specs.len();
        let outcomes = self.executor.execute(specs, source, &metadata, ctx).await;

        let aggregator = ErrorAggregator::new();
        let mut successes = Vec::with_capacity(outcomes.len());
        let mut skipped = 0;
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Success(success) => successes.push(success),
                TaskOutcome::Skipped { .. } => skipped += 1,
                TaskOutcome::Failure(failure) => aggregator.record(failure),
            }
        }
        let failures = aggregator.drain();

        tracing::info!(
            key = %request.key,
            planned,
            stored = successes.len(),
            skipped,
            failed = failures.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Resize batch finished"
        );

        if failures.is_empty() {
            RequestOutcome::Ok(manifest::assemble(&metadata, &successes))
        } else {
            RequestOutcome::PartialFailure(failures)
        }
    }

    /// Resize the source to the first requested size and return it as
    /// base64-encoded webp instead of storing it.
    pub async fn to_base64(
        &self,
        request: &ResizeRequest,
        ctx: &RequestContext,
    ) -> Result<String, AppError> {
        validate_url(&request.url)?;
        let size = request
            .sizes
            .first()
            .ok_or_else(|| AppError::InvalidInput("sizes must not be empty".to_string()))?
            .resolve()
            .map_err(|e| AppError::InvalidInput(format!("sizes[0]: {}", e)))?;

        let result: Result<Bytes, AppError> = async {
            let source = self.fetch_source(&request.url, ctx).await?;
            let options = TransformOptions::fit(size.width, size.height, OutputFormat::WebP);
            ctx.guard(self.transform.transform(source, options))
                .await
                .map_err(|e| AppError::Cancelled(e.to_string()))?
                .map_err(|e| AppError::ImageProcessing(e.to_string()))
        }
        .await;

        match result {
            Ok(output) => {
                self.counters.record_resized(BASE64_LABEL);
                Ok(general_purpose::STANDARD.encode(&output))
            }
            Err(e) => {
                self.counters.record_failure();
                tracing::info!(url = %request.url, error = %e, "Failed to resize image for base64");
                Err(e)
            }
        }
    }

    /// Validation and planning; nothing runs when this fails.
    fn prepare(&self, request: &ResizeRequest) -> Result<Vec<VariantSpec>, AppError> {
        validate_url(&request.url)?;
        planner::plan(request, self.fallback.as_ref())
            .map_err(|e| AppError::InvalidInput(e.to_string()))
    }

    async fn fetch_source(&self, url: &str, ctx: &RequestContext) -> Result<Bytes, AppError> {
        ctx.guard(self.retry.run(|| self.fetcher.fetch(url)))
            .await
            .map_err(|e| AppError::Cancelled(e.to_string()))?
            .map_err(|e| AppError::Fetch(e.to_string()))
    }
}

fn validate_url(url: &str) -> Result<(), AppError> {
    parse_source_url(url)
        .map(|_| ())
        .map_err(|e| AppError::InvalidInput(format!("url: {}", e)))
}
