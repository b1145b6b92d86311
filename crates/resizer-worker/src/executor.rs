//! Concurrent execution of planned variants.
//!
//! One tokio task is spawned per [`VariantSpec`]. Each task transforms the
//! shared source and stores the result under the planned key, retrying the
//! store with the configured [`RetryPolicy`]. [`TaskExecutor::execute`] only
//! returns once every task has finished, with exactly one [`TaskOutcome`]
//! per spec.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use resizer_core::{Size, SourceMetadata, VariantSpec};
use resizer_processing::{ImageTransform, OutputFormat, TransformOptions};
use resizer_storage::{BlobStore, StorageError};
use tokio::task::JoinSet;

use crate::aggregator::{TaskError, TaskFailure};
use crate::context::RequestContext;
use crate::counters::Counters;
use crate::retry::RetryPolicy;

/// A variant that was transformed and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSuccess {
    pub label: String,
    pub key: String,
    pub width: u32,
    pub height: u32,
}

/// Result of one variant task.
#[derive(Debug)]
pub enum TaskOutcome {
    Success(TaskSuccess),
    /// Requested size exceeds the source in both dimensions; nothing was produced.
    Skipped { label: String, key: String },
    Failure(TaskFailure),
}

impl TaskOutcome {
    pub fn label(&self) -> &str {
        match self {
            TaskOutcome::Success(success) => &success.label,
            TaskOutcome::Skipped { label, .. } => label,
            TaskOutcome::Failure(failure) => &failure.label,
        }
    }
}

#[derive(Clone)]
pub struct TaskExecutor {
    transform: Arc<dyn ImageTransform>,
    store: Arc<dyn BlobStore>,
    counters: Arc<Counters>,
    retry: RetryPolicy,
}

impl TaskExecutor {
    pub fn new(
        transform: Arc<dyn ImageTransform>,
        store: Arc<dyn BlobStore>,
        counters: Arc<Counters>,
    ) -> Self {
        Self {
            transform,
            store,
            counters,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run every spec concurrently and wait for all of them.
    ///
    /// Outcomes are returned in completion order. A task that panics is
    /// reported as a failure of its variant.
    pub async fn execute(
        &self,
        specs: Vec<VariantSpec>,
        source: Bytes,
        metadata: &SourceMetadata,
        ctx: &RequestContext,
    ) -> Vec<TaskOutcome> {
        let metadata = Arc::new(metadata.clone());
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::with_capacity(specs.len());

        for spec in specs {
            let identity = (spec.label(), spec.storage_key.clone());
            let executor = self.clone();
            let source = source.clone();
            let metadata = metadata.clone();
            let ctx = ctx.clone();

            let handle =
                tasks.spawn(async move { executor.run_task(spec, source, &metadata, &ctx).await });
            pending.insert(handle.id(), identity);
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, outcome)) => {
                    pending.remove(&id);
                    outcomes.push(outcome);
                }
                Err(e) => {
                    let (label, storage_key) = pending.remove(&e.id()).unwrap_or_default();
                    self.counters.record_failure();
                    tracing::error!(
                        label = %label,
                        key = %storage_key,
                        error = %e,
                        "Variant task aborted"
                    );
                    outcomes.push(TaskOutcome::Failure(TaskFailure {
                        label,
                        storage_key,
                        cause: TaskError::Panicked(e.to_string()),
                    }));
                }
            }
        }

        outcomes
    }

    async fn run_task(
        &self,
        spec: VariantSpec,
        source: Bytes,
        metadata: &SourceMetadata,
        ctx: &RequestContext,
    ) -> TaskOutcome {
        let label = spec.label();

        if spec.is_upscale(metadata) {
            tracing::debug!(
                label = %label,
                key = %spec.storage_key,
                source_width = metadata.width,
                source_height = metadata.height,
                "Skipping variant larger than source"
            );
            return TaskOutcome::Skipped {
                label,
                key: spec.storage_key,
            };
        }

        let size = spec.effective_size(metadata);
        match self.produce(&spec, &label, size, source, ctx).await {
            Ok(()) => {
                self.counters.record_resized(&label);
                TaskOutcome::Success(TaskSuccess {
                    label,
                    key: spec.storage_key,
                    width: size.width,
                    height: size.height,
                })
            }
            Err(cause) => {
                self.counters.record_failure();
                tracing::warn!(
                    label = %label,
                    key = %spec.storage_key,
                    error = %cause,
                    "Variant failed"
                );
                TaskOutcome::Failure(TaskFailure {
                    label,
                    storage_key: spec.storage_key,
                    cause,
                })
            }
        }
    }

    /// Transform once, then store with retry.
    async fn produce(
        &self,
        spec: &VariantSpec,
        label: &str,
        size: Size,
        source: Bytes,
        ctx: &RequestContext,
    ) -> Result<(), TaskError> {
        ctx.check()?;
        let format: OutputFormat = spec.target_format.parse()?;

        let start = Instant::now();
        let options = TransformOptions::fit(size.width, size.height, format);
        let output = ctx.guard(self.transform.transform(source, options)).await??;

        tracing::info!(
            label = %label,
            key = %spec.storage_key,
            size_bytes = output.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Variant transformed"
        );

        let content_type = format.content_type();
        let store = self.retry.run_if(
            || self.store.put(&spec.storage_key, output.clone(), content_type),
            StorageError::is_retryable,
        );
        ctx.guard(store).await??;

        tracing::debug!(label = %label, key = %spec.storage_key, "Variant stored");
        Ok(())
    }
}
