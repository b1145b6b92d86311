//! Collector of per-variant failures.

use std::sync::Mutex;

use resizer_processing::TransformError;
use resizer_storage::StorageError;
use thiserror::Error;

use crate::context::Interrupted;

/// Cause of one failed variant task.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Store(#[from] StorageError),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    #[error("task panicked: {0}")]
    Panicked(String),
}

/// One failed variant: its label, the key it would have been stored
/// under, and the cause.
#[derive(Debug)]
pub struct TaskFailure {
    pub label: String,
    pub storage_key: String,
    pub cause: TaskError,
}

/// Concurrency-safe sink of task failures. Entries keep recording
/// (completion) order.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    failures: Mutex<Vec<TaskFailure>>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, failure: TaskFailure) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(failure);
    }

    /// Take every recorded failure. Empty means the batch succeeded.
    pub fn drain(&self) -> Vec<TaskFailure> {
        std::mem::take(&mut *self.failures.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn len(&self) -> usize {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn failure(label: &str) -> TaskFailure {
        TaskFailure {
            label: label.to_string(),
            storage_key: format!("a_{}.webp", label),
            cause: TaskError::Panicked("boom".to_string()),
        }
    }

    #[test]
    fn test_drain_empties() {
        let aggregator = ErrorAggregator::new();
        assert!(aggregator.drain().is_empty());

        aggregator.record(failure("1x1"));
        aggregator.record(failure("2x2"));
        assert_eq!(aggregator.len(), 2);

        let drained = aggregator.drain();
        let labels: Vec<&str> = drained.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["1x1", "2x2"]);
        assert!(aggregator.is_empty());
    }

    #[test]
    fn test_task_error_displays_cause_verbatim() {
        let err = TaskError::from(StorageError::UploadFailed("bucket gone".to_string()));
        assert_eq!(err.to_string(), "Upload failed: bucket gone");
        let err = TaskError::from(Interrupted::DeadlineExceeded);
        assert_eq!(err.to_string(), "deadline exceeded");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_record() {
        let aggregator = Arc::new(ErrorAggregator::new());
        let mut handles = Vec::new();
        for i in 0..50 {
            let aggregator = aggregator.clone();
            handles.push(tokio::spawn(async move {
                aggregator.record(failure(&format!("{}x{}", i + 1, i + 1)));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(aggregator.drain().len(), 50);
    }
}
