//! Per-request cancellation and deadline.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("request cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation token plus optional deadline shared by every task of one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl RequestContext {
    /// Context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Context without deadline; only explicit cancellation ends it.
    pub fn unbounded() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancels the context when dropped, e.g. when an HTTP handler future is
    /// dropped after a client disconnect.
    pub fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Current state without waiting.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.token.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` until it completes, the context is cancelled or the
    /// deadline passes, whichever comes first.
    pub async fn guard<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Interrupted::Cancelled),
            _ = deadline => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guard_passes_output_through() {
        let ctx = RequestContext::unbounded();
        assert_eq!(ctx.guard(async { 42 }).await, Ok(42));
        assert_eq!(ctx.check(), Ok(()));
    }

    #[tokio::test]
    async fn test_guard_fails_fast_on_cancel() {
        let ctx = RequestContext::unbounded();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let start = std::time::Instant::now();
        let result = ctx
            .guard(tokio::time::sleep(Duration::from_secs(30)))
            .await;

        assert_eq!(result, Err(Interrupted::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(ctx.check(), Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn test_guard_fails_on_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(10));
        let result = ctx
            .guard(tokio::time::sleep(Duration::from_secs(30)))
            .await;

        assert_eq!(result, Err(Interrupted::DeadlineExceeded));
        assert_eq!(ctx.check(), Err(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_drop_guard_cancels() {
        let ctx = RequestContext::unbounded();
        {
            let _guard = ctx.drop_guard();
        }
        assert!(ctx.token().is_cancelled());
    }
}
