//! Application state shared by every handler.

use resizer_core::Config;
use resizer_worker::ResizeOrchestrator;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<ResizeOrchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: ResizeOrchestrator) -> Self {
        Self {
            config,
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Deadline of one resize or base64 request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs())
    }
}
