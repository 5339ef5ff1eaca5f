use crate::error::AppError;
use pdfsmith::{Deadline, Engines, TransformResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 64;

/// Transport-level settings, fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Upper bound on a single transformation, including engine runs
    pub request_timeout: Duration,
    /// Largest request body accepted, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

/// Shared handler state. Cloning only bumps reference counts.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engines: Engines,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(engines: Engines, config: ServiceConfig) -> Self {
        Self {
            engines,
            config: Arc::new(config),
        }
    }

    /// Runs a transformation on the blocking pool under a fresh deadline.
    pub async fn run<F>(&self, operation: F) -> Result<TransformResult, AppError>
    where
        F: FnOnce(&Engines, Deadline) -> pdfsmith::Result<TransformResult> + Send + 'static,
    {
        let engines = self.engines.clone();
        let deadline = Deadline::after(self.config.request_timeout);
        debug!(limit_secs = deadline.limit().as_secs(), "dispatching to blocking pool");

        let result = tokio::task::spawn_blocking(move || operation(&engines, deadline)).await??;
        Ok(result)
    }
}
