//! Per-request processing bound

use crate::error::{Result, TransformError};
use std::time::{Duration, Instant};

/// Point in time after which a transformation must give up.
///
/// Copied freely into blocking workers; engines poll it between steps and
/// while waiting on child processes.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Option<Instant>,
    limit: Duration,
}

impl Deadline {
    /// A deadline that never expires
    pub fn none() -> Self {
        Self {
            expires_at: None,
            limit: Duration::MAX,
        }
    }

    pub fn after(limit: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(limit),
            limit,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|at| Instant::now() >= at)
            .unwrap_or(false)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Fails with [`TransformError::TimedOut`] once the deadline has passed.
    pub fn check(&self, stage: &str) -> Result<()> {
        if self.is_expired() {
            return Err(self.timed_out(stage));
        }
        Ok(())
    }

    pub(crate) fn timed_out(&self, stage: &str) -> TransformError {
        TransformError::TimedOut {
            stage: stage.to_string(),
            limit: self.limit,
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_never_expires() {
        let deadline = Deadline::none();
        assert!(!deadline.is_expired());
        assert!(deadline.remaining().is_none());
        assert!(deadline.check("anything").is_ok());
    }

    #[test]
    fn test_zero_deadline_is_expired() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(deadline.is_expired());
        let err = deadline.check("rasterize").unwrap_err();
        assert!(matches!(err, TransformError::TimedOut { ref stage, .. } if stage == "rasterize"));
    }

    #[test]
    fn test_generous_deadline_has_time_left() {
        let deadline = Deadline::after(Duration::from_secs(3600));
        assert!(!deadline.is_expired());
        assert!(deadline.remaining().unwrap() > Duration::from_secs(3500));
        assert_eq!(deadline.limit(), Duration::from_secs(3600));
    }
}
