//! Dispatcher error types

use thiserror::Error;

/// Errors surfaced by the dispatcher
///
/// A worker failure is delivered only to the caller whose item failed; it
/// never affects other pending or running items.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Concurrency limit must be at least 1, got {0}")]
    InvalidLimit(usize),

    #[error("Worker failed: {0}")]
    Worker(eyre::Report),

    #[error("Worker panicked while processing the item")]
    WorkerPanicked,

    #[error("Dispatcher shut down before the item settled")]
    Disconnected,
}

impl From<eyre::Report> for DispatchError {
    fn from(report: eyre::Report) -> Self {
        DispatchError::Worker(report)
    }
}

impl DispatchError {
    /// Check if this error came from the worker itself rather than the
    /// dispatcher machinery
    pub fn is_worker_failure(&self) -> bool {
        matches!(self, DispatchError::Worker(_) | DispatchError::WorkerPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::eyre;

    #[test]
    fn test_is_worker_failure() {
        assert!(DispatchError::Worker(eyre!("boom")).is_worker_failure());
        assert!(DispatchError::WorkerPanicked.is_worker_failure());
        assert!(!DispatchError::InvalidLimit(0).is_worker_failure());
        assert!(!DispatchError::Disconnected.is_worker_failure());
    }

    #[test]
    fn test_from_report() {
        let err: DispatchError = eyre!("worker blew up").into();
        assert!(matches!(err, DispatchError::Worker(_)));
        assert_eq!(err.to_string(), "Worker failed: worker blew up");
    }
}
