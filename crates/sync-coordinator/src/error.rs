//! Error types for sync coordination.

use thiserror::Error;

/// Error type for coordinator operations.
///
/// Storage and worker failures during a sync are recovered locally (logged
/// and reflected in the failure accounting); only a torn-down worker
/// channel surfaces as an error, since no further sync can ever be queued
/// through it.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The background worker channel is closed.
    #[error("Background worker channel closed")]
    WorkerChannelClosed,
}

/// Result type alias for coordinator operations.
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_channel_closed_display() {
        let err = CoordinatorError::WorkerChannelClosed;
        assert_eq!(format!("{}", err), "Background worker channel closed");
    }
}
