//! Storage collaborator contract.
//!
//! The queue of not-yet-delivered local mutations lives in the external
//! storage manager; the coordinator only drives it and observes its size.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by the storage collaborator.
#[derive(Debug, Error)]
pub enum SyncStoreError {
    /// The storage collaborator is not available.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Delivery to the backend was rejected.
    #[error("Backend sync failed: {0}")]
    Backend(String),
}

/// Queue accounting reported by the storage collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    /// Locally queued operations awaiting delivery.
    pub pending_count: u64,
    /// Operations that exhausted their retry attempts.
    pub failed_count: u64,
}

/// Contract implemented by the external storage manager.
///
/// Consumed as `Arc<dyn SyncStore>`; the coordinator tolerates every
/// method failing and never lets a store error escape to callers.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Push all queued local mutations to the backend now.
    async fn force_sync_to_backend(&self) -> Result<(), SyncStoreError>;

    /// Current pending/failed queue counts.
    async fn get_sync_stats(&self) -> Result<SyncStats, SyncStoreError>;

    /// Discard all pending-operation records.
    async fn clear_sync_queue(&self) -> Result<(), SyncStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_default_is_zero() {
        let stats = SyncStats::default();
        assert_eq!(stats.pending_count, 0);
        assert_eq!(stats.failed_count, 0);
    }

    #[test]
    fn store_error_display() {
        let err = SyncStoreError::Unavailable("database not initialized".to_string());
        assert_eq!(
            format!("{}", err),
            "Storage unavailable: database not initialized"
        );

        let err = SyncStoreError::Backend("409 conflict".to_string());
        assert_eq!(format!("{}", err), "Backend sync failed: 409 conflict");
    }
}
