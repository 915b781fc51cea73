//! Sync progress snapshot type.

use serde::{Deserialize, Serialize};

/// Snapshot of sync activity surfaced to UI collaborators.
///
/// Owned and mutated exclusively by the coordinator; readers get copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    /// True while a sync request is outstanding.
    pub is_active: bool,
    /// Locally queued operations awaiting delivery.
    pub pending_count: u64,
    /// Operations that exhausted their retry attempts.
    pub failed_count: u64,
    /// When the last sync completed (UTC milliseconds), absent until then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<i64>,
}
