//! Sync coordination for the offline-aware sync tracker.
//!
//! [`SyncCoordinator`] bridges the UI's need for sync visibility with the
//! queue of not-yet-delivered local mutations (owned by the external
//! storage collaborator behind [`SyncStore`]) and with the background
//! worker that performs network sync on its own schedule (reached only
//! through the typed worker channel).
//!
//! At most one direct sync is in flight per coordinator instance; a second
//! request while one is outstanding is dropped, not queued. When the host
//! is offline, sync requests are forwarded to the background worker
//! instead, which may run them even after the host application is gone.

mod coordinator;
mod error;
mod progress;
mod store;

pub use coordinator::SyncCoordinator;
pub use error::{CoordinatorError, CoordinatorResult};
pub use progress::SyncProgress;
pub use store::{SyncStats, SyncStore, SyncStoreError};
