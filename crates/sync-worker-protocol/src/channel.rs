//! Channel pair connecting the coordinator and the background worker.

use crate::WorkerMessage;
use tokio::sync::mpsc;

/// Default capacity for each direction of the worker channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// The coordinator's half of the worker channel.
///
/// Commands flow out through `commands`; worker notifications arrive on
/// `notifications`, which the coordinator consumes exactly once when its
/// event loop starts.
pub struct CoordinatorEndpoint {
    /// Sender for coordinator-to-worker requests.
    pub commands: mpsc::Sender<WorkerMessage>,
    /// Receiver for worker-to-coordinator notifications.
    pub notifications: mpsc::Receiver<WorkerMessage>,
}

/// The worker's half of the channel, handed to the host's worker runtime.
pub struct WorkerEndpoint {
    /// Receiver for coordinator-to-worker requests.
    pub commands: mpsc::Receiver<WorkerMessage>,
    /// Sender for worker-to-coordinator notifications.
    pub notifications: mpsc::Sender<WorkerMessage>,
}

/// Create a connected pair of channel endpoints.
pub fn worker_channel(capacity: usize) -> (CoordinatorEndpoint, WorkerEndpoint) {
    let (command_tx, command_rx) = mpsc::channel(capacity);
    let (notification_tx, notification_rx) = mpsc::channel(capacity);

    (
        CoordinatorEndpoint {
            commands: command_tx,
            notifications: notification_rx,
        },
        WorkerEndpoint {
            commands: command_rx,
            notifications: notification_tx,
        },
    )
}
