//! Sync coordinator: single-flight direct sync plus worker event intake.

use crate::{
    CoordinatorError, CoordinatorResult, SyncProgress, SyncStats, SyncStore,
};
use connection_monitor::ConnectionMonitor;
use std::sync::{Arc, Mutex};
use sync_worker_protocol::{CoordinatorEndpoint, WorkerMessage, WorkerMessageType};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Capacity of the progress snapshot fan-out.
const PROGRESS_CHANNEL_CAPACITY: usize = 32;

/// Coordinates sync requests between the UI, the storage collaborator, and
/// the background worker.
///
/// # Lifecycle
///
/// 1. Create with [`SyncCoordinator::new()`]
/// 2. Call [`SyncCoordinator::start()`] to spawn the worker event intake
/// 3. Trigger syncs with [`SyncCoordinator::request_sync()`] (the
///    orchestrator does this on every return to online)
///
/// # Thread Safety
///
/// The coordinator is designed for concurrent access: progress lives under
/// an `RwLock` and is handed out as copied snapshots; the single-flight
/// rule is a check-and-set under the state write lock.
pub struct SyncCoordinator {
    /// External storage collaborator owning the operation queue.
    store: Arc<dyn SyncStore>,
    /// Connection monitor supplying the derived online flag.
    monitor: Arc<ConnectionMonitor>,
    /// Sender for coordinator-to-worker requests.
    commands: mpsc::Sender<WorkerMessage>,
    /// Worker notification receiver (taken by the intake loop on start).
    notifications: Mutex<Option<mpsc::Receiver<WorkerMessage>>>,
    /// Current sync progress.
    state: Arc<RwLock<SyncProgress>>,
    /// Progress snapshot fan-out.
    progress_tx: broadcast::Sender<SyncProgress>,
    /// Intake loop handle.
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SyncCoordinator {
    /// Create a new coordinator wired to its collaborators.
    pub fn new(
        store: Arc<dyn SyncStore>,
        monitor: Arc<ConnectionMonitor>,
        endpoint: CoordinatorEndpoint,
    ) -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_CAPACITY);

        Self {
            store,
            monitor,
            commands: endpoint.commands,
            notifications: Mutex::new(Some(endpoint.notifications)),
            state: Arc::new(RwLock::new(SyncProgress::default())),
            progress_tx,
            task: Mutex::new(None),
        }
    }

    /// Start the worker notification intake loop.
    ///
    /// # Panics
    ///
    /// Panics if called more than once (the notification receiver can only
    /// be consumed once).
    pub fn start(&self) {
        let mut receiver = self
            .notifications
            .lock()
            .expect("lock poisoned")
            .take()
            .expect("SyncCoordinator already started");

        let store = self.store.clone();
        let state = self.state.clone();
        let progress_tx = self.progress_tx.clone();

        let handle = tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                handle_worker_message(&store, &state, &progress_tx, message).await;
            }
            debug!("Worker notification channel closed");
        });

        *self.task.lock().expect("lock poisoned") = Some(handle);
    }

    /// Stop the intake loop.
    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().expect("lock poisoned").take() {
            handle.abort();
        }
    }

    /// Request a synchronization of queued local mutations.
    ///
    /// A no-op while a sync is already in flight: the second request is
    /// dropped, not queued; the periodic connectivity refresh and the
    /// worker's own background trigger cover the gap. When the host is
    /// online the store syncs directly and the worker is told about the
    /// completion for its own bookkeeping; when offline the request is
    /// forwarded to the worker, which can run it even after the host
    /// application is gone.
    pub async fn request_sync(&self) -> CoordinatorResult<()> {
        {
            let mut state = self.state.write().await;
            if state.is_active {
                debug!("Sync already in flight, dropping request");
                return Ok(());
            }
            state.is_active = true;
        }
        self.publish().await;

        if self.monitor.is_online().await {
            match self.store.force_sync_to_backend().await {
                Ok(()) => {
                    let now = chrono::Utc::now().timestamp_millis();
                    if let Err(err) = self.commands.send(WorkerMessage::sync_completed(now)).await
                    {
                        warn!(error = %err, "Could not notify worker of completed sync");
                    }
                    {
                        let mut state = self.state.write().await;
                        state.is_active = false;
                        state.last_sync_at = Some(now);
                    }
                    refresh_counts(&self.store, &self.state).await;
                    info!("Direct sync completed");
                }
                Err(err) => {
                    warn!(error = %err, "Direct sync failed");
                    let mut state = self.state.write().await;
                    state.is_active = false;
                    state.failed_count += 1;
                }
            }
            self.publish().await;
            Ok(())
        } else {
            debug!("Offline, forwarding sync request to background worker");
            let sent = self.commands.send(WorkerMessage::sync_request()).await;
            {
                let mut state = self.state.write().await;
                state.is_active = false;
            }
            self.publish().await;
            sent.map_err(|_| CoordinatorError::WorkerChannelClosed)
        }
    }

    /// Query current progress, merging the store's queue counts with the
    /// coordinator's activity flag.
    ///
    /// Never fails and never mutates state: when the store is unavailable
    /// the counts are reported as zero and the rest of the snapshot is
    /// unchanged.
    pub async fn get_sync_stats(&self) -> SyncProgress {
        let current = self.state.read().await.clone();

        match self.store.get_sync_stats().await {
            Ok(stats) => SyncProgress {
                is_active: current.is_active,
                pending_count: stats.pending_count,
                failed_count: stats.failed_count,
                last_sync_at: current.last_sync_at,
            },
            Err(err) => {
                warn!(error = %err, "Sync stats unavailable, reporting zero counts");
                SyncProgress {
                    is_active: current.is_active,
                    pending_count: 0,
                    failed_count: 0,
                    last_sync_at: current.last_sync_at,
                }
            }
        }
    }

    /// Ask the store and the background worker to discard their
    /// pending-operation records. Best-effort: failures are logged.
    pub async fn clear_sync_queue(&self) {
        if let Err(err) = self.store.clear_sync_queue().await {
            warn!(error = %err, "Storage did not clear its sync queue");
        }
        if let Err(err) = self.commands.send(WorkerMessage::clear_sync_queue()).await {
            warn!(error = %err, "Worker did not receive the clear request");
        }

        {
            let mut state = self.state.write().await;
            state.pending_count = 0;
            state.failed_count = 0;
        }
        self.publish().await;
    }

    /// Copied snapshot of the current progress.
    pub async fn snapshot(&self) -> SyncProgress {
        self.state.read().await.clone()
    }

    /// Subscribe to progress changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncProgress> {
        self.progress_tx.subscribe()
    }

    async fn publish(&self) {
        publish_snapshot(&self.state, &self.progress_tx).await;
    }
}

impl Drop for SyncCoordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Apply one worker notification to the coordinator state.
async fn handle_worker_message(
    store: &Arc<dyn SyncStore>,
    state: &Arc<RwLock<SyncProgress>>,
    progress_tx: &broadcast::Sender<SyncProgress>,
    message: WorkerMessage,
) {
    match message.msg_type {
        WorkerMessageType::SyncStarted => {
            debug!("Worker reported sync started");
            state.write().await.is_active = true;
            publish_snapshot(state, progress_tx).await;
        }
        WorkerMessageType::SyncCompleted => {
            let timestamp = message
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
            {
                let mut guard = state.write().await;
                guard.is_active = false;
                guard.last_sync_at = Some(timestamp);
            }
            refresh_counts(store, state).await;
            publish_snapshot(state, progress_tx).await;
            info!(timestamp, "Worker reported sync completed");
        }
        WorkerMessageType::SyncFailed => {
            warn!(
                error = message.error.as_deref().unwrap_or("unknown"),
                "Worker reported sync failed"
            );
            {
                let mut guard = state.write().await;
                guard.is_active = false;
                guard.failed_count += 1;
            }
            // Queue accounting is authoritative when the store answers
            refresh_counts(store, state).await;
            publish_snapshot(state, progress_tx).await;
        }
        WorkerMessageType::SyncRequest | WorkerMessageType::ClearSyncQueue => {
            debug!(
                msg_type = ?message.msg_type,
                "Ignoring request message on the notification channel"
            );
        }
    }
}

/// Refresh queue counts from the store, tolerating its absence.
async fn refresh_counts(store: &Arc<dyn SyncStore>, state: &Arc<RwLock<SyncProgress>>) {
    match store.get_sync_stats().await {
        Ok(SyncStats {
            pending_count,
            failed_count,
        }) => {
            let mut guard = state.write().await;
            guard.pending_count = pending_count;
            guard.failed_count = failed_count;
        }
        Err(err) => {
            debug!(error = %err, "Skipping queue count refresh");
        }
    }
}

/// Fan the current snapshot out to subscribers.
async fn publish_snapshot(
    state: &Arc<RwLock<SyncProgress>>,
    progress_tx: &broadcast::Sender<SyncProgress>,
) {
    let snapshot = state.read().await.clone();
    let _ = progress_tx.send(snapshot);
}
