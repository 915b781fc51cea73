//! Wiring for the offline-aware sync status tracker.
//!
//! The host application constructs one [`SyncStatusOrchestrator`] at
//! startup and keeps it for the life of the process. The orchestrator owns
//! the [`ConnectionMonitor`] and [`SyncCoordinator`] instances, bridges the
//! two (a return to online triggers a sync request), and hands the
//! [`WorkerEndpoint`] to whatever runtime hosts the background worker.
//!
//! UI collaborators get read handles via [`monitor`](SyncStatusOrchestrator::monitor)
//! and [`coordinator`](SyncStatusOrchestrator::coordinator); they subscribe
//! or poll, and never mutate tracker state.
//!
//! Construction is the only operation that surfaces an error to the user:
//! there is no safe default state when the backend endpoint cannot even be
//! parsed, so [`OrchestratorError`] carries a displayable message for the
//! host to show.

use connection_monitor::{
    ConnectionMonitor, ConnectionMonitorConfig, ConnectivitySource, HttpReachabilityProbe,
    ReachabilityProbe,
};
use std::sync::{Arc, Mutex};
use sync_coordinator::{SyncCoordinator, SyncStore};
use sync_worker_protocol::{worker_channel, WorkerEndpoint, DEFAULT_CHANNEL_CAPACITY};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tracker_config_and_utils::Config;

/// Error type for orchestrator construction.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A dependent component could not be constructed.
    #[error("Initialization failed: {0}")]
    Init(String),
}

/// Owns and wires the connection monitor and the sync coordinator.
pub struct SyncStatusOrchestrator {
    monitor: Arc<ConnectionMonitor>,
    coordinator: Arc<SyncCoordinator>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncStatusOrchestrator {
    /// Build the tracker from application config.
    ///
    /// Returns the orchestrator together with the worker-side channel
    /// endpoint for the host's background worker runtime.
    pub fn new(
        config: &Config,
        source: Arc<dyn ConnectivitySource>,
        store: Arc<dyn SyncStore>,
    ) -> Result<(Self, WorkerEndpoint), OrchestratorError> {
        let monitor_config = ConnectionMonitorConfig::default();

        let probe = HttpReachabilityProbe::new(
            &config.backend_url,
            &config.backend_publishable_key,
            monitor_config.probe_timeout,
        )
        .map_err(|err| OrchestratorError::Init(err.to_string()))?;

        Ok(Self::with_parts(
            monitor_config,
            Arc::new(probe),
            source,
            store,
        ))
    }

    /// Build the tracker from explicit parts (custom probe or tuning).
    pub fn with_parts(
        monitor_config: ConnectionMonitorConfig,
        probe: Arc<dyn ReachabilityProbe>,
        source: Arc<dyn ConnectivitySource>,
        store: Arc<dyn SyncStore>,
    ) -> (Self, WorkerEndpoint) {
        let monitor = Arc::new(ConnectionMonitor::new(source, probe, monitor_config));

        let (coordinator_end, worker_end) = worker_channel(DEFAULT_CHANNEL_CAPACITY);
        let coordinator = Arc::new(SyncCoordinator::new(
            store,
            monitor.clone(),
            coordinator_end,
        ));

        (
            Self {
                monitor,
                coordinator,
                tasks: Mutex::new(Vec::new()),
            },
            worker_end,
        )
    }

    /// Start both components and the online-transition bridge.
    ///
    /// Calling `start` again while running is a no-op.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock().expect("lock poisoned");
        if !tasks.is_empty() {
            debug!("Orchestrator already started");
            return;
        }

        self.monitor.start();
        self.coordinator.start();

        let monitor = self.monitor.clone();
        let coordinator = self.coordinator.clone();
        let mut updates = self.monitor.subscribe();

        tasks.push(tokio::spawn(async move {
            let mut was_online = monitor.is_online().await;
            loop {
                match updates.recv().await {
                    Ok(status) => {
                        if status.is_online && !was_online {
                            debug!("Back online, requesting sync");
                            if let Err(err) = coordinator.request_sync().await {
                                warn!(error = %err, "Could not request sync after reconnect");
                            }
                        }
                        was_online = status.is_online;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Status updates lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));
    }

    /// Stop the bridge and both components.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock().expect("lock poisoned");
        for task in tasks.drain(..) {
            task.abort();
        }
        self.monitor.stop();
        self.coordinator.stop();
    }

    /// Read handle for connection status consumers.
    pub fn monitor(&self) -> Arc<ConnectionMonitor> {
        self.monitor.clone()
    }

    /// Read handle for sync progress consumers.
    pub fn coordinator(&self) -> Arc<SyncCoordinator> {
        self.coordinator.clone()
    }
}

impl Drop for SyncStatusOrchestrator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connection_monitor::{ChannelConnectivitySource, ProbeOutcome};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use sync_coordinator::{SyncStats, SyncStoreError};
    use sync_worker_protocol::WorkerMessage;

    struct StaticProbe;

    #[async_trait]
    impl ReachabilityProbe for StaticProbe {
        async fn probe(&self) -> ProbeOutcome {
            ProbeOutcome {
                reachable: true,
                duration: Duration::from_millis(10),
            }
        }
    }

    struct CountingStore {
        sync_calls: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sync_calls: AtomicUsize::new(0),
            })
        }

        fn sync_calls(&self) -> usize {
            self.sync_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SyncStore for CountingStore {
        async fn force_sync_to_backend(&self) -> Result<(), SyncStoreError> {
            self.sync_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn get_sync_stats(&self) -> Result<SyncStats, SyncStoreError> {
            Ok(SyncStats::default())
        }

        async fn clear_sync_queue(&self) -> Result<(), SyncStoreError> {
            Ok(())
        }
    }

    fn tracker_with_source(
        online: bool,
    ) -> (
        SyncStatusOrchestrator,
        WorkerEndpoint,
        Arc<ChannelConnectivitySource>,
        Arc<CountingStore>,
    ) {
        let source = Arc::new(ChannelConnectivitySource::new(online));
        let store = CountingStore::new();
        let (orchestrator, worker) = SyncStatusOrchestrator::with_parts(
            ConnectionMonitorConfig::default(),
            Arc::new(StaticProbe),
            source.clone(),
            store.clone(),
        );
        (orchestrator, worker, source, store)
    }

    #[tokio::test]
    async fn reconnect_triggers_one_sync_request() {
        let (orchestrator, _worker, source, store) = tracker_with_source(false);
        orchestrator.start();
        tokio::time::sleep(Duration::from_millis(50)).await;

        source.set_online(true).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.sync_calls(), 1);
        assert!(orchestrator.monitor().current().await.is_online);
    }

    #[tokio::test]
    async fn startup_while_online_is_not_a_transition() {
        let (orchestrator, _worker, _source, store) = tracker_with_source(true);
        orchestrator.start();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.sync_calls(), 0);
    }

    #[tokio::test]
    async fn worker_notifications_reach_the_coordinator() {
        let (orchestrator, worker, _source, _store) = tracker_with_source(true);
        orchestrator.start();

        worker
            .notifications
            .send(WorkerMessage::sync_started(1700000000000))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(orchestrator.coordinator().snapshot().await.is_active);
    }

    #[tokio::test]
    async fn shutdown_stops_reacting_to_transitions() {
        let (orchestrator, _worker, source, store) = tracker_with_source(false);
        orchestrator.start();
        tokio::time::sleep(Duration::from_millis(50)).await;

        orchestrator.shutdown();
        source.set_online(true).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.sync_calls(), 0);
    }

    #[tokio::test]
    async fn invalid_backend_url_is_a_visible_init_error() {
        let mut config = Config::default();
        config.backend_url = "not a valid url".to_string();

        let source = Arc::new(ChannelConnectivitySource::new(true));
        let result = SyncStatusOrchestrator::new(&config, source, CountingStore::new());

        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.starts_with("Initialization failed:"));
    }
}
