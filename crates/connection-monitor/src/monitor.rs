//! Connection monitor: cached probing plus host event intake.

use crate::{ConnectionStatus, ConnectivitySource, ProbeOutcome, ReachabilityProbe};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, warn};

/// Capacity of the status change fan-out.
const STATUS_CHANNEL_CAPACITY: usize = 32;

/// Tuning knobs for the connection monitor.
///
/// # Fields
///
/// - `probe_timeout`: hard per-probe timeout (default: 5s)
/// - `cache_ttl`: how long a probe result suppresses re-probing (default: 2 minutes)
/// - `refresh_interval`: cadence of the periodic re-check while online (default: 5 minutes)
/// - `poor_threshold`: round-trip above which a reachable probe is rated poor (default: 2000ms)
#[derive(Debug, Clone)]
pub struct ConnectionMonitorConfig {
    /// Hard timeout for a single reachability probe.
    pub probe_timeout: Duration,
    /// Probe results younger than this are served from cache.
    pub cache_ttl: Duration,
    /// How often to re-check reachability while online.
    pub refresh_interval: Duration,
    /// Round-trip threshold separating good from poor quality.
    pub poor_threshold: Duration,
}

impl Default for ConnectionMonitorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(120),
            refresh_interval: Duration::from_secs(300),
            poor_threshold: Duration::from_millis(2000),
        }
    }
}

/// A probe result held back for the cache TTL.
struct CachedCheck {
    status: ConnectionStatus,
    taken_at: Instant,
}

/// Tracks host connectivity and backend reachability.
///
/// Construct once at application start, call [`start`](Self::start), and
/// hand out clones of the `Arc` to readers. Readers get copied snapshots
/// via [`current`](Self::current) or the [`subscribe`](Self::subscribe)
/// feed; only the monitor itself mutates the status.
pub struct ConnectionMonitor {
    source: Arc<dyn ConnectivitySource>,
    probe: Arc<dyn ReachabilityProbe>,
    config: ConnectionMonitorConfig,
    status: Arc<RwLock<ConnectionStatus>>,
    cache: Arc<RwLock<Option<CachedCheck>>>,
    status_tx: broadcast::Sender<ConnectionStatus>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ConnectionMonitor {
    /// Create a new monitor over the given host source and probe.
    pub fn new(
        source: Arc<dyn ConnectivitySource>,
        probe: Arc<dyn ReachabilityProbe>,
        config: ConnectionMonitorConfig,
    ) -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);

        Self {
            source,
            probe,
            config,
            status: Arc::new(RwLock::new(ConnectionStatus::offline())),
            cache: Arc::new(RwLock::new(None)),
            status_tx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Check connectivity, probing the backend at most once per cache TTL.
    ///
    /// Short-circuits to the offline status without any network call when
    /// the host reports offline. Probe failures are absorbed into
    /// `is_backend_reachable = false`, never returned as errors.
    pub async fn check_connection(&self) -> ConnectionStatus {
        run_check(
            &self.source,
            &self.probe,
            &self.config,
            &self.status,
            &self.cache,
            &self.status_tx,
        )
        .await
    }

    /// Current host network-availability flag, straight from the source.
    pub async fn is_online(&self) -> bool {
        self.source.is_online().await
    }

    /// Copied snapshot of the last known status.
    pub async fn current(&self) -> ConnectionStatus {
        self.status.read().await.clone()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    /// Start the background loops: host event intake and periodic refresh.
    ///
    /// The refresh ticker fires immediately once, which doubles as the
    /// startup check. Calling `start` again while running is a no-op.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock().expect("lock poisoned");
        if !tasks.is_empty() {
            debug!("Connection monitor already started");
            return;
        }

        tasks.push(self.spawn_event_intake());
        tasks.push(self.spawn_periodic_refresh());
    }

    /// Stop the background loops.
    pub fn stop(&self) {
        let mut tasks = self.tasks.lock().expect("lock poisoned");
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    fn spawn_event_intake(&self) -> JoinHandle<()> {
        let mut events = self.source.subscribe();
        let source = self.source.clone();
        let probe = self.probe.clone();
        let config = self.config.clone();
        let status = self.status.clone();
        let cache = self.cache.clone();
        let status_tx = self.status_tx.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) if !event.is_online => {
                        // Going offline: flip immediately, no probe. The
                        // cache is invalidated so the next online check
                        // issues a real probe.
                        debug!("Host went offline");
                        cache.write().await.take();
                        publish(&status, &status_tx, ConnectionStatus::offline()).await;
                    }
                    Ok(_) => {
                        debug!("Host came online, checking connection");
                        run_check(&source, &probe, &config, &status, &cache, &status_tx).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Connectivity events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn spawn_periodic_refresh(&self) -> JoinHandle<()> {
        let source = self.source.clone();
        let probe = self.probe.clone();
        let config = self.config.clone();
        let status = self.status.clone();
        let cache = self.cache.clone();
        let status_tx = self.status_tx.clone();

        tokio::spawn(async move {
            let mut ticker = interval(config.refresh_interval);
            loop {
                ticker.tick().await;
                if source.is_online().await {
                    run_check(&source, &probe, &config, &status, &cache, &status_tx).await;
                }
            }
        })
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One connection check: offline short-circuit, cache lookup, probe.
async fn run_check(
    source: &Arc<dyn ConnectivitySource>,
    probe: &Arc<dyn ReachabilityProbe>,
    config: &ConnectionMonitorConfig,
    status: &Arc<RwLock<ConnectionStatus>>,
    cache: &Arc<RwLock<Option<CachedCheck>>>,
    status_tx: &broadcast::Sender<ConnectionStatus>,
) -> ConnectionStatus {
    if !source.is_online().await {
        let offline = ConnectionStatus::offline();
        publish(status, status_tx, offline.clone()).await;
        return offline;
    }

    if let Some(cached) = cache.read().await.as_ref() {
        if cached.taken_at.elapsed() < config.cache_ttl {
            return cached.status.clone();
        }
    }

    let ProbeOutcome {
        reachable,
        duration,
    } = probe.probe().await;

    let fresh = ConnectionStatus::from_probe(reachable, duration, config.poor_threshold);
    debug!(
        reachable,
        duration_ms = duration.as_millis() as u64,
        quality = %fresh.connection_quality,
        "Connection check completed"
    );

    *cache.write().await = Some(CachedCheck {
        status: fresh.clone(),
        taken_at: Instant::now(),
    });
    publish(status, status_tx, fresh.clone()).await;

    fresh
}

/// Store the new status and fan it out to subscribers.
async fn publish(
    status: &Arc<RwLock<ConnectionStatus>>,
    status_tx: &broadcast::Sender<ConnectionStatus>,
    fresh: ConnectionStatus,
) {
    *status.write().await = fresh.clone();
    let _ = status_tx.send(fresh);
}
