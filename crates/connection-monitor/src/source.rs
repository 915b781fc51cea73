//! Host connectivity signals.
//!
//! The host environment owns the authoritative online/offline flag and
//! delivers transition notifications. Platform layers implement
//! [`ConnectivitySource`] over their native notifications;
//! [`ChannelConnectivitySource`] is a programmatic implementation for hosts
//! that receive the signal from elsewhere (and for tests).

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Capacity of the transition event fan-out.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// An online/offline transition reported by the host.
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityEvent {
    /// The flag before the transition.
    pub was_online: bool,
    /// The flag after the transition.
    pub is_online: bool,
    /// When the transition was observed (UTC milliseconds).
    pub timestamp: i64,
}

/// Source of host connectivity state (implemented by the platform layer).
#[async_trait]
pub trait ConnectivitySource: Send + Sync {
    /// Current host network-availability flag.
    async fn is_online(&self) -> bool;

    /// Subscribe to online/offline transition notifications.
    fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent>;
}

/// Connectivity source driven programmatically via [`set_online`].
///
/// Transitions are fanned out to all subscribers; setting the same value
/// twice publishes nothing.
///
/// [`set_online`]: ChannelConnectivitySource::set_online
#[derive(Debug)]
pub struct ChannelConnectivitySource {
    online: Arc<RwLock<bool>>,
    events: broadcast::Sender<ConnectivityEvent>,
}

impl ChannelConnectivitySource {
    /// Create a source with the given initial flag.
    pub fn new(initially_online: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            online: Arc::new(RwLock::new(initially_online)),
            events,
        }
    }

    /// Update the host flag, publishing a transition event on change.
    pub async fn set_online(&self, online: bool) {
        let was_online = {
            let mut guard = self.online.write().await;
            let previous = *guard;
            *guard = online;
            previous
        };

        if was_online != online {
            let _ = self.events.send(ConnectivityEvent {
                was_online,
                is_online: online,
                timestamp: chrono::Utc::now().timestamp_millis(),
            });
        }
    }
}

#[async_trait]
impl ConnectivitySource for ChannelConnectivitySource {
    async fn is_online(&self) -> bool {
        *self.online.read().await
    }

    fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent> {
        self.events.subscribe()
    }
}
