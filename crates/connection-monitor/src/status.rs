//! Connection status snapshot types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tri-state estimate of the connection to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionQuality {
    /// Backend reachable within the round-trip threshold.
    Good,
    /// Backend reachable, but the probe was slow.
    Poor,
    /// Host offline or backend unreachable.
    Offline,
}

impl ConnectionQuality {
    /// Derive quality from a probe result.
    ///
    /// `Offline` when unreachable; otherwise `Poor` when the round-trip
    /// exceeded `poor_threshold`, else `Good`.
    pub fn derive(reachable: bool, duration: Duration, poor_threshold: Duration) -> Self {
        if !reachable {
            ConnectionQuality::Offline
        } else if duration > poor_threshold {
            ConnectionQuality::Poor
        } else {
            ConnectionQuality::Good
        }
    }
}

impl std::fmt::Display for ConnectionQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionQuality::Good => write!(f, "good"),
            ConnectionQuality::Poor => write!(f, "poor"),
            ConnectionQuality::Offline => write!(f, "offline"),
        }
    }
}

/// Snapshot of connectivity as of the last check.
///
/// Recreated on every check; only "last" values are retained. Whenever
/// `is_online` is false, `connection_quality` is `Offline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    /// Mirrors the host environment's network-availability flag.
    pub is_online: bool,
    /// Result of the most recent reachability probe.
    pub is_backend_reachable: bool,
    /// Derived connection quality.
    pub connection_quality: ConnectionQuality,
    /// When this snapshot was produced (UTC milliseconds).
    pub last_checked_at: i64,
}

impl ConnectionStatus {
    /// The offline status: host offline, nothing reachable.
    pub fn offline() -> Self {
        Self {
            is_online: false,
            is_backend_reachable: false,
            connection_quality: ConnectionQuality::Offline,
            last_checked_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Build a status from a probe taken while the host was online.
    pub fn from_probe(reachable: bool, duration: Duration, poor_threshold: Duration) -> Self {
        Self {
            is_online: true,
            is_backend_reachable: reachable,
            connection_quality: ConnectionQuality::derive(reachable, duration, poor_threshold),
            last_checked_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
