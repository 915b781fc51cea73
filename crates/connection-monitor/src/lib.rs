//! Connection monitoring for the offline-aware sync tracker.
//!
//! [`ConnectionMonitor`] produces a best-effort, rate-limited estimate of
//! whether the Touchline backend is reachable, without generating excessive
//! network traffic. It combines three inputs:
//!
//! - **Host connectivity signals**: online/offline transitions delivered by
//!   a [`ConnectivitySource`]. An offline transition flips the status
//!   immediately; no probe is issued.
//! - **Reachability probes**: a minimal request against the backend through
//!   a [`ReachabilityProbe`], bounded by a hard timeout. Probe round-trip
//!   time drives the tri-state [`ConnectionQuality`].
//! - **Periodic refresh**: a slow timer re-checks while online, correcting
//!   drift between explicit transitions.
//!
//! Probe results are cached for a short TTL so rapid re-invocation does not
//! flood the backend. UI collaborators read copied [`ConnectionStatus`]
//! snapshots or subscribe to the change feed; they never mutate state.

mod error;
mod monitor;
mod probe;
mod source;
mod status;

pub use error::{MonitorError, MonitorResult};
pub use monitor::{ConnectionMonitor, ConnectionMonitorConfig};
pub use probe::{HttpReachabilityProbe, ProbeOutcome, ReachabilityProbe};
pub use source::{ChannelConnectivitySource, ConnectivityEvent, ConnectivitySource};
pub use status::{ConnectionQuality, ConnectionStatus};
