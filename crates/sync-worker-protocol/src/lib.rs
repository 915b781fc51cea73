//! Typed message protocol for the background sync worker boundary.
//!
//! The sync coordinator and the background worker never share memory; they
//! exchange [`WorkerMessage`] values over a paired channel created with
//! [`worker_channel`]. The worker runtime itself lives outside this
//! workspace and is free to run even when the host application is gone.

mod channel;
mod messages;

pub use channel::{worker_channel, CoordinatorEndpoint, WorkerEndpoint, DEFAULT_CHANNEL_CAPACITY};
pub use messages::{WorkerMessage, WorkerMessageType};
