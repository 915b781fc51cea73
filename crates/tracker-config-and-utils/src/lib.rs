//! Core types, configuration, and utilities for the Touchline sync tracker.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_BACKEND_PUBLISHABLE_KEY, DEFAULT_BACKEND_URL, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
