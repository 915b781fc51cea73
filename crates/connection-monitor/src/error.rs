//! Error types for connection monitor construction.
//!
//! Probe failures at runtime are deliberately not represented here: an
//! unreachable backend is data (`is_backend_reachable = false`), not an
//! error. Only building the monitor itself can fail.

use thiserror::Error;

/// Error type for connection monitor setup.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The configured backend endpoint is not a valid URL.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error (e.g., a key that cannot be sent as a header).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for monitor setup.
pub type MonitorResult<T> = Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_display() {
        let parse_err = url::Url::parse("::not-a-url::").unwrap_err();
        let err: MonitorError = parse_err.into();
        assert!(format!("{}", err).starts_with("Invalid backend URL:"));
    }

    #[test]
    fn config_error_display() {
        let err = MonitorError::Config("key contains control characters".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: key contains control characters"
        );
    }
}
