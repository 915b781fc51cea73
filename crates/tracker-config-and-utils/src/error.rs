//! Core error types for the sync tracker.

use thiserror::Error;

/// Core error type for tracker configuration and utilities.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Path error (e.g., home directory not found)
    #[error("Path error: {0}")]
    Path(String),
}

/// Result type alias using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = CoreError::Config("missing backend URL".to_string());
        assert_eq!(format!("{}", err), "Configuration error: missing backend URL");
    }

    #[test]
    fn json_error_from_serde() {
        let bad_json = "not json at all {{{";
        let serde_err = serde_json::from_str::<serde_json::Value>(bad_json).unwrap_err();
        let err: CoreError = serde_err.into();
        assert!(format!("{}", err).starts_with("JSON error:"));
    }

    #[test]
    fn url_error_from_parse() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: CoreError = parse_err.into();
        assert!(format!("{}", err).starts_with("Invalid URL:"));
    }
}
