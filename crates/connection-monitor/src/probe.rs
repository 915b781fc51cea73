//! Reachability probing against the backend.

use crate::{MonitorError, MonitorResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Result of a single reachability probe.
///
/// A probe never fails: errors, timeouts, and aborts are absorbed into
/// `reachable = false` and only logged.
#[derive(Debug, Clone, Copy)]
pub struct ProbeOutcome {
    /// Whether the backend responded.
    pub reachable: bool,
    /// Wall-clock duration of the probe.
    pub duration: Duration,
}

/// A minimal network request used only to determine whether the backend
/// responds, never to exchange application data.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Probe the backend once and report the outcome.
    async fn probe(&self) -> ProbeOutcome;
}

/// Probes the backend REST surface with a minimal-payload HEAD request.
///
/// The request carries only the publishable API key. A 2xx response counts
/// as reachable; so does 401, since an auth challenge is still proof the
/// backend answered. Everything else (5xx, connect errors, DNS failures,
/// the hard timeout) counts as unreachable.
pub struct HttpReachabilityProbe {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpReachabilityProbe {
    /// Build a probe against `base_url`, authenticated with the publishable key.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend project URL (e.g., `https://api.touchline.app`)
    /// * `publishable_key` - Public API key sent as the `apikey` header
    /// * `timeout` - Hard per-probe timeout
    pub fn new(base_url: &str, publishable_key: &str, timeout: Duration) -> MonitorResult<Self> {
        let endpoint = Url::parse(base_url)?.join("rest/v1/")?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(publishable_key)
            .map_err(|e| MonitorError::Config(format!("invalid publishable key: {}", e)))?;
        headers.insert("apikey", key);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ReachabilityProbe for HttpReachabilityProbe {
    async fn probe(&self) -> ProbeOutcome {
        let started = Instant::now();

        let reachable = match self.client.head(self.endpoint.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                status.is_success() || status == StatusCode::UNAUTHORIZED
            }
            Err(err) => {
                debug!(error = %err, "Reachability probe failed");
                false
            }
        };

        ProbeOutcome {
            reachable,
            duration: started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_url() {
        let result =
            HttpReachabilityProbe::new("not a valid url", "key", Duration::from_secs(5));
        assert!(matches!(result, Err(MonitorError::InvalidUrl(_))));
    }

    #[test]
    fn new_rejects_unsendable_key() {
        let result =
            HttpReachabilityProbe::new("https://api.touchline.app", "bad\nkey", Duration::from_secs(5));
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[test]
    fn new_joins_rest_endpoint() {
        let probe =
            HttpReachabilityProbe::new("https://api.touchline.app", "key", Duration::from_secs(5))
                .unwrap();
        assert_eq!(probe.endpoint.as_str(), "https://api.touchline.app/rest/v1/");
    }

    #[tokio::test]
    async fn probe_absorbs_connection_failure() {
        // Nothing listens on the discard port; the probe must report
        // unreachable rather than erroring.
        let probe =
            HttpReachabilityProbe::new("http://127.0.0.1:9", "key", Duration::from_millis(500))
                .unwrap();

        let outcome = probe.probe().await;
        assert!(!outcome.reachable);
    }
}
