/// HTTP client for the trend analysis service.
///
/// Communicates with the analysis backend (default `localhost:5000`) using
/// the synchronous `ureq` HTTP client. Provides:
///
/// - **Analyze**: POST a [`TrendQuery`] and receive an [`AnalysisResult`].
/// - **Health check**: verify the service is up.
/// - **Platforms**: list the platforms the service supports.
///
/// Transport failures, non-2xx statuses, and malformed bodies map onto the
/// three-variant [`FetchError`] taxonomy. The dashboard controller collapses
/// all three into a single user-visible notice; renderers never see them.
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::schema::ApiConfig;
use crate::model::{AnalysisResult, TrendQuery};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// A failed analysis fetch. None of these are retried automatically.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: connection refused, DNS, timeout.
    #[error("network error: {0}")]
    Network(String),
    /// The service answered with a non-success status.
    #[error("analysis service returned HTTP {status}")]
    Http { status: u16 },
    /// The response body did not match the expected result shape.
    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => FetchError::Http { status },
            ureq::Error::Transport(t) => FetchError::Network(t.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetcher seam
// ---------------------------------------------------------------------------

/// The fetch seam the dashboard controller depends on. Lets tests drive the
/// controller with scripted results instead of a live service.
pub trait TrendFetcher {
    fn analyze(&self, query: &TrendQuery) -> Result<AnalysisResult, FetchError>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Response body from `GET /health`.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Response body from `GET /platforms`.
#[derive(Debug, Deserialize)]
struct PlatformsResponse {
    platforms: Vec<String>,
}

/// Synchronous analysis service client.
///
/// Created from the resolved `[api]` config. In watch mode the blocking
/// calls are bridged into the event loop via `tokio::task::spawn_blocking`,
/// so the client is `Clone` to move into those tasks.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base_url: String,
    timeout: Duration,
}

impl AnalysisClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Check whether the analysis service is reachable and healthy.
    ///
    /// Uses a short timeout (5 s) so `trendscope health` doesn't stall when
    /// the backend is down. Resolves `localhost` to `127.0.0.1` to avoid
    /// IPv6 DNS delays on Windows.
    pub fn is_healthy(&self) -> bool {
        let url = force_ipv4(format!("{}/health", self.base_url));
        let result = ureq::get(&url).timeout(Duration::from_secs(5)).call();

        match result {
            Ok(resp) => resp
                .into_json::<HealthResponse>()
                .map(|h| h.status == "healthy")
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Fetch the list of platforms the service supports.
    pub fn platforms(&self) -> Result<Vec<String>, FetchError> {
        let url = force_ipv4(format!("{}/platforms", self.base_url));
        let resp = ureq::get(&url).timeout(self.timeout).call()?;
        let parsed: PlatformsResponse = resp
            .into_json()
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        Ok(parsed.platforms)
    }

    /// Submit one analysis request: `POST /analyze-trend`.
    ///
    /// The response is deserialized and then shape-validated — the service
    /// contract is JSON-loose, so a structurally valid but semantically
    /// broken body (mismatched lifecycle series, out-of-range confidence)
    /// is reported as [`FetchError::Malformed`] rather than rendered.
    pub fn analyze(&self, query: &TrendQuery) -> Result<AnalysisResult, FetchError> {
        let url = force_ipv4(format!("{}/analyze-trend", self.base_url));

        let resp = ureq::post(&url).timeout(self.timeout).send_json(query)?;

        let result: AnalysisResult = resp
            .into_json()
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        validate_shape(&result)?;
        Ok(result)
    }
}

impl TrendFetcher for AnalysisClient {
    fn analyze(&self, query: &TrendQuery) -> Result<AnalysisResult, FetchError> {
        AnalysisClient::analyze(self, query)
    }
}

/// Rewrite `localhost` to `127.0.0.1`.
///
/// On Windows, "localhost" may try IPv6 (`::1`) first, causing timeouts
/// when the backend only binds IPv4.
fn force_ipv4(url: String) -> String {
    url.replace("://localhost", "://127.0.0.1")
}

/// Validate the invariants renderers rely on.
fn validate_shape(result: &AnalysisResult) -> Result<(), FetchError> {
    if !result.lifecycle.is_well_formed() {
        return Err(FetchError::Malformed(format!(
            "lifecycle series disagree on length ({} dates, {} engagement, {} post_frequency)",
            result.lifecycle.dates.len(),
            result.lifecycle.engagement.len(),
            result.lifecycle.post_frequency.len(),
        )));
    }
    if !(0.0..=1.0).contains(&result.confidence_score) {
        return Err(FetchError::Malformed(format!(
            "confidence_score {} outside [0, 1]",
            result.confidence_score
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclineSignals, Lifecycle};
    use std::collections::BTreeMap;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            trend_status: "Plateauing".into(),
            confidence_score: 0.72,
            predicted_decline_time: "2-3 weeks".into(),
            decline_signals: DeclineSignals {
                engagement_drop_pct: 18.0,
                sentiment_score: -0.3,
                influencer_activity_ratio: 0.4,
                content_saturation_score: 0.65,
            },
            lifecycle: Lifecycle {
                dates: vec!["2024-01-01".into(), "2024-01-02".into()],
                engagement: vec![100.0, 90.0],
                post_frequency: vec![10.0, 9.0],
            },
            feature_importance: BTreeMap::new(),
            explainable_reasoning: "r".into(),
            genai_insight: "g".into(),
        }
    }

    #[test]
    fn client_from_config_strips_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:5000/".to_string(),
            timeout_ms: 1_000,
        };
        let client = AnalysisClient::from_config(&config);
        assert_eq!(client.base_url, "http://localhost:5000");
        assert_eq!(client.timeout, Duration::from_millis(1_000));
    }

    #[test]
    fn force_ipv4_rewrites_localhost_only() {
        assert_eq!(
            force_ipv4("http://localhost:5000/health".into()),
            "http://127.0.0.1:5000/health"
        );
        assert_eq!(
            force_ipv4("http://analysis.internal/health".into()),
            "http://analysis.internal/health"
        );
    }

    #[test]
    fn validate_shape_accepts_well_formed_result() {
        assert!(validate_shape(&sample_result()).is_ok());
    }

    #[test]
    fn validate_shape_rejects_mismatched_lifecycle() {
        let mut result = sample_result();
        result.lifecycle.engagement.pop();
        let err = validate_shape(&result).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn validate_shape_rejects_out_of_range_confidence() {
        let mut result = sample_result();
        result.confidence_score = 1.2;
        let err = validate_shape(&result).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn connection_failure_maps_to_network_error() {
        // Nothing listens on this port; ureq fails at transport level.
        let config = ApiConfig {
            base_url: "http://127.0.0.1:59123".to_string(),
            timeout_ms: 300,
        };
        let client = AnalysisClient::from_config(&config);
        let err = client.analyze(&TrendQuery::new("#AIArt")).unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }
}
