//! Wire and view types for the trend dashboard.
//!
//! - [`TrendQuery`] — the JSON body POSTed to the analysis service.
//! - [`AnalysisResult`] — the service's response, immutable once received.
//!   The dashboard fans a single `Arc<AnalysisResult>` snapshot out to all
//!   renderers, so no renderer can observe a partially-updated result.
//! - [`TrendTickerItem`] — one entry in the live trends ticker; the ticker
//!   regenerates its full list every cycle, there is no diffing.
//! - [`ViewState`] — the single dashboard state machine, owned by the
//!   controller.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Default lookback window for the analysis date range, in days.
const DEFAULT_LOOKBACK_DAYS: i64 = 14;

/// A trend analysis request, serialized as the body of
/// `POST /analyze-trend`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendQuery {
    pub keyword: String,
    pub platform: String,
    /// ISO date (`YYYY-MM-DD`).
    pub start_date: String,
    /// ISO date (`YYYY-MM-DD`).
    pub end_date: String,
    pub analysis_depth: String,
    pub region: String,
    pub min_engagement: u64,
    /// Requested confidence level as an integer percent.
    pub confidence_level: u32,
}

impl TrendQuery {
    /// Build a query for `keyword` with every other field defaulted:
    /// end date = today, start date = today minus two weeks.
    pub fn new(keyword: impl Into<String>) -> Self {
        let today = Utc::now().date_naive();
        let start = today - Duration::days(DEFAULT_LOOKBACK_DAYS);
        Self {
            keyword: keyword.into(),
            platform: "Instagram".to_string(),
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: today.format("%Y-%m-%d").to_string(),
            analysis_depth: "standard".to_string(),
            region: "Global".to_string(),
            min_engagement: 1_000,
            confidence_level: 85,
        }
    }

    /// Build a defaulted query targeting a specific platform.
    pub fn with_platform(keyword: impl Into<String>, platform: impl Into<String>) -> Self {
        let mut query = Self::new(keyword);
        query.platform = platform.into();
        query
    }
}

// ---------------------------------------------------------------------------
// Analysis result
// ---------------------------------------------------------------------------

/// The four bounded decline indicators returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeclineSignals {
    /// Engagement drop over the window, already a percentage.
    pub engagement_drop_pct: f64,
    /// Sentiment in [-1, 1]; negative is souring.
    pub sentiment_score: f64,
    /// Influencer activity ratio in [0, 1].
    pub influencer_activity_ratio: f64,
    /// Content saturation in [0, 1].
    pub content_saturation_score: f64,
}

/// The lifecycle time series: three parallel, equal-length, chronological
/// sequences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lifecycle {
    pub dates: Vec<String>,
    pub engagement: Vec<f64>,
    pub post_frequency: Vec<f64>,
}

impl Lifecycle {
    /// Number of points shared by all three series.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Whether the three series agree on length and are non-empty.
    pub fn is_well_formed(&self) -> bool {
        !self.dates.is_empty()
            && self.dates.len() == self.engagement.len()
            && self.dates.len() == self.post_frequency.len()
    }
}

/// A complete analysis response. Immutable once received; the controller
/// wraps it in an `Arc` and every renderer reads the same snapshot.
///
/// `feature_importance` is a `BTreeMap` so factor bars render in a
/// deterministic key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub trend_status: String,
    /// Confidence in [0, 1].
    pub confidence_score: f64,
    /// Free-text label, e.g. `"2-3 weeks"`.
    pub predicted_decline_time: String,
    pub decline_signals: DeclineSignals,
    pub lifecycle: Lifecycle,
    pub feature_importance: BTreeMap<String, f64>,
    pub explainable_reasoning: String,
    pub genai_insight: String,
}

// ---------------------------------------------------------------------------
// Ticker items
// ---------------------------------------------------------------------------

/// Which ticker list an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerDirection {
    Declining,
    Rising,
}

/// One ephemeral entry in a live trends list. Regenerated wholesale every
/// ticker cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendTickerItem {
    pub name: String,
    pub platform: String,
    /// Signed percent change; negative for declining entries.
    pub change: f64,
    pub engagement: u64,
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// The single dashboard view state. Exactly one instance exists, owned by
/// the controller; all transitions go through it.
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<AnalysisResult>),
    Failed(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn query_defaults_span_two_weeks() {
        let query = TrendQuery::new("#AIArt");
        let start = NaiveDate::parse_from_str(&query.start_date, "%Y-%m-%d").unwrap();
        let end = NaiveDate::parse_from_str(&query.end_date, "%Y-%m-%d").unwrap();
        assert_eq!((end - start).num_days(), 14);
        assert_eq!(query.platform, "Instagram");
        assert_eq!(query.min_engagement, 1_000);
        assert_eq!(query.confidence_level, 85);
    }

    #[test]
    fn query_serializes_expected_fields() {
        let query = TrendQuery::with_platform("#AIArt", "TikTok");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["keyword"], "#AIArt");
        assert_eq!(json["platform"], "TikTok");
        for field in [
            "start_date",
            "end_date",
            "analysis_depth",
            "region",
            "min_engagement",
            "confidence_level",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn analysis_result_round_trips() {
        let json = r#"{
            "trend_status": "Plateauing",
            "confidence_score": 0.72,
            "predicted_decline_time": "2-3 weeks",
            "decline_signals": {
                "engagement_drop_pct": 18.0,
                "sentiment_score": -0.3,
                "influencer_activity_ratio": 0.4,
                "content_saturation_score": 0.65
            },
            "lifecycle": {
                "dates": ["2024-01-01", "2024-01-02"],
                "engagement": [100.0, 90.0],
                "post_frequency": [10.0, 9.0]
            },
            "feature_importance": {
                "Engagement Drop": 0.4,
                "Sentiment": 0.3
            },
            "explainable_reasoning": "r",
            "genai_insight": "g"
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.trend_status, "Plateauing");
        assert!(result.lifecycle.is_well_formed());
        // BTreeMap gives deterministic key order.
        let keys: Vec<_> = result.feature_importance.keys().collect();
        assert_eq!(keys, vec!["Engagement Drop", "Sentiment"]);
    }

    #[test]
    fn lifecycle_well_formed_rejects_mismatched_lengths() {
        let lifecycle = Lifecycle {
            dates: vec!["2024-01-01".into()],
            engagement: vec![1.0, 2.0],
            post_frequency: vec![1.0],
        };
        assert!(!lifecycle.is_well_formed());

        let empty = Lifecycle {
            dates: vec![],
            engagement: vec![],
            post_frequency: vec![],
        };
        assert!(!empty.is_well_formed());
    }

    #[test]
    fn view_state_predicates() {
        assert!(ViewState::Loading.is_loading());
        assert!(!ViewState::Idle.is_loading());
        assert!(!ViewState::Failed("x".into()).is_ready());
    }
}
