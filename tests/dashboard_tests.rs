//! Integration tests for the dashboard controller: submission lifecycle,
//! fan-out, failure handling, and stale-response rejection, driven through
//! scripted fetchers instead of a live analysis service.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use trendscope::api::{FetchError, TrendFetcher};
use trendscope::config::TrendscopeConfig;
use trendscope::dashboard::{ApplyOutcome, Dashboard, RevealMode};
use trendscope::model::{AnalysisResult, DeclineSignals, Lifecycle, TrendQuery};

// ---------------------------------------------------------------------------
// Scripted fetcher
// ---------------------------------------------------------------------------

/// A fetcher that replays a scripted sequence of outcomes.
struct ScriptedFetcher {
    outcomes: Mutex<VecDeque<Result<AnalysisResult, FetchError>>>,
}

impl ScriptedFetcher {
    fn new(outcomes: Vec<Result<AnalysisResult, FetchError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }
}

impl TrendFetcher for ScriptedFetcher {
    fn analyze(&self, _query: &TrendQuery) -> Result<AnalysisResult, FetchError> {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("fetcher script exhausted")
    }
}

fn sample_result(status: &str) -> AnalysisResult {
    AnalysisResult {
        trend_status: status.into(),
        confidence_score: 0.72,
        predicted_decline_time: "2-3 weeks".into(),
        decline_signals: DeclineSignals {
            engagement_drop_pct: 18.0,
            sentiment_score: -0.3,
            influencer_activity_ratio: 0.4,
            content_saturation_score: 0.65,
        },
        lifecycle: Lifecycle {
            dates: (1..=7).map(|d| format!("2024-01-0{d}")).collect(),
            engagement: vec![700.0, 650.0, 600.0, 500.0, 420.0, 380.0, 300.0],
            post_frequency: vec![70.0, 66.0, 60.0, 52.0, 45.0, 40.0, 33.0],
        },
        feature_importance: BTreeMap::from([
            ("Engagement Drop".to_string(), 0.4),
            ("Sentiment".to_string(), 0.3),
            ("Influencer Activity".to_string(), 0.2),
            ("Saturation".to_string(), 0.1),
        ]),
        explainable_reasoning: "Engagement fell steadily over the window.".into(),
        genai_insight: "The trend is cooling; expect a slow fade.".into(),
    }
}

fn dashboard() -> Dashboard {
    Dashboard::new(&TrendscopeConfig::default(), RevealMode::Immediate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn one_shot_analysis_renders_every_panel() {
    let mut dash = dashboard();
    let fetcher = ScriptedFetcher::new(vec![Ok(sample_result("Plateauing"))]);

    let outcome = dash
        .submit_blocking(&fetcher, &TrendQuery::with_platform("#AIArt", "TikTok"))
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Rendered);

    let text = dash.present();
    assert!(text.contains("Trend Status"));
    assert!(text.contains("Plateauing"));
    assert!(text.contains("72%"));
    assert!(text.contains("-18%"));
    assert!(text.contains("65/100"));
    assert!(text.contains("Trend Lifecycle"));
    assert!(text.contains("Decline Factors"));
    assert!(text.contains("Decline Signals"));
    assert!(text.contains("Engagement fell steadily over the window."));
    assert!(text.contains("The trend is cooling; expect a slow fade."));
}

#[test]
fn factor_bars_render_in_key_order_with_scaled_percents() {
    let mut dash = dashboard();
    let fetcher = ScriptedFetcher::new(vec![Ok(sample_result("Plateauing"))]);
    dash.submit_blocking(&fetcher, &TrendQuery::new("#AIArt"))
        .unwrap();

    let bars = dash.factors().chart().get().unwrap().bars();
    let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Engagement Drop",
            "Influencer Activity",
            "Saturation",
            "Sentiment"
        ]
    );
    assert_eq!(bars.iter().map(|b| b.percent).sum::<i64>(), 100);
}

#[test]
fn empty_keyword_never_reaches_the_fetcher() {
    let mut dash = dashboard();
    // An exhausted script panics if consulted; an empty keyword must not
    // consult it.
    let fetcher = ScriptedFetcher::new(vec![]);
    assert!(dash
        .submit_blocking(&fetcher, &TrendQuery::new("  "))
        .is_err());
    assert!(!dash.is_busy());
}

#[test]
fn http_500_shows_one_notice_and_keeps_prior_results() {
    let mut dash = dashboard();
    let fetcher = ScriptedFetcher::new(vec![
        Ok(sample_result("Plateauing")),
        Err(FetchError::Http { status: 500 }),
        Ok(sample_result("Growing")),
    ]);
    let query = TrendQuery::new("#AIArt");

    dash.submit_blocking(&fetcher, &query).unwrap();
    let card_before = dash.status_card().surface().to_string();

    let outcome = dash.submit_blocking(&fetcher, &query).unwrap();
    assert_eq!(outcome, ApplyOutcome::Failed);
    assert!(dash.notice().unwrap().contains("HTTP 500"));
    assert_eq!(dash.status_card().surface().to_string(), card_before);

    // Submission is re-enabled: the retry clears the notice and renders.
    let outcome = dash.submit_blocking(&fetcher, &query).unwrap();
    assert_eq!(outcome, ApplyOutcome::Rendered);
    assert!(dash.notice().is_none());
    assert!(dash.present().contains("Growing"));
}

#[test]
fn network_and_malformed_failures_surface_as_notices() {
    for err in [
        FetchError::Network("connection refused".into()),
        FetchError::Malformed("missing field".into()),
    ] {
        let mut dash = dashboard();
        let fetcher = ScriptedFetcher::new(vec![Err(err)]);
        let outcome = dash
            .submit_blocking(&fetcher, &TrendQuery::new("#AIArt"))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(dash
            .notice()
            .unwrap()
            .starts_with("Failed to analyze trend:"));
        assert!(!dash.results_visible());
    }
}

#[test]
fn out_of_order_completions_keep_the_latest() {
    let mut dash = dashboard();
    let query = TrendQuery::new("#AIArt");

    // Two overlapping submissions; the older response lands last.
    let first = dash.begin_submit(&query).unwrap();
    let second = dash.begin_submit(&query).unwrap();

    assert_eq!(
        dash.apply_result(second, Ok(sample_result("Growing"))),
        ApplyOutcome::Rendered
    );
    assert_eq!(
        dash.apply_result(first, Ok(sample_result("Critical Decline"))),
        ApplyOutcome::Stale
    );

    let text = dash.present();
    assert!(text.contains("Growing"));
    assert!(!text.contains("Critical Decline"));
}

#[test]
fn stale_failure_cannot_clobber_a_newer_success() {
    let mut dash = dashboard();
    let query = TrendQuery::new("#AIArt");

    let first = dash.begin_submit(&query).unwrap();
    let second = dash.begin_submit(&query).unwrap();

    dash.apply_result(second, Ok(sample_result("Plateauing")));
    let outcome = dash.apply_result(first, Err(FetchError::Network("timeout".into())));
    assert_eq!(outcome, ApplyOutcome::Stale);
    assert!(dash.notice().is_none());
    assert!(dash.results_visible());
}

#[test]
fn repeated_renders_keep_one_chart_instance_per_target() {
    let mut dash = dashboard();
    let fetcher = ScriptedFetcher::new(vec![
        Ok(sample_result("Plateauing")),
        Ok(sample_result("Plateauing")),
        Ok(sample_result("Plateauing")),
    ]);
    let query = TrendQuery::new("#AIArt");

    for _ in 0..3 {
        dash.submit_blocking(&fetcher, &query).unwrap();
    }

    assert!(dash.lifecycle().chart().is_live());
    assert_eq!(dash.lifecycle().chart().builds(), 3);
    assert!(dash.sparkline().chart().is_live());
    assert_eq!(dash.sparkline().chart().builds(), 3);
    assert!(dash.factors().chart().is_live());
    assert_eq!(dash.factors().chart().builds(), 3);
}
