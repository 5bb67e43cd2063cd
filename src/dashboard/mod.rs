//! Dashboard controller: one fetch → fan-out → visibility transition.
//!
//! Owns the single [`ViewState`] and every render target. A submission
//! moves the state to `Loading` (re-submission disabled, prior results
//! hidden but never destroyed), and the eventual completion either fans the
//! result out to all renderers in a fixed order and reveals the results
//! surface, or records a failure notice without touching a single renderer.
//!
//! Concurrency contract: each submission gets a monotonically increasing
//! request id and only the latest id may apply its completion — a stale
//! response arriving after a newer submission is rejected outright, so
//! last-caller-wins holds even when responses arrive out of order.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use crate::api::{FetchError, TrendFetcher};
use crate::config::TrendscopeConfig;
use crate::model::{AnalysisResult, TrendQuery, ViewState};
use crate::render::factor_chart::FactorChartRenderer;
use crate::render::insight::InsightRenderer;
use crate::render::lifecycle_chart::LifecycleChartRenderer;
use crate::render::signal_bars::SignalBarRenderer;
use crate::render::sparkline::SparklineRenderer;
use crate::render::status_card::StatusCardRenderer;

/// How the time-based renderers behave during fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    /// Full text and final bar widths at once. No runtime required; used by
    /// the one-shot `analyze` command.
    Immediate,
    /// Typewriter reveal and staggered bars as spawned continuations.
    /// Requires a tokio runtime; used by watch mode.
    Animated,
}

/// What happened to a completion handed to [`Dashboard::apply_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result was fanned out and the results surface revealed.
    Rendered,
    /// The fetch failed; a notice was recorded, no renderer was touched.
    Failed,
    /// The completion belonged to a superseded request and was discarded.
    Stale,
}

/// The dashboard controller.
pub struct Dashboard {
    state: ViewState,
    latest_request: u64,
    results_visible: bool,
    notice: Option<String>,
    reveal_mode: RevealMode,

    status_card: StatusCardRenderer,
    lifecycle: LifecycleChartRenderer,
    factors: FactorChartRenderer,
    sparkline: SparklineRenderer,
    insight: InsightRenderer,
    signals: SignalBarRenderer,
}

impl Dashboard {
    pub fn new(config: &TrendscopeConfig, reveal_mode: RevealMode) -> Self {
        Self {
            state: ViewState::Idle,
            latest_request: 0,
            results_visible: false,
            notice: None,
            reveal_mode,
            status_card: StatusCardRenderer::new(),
            lifecycle: LifecycleChartRenderer::new(
                config.display.chart_width,
                config.display.chart_height,
            ),
            factors: FactorChartRenderer::new(),
            sparkline: SparklineRenderer::new(config.display.chart_width),
            insight: InsightRenderer::new(&config.reveal),
            signals: SignalBarRenderer::new(&config.animation),
        }
    }

    // -- State machine --

    /// Begin a submission: validate the query, transition `* → Loading`,
    /// and issue the request id the eventual completion must present.
    ///
    /// Submitting while a prior request is in flight is allowed — the new
    /// id supersedes the old one and the stale completion will be
    /// discarded.
    pub fn begin_submit(&mut self, query: &TrendQuery) -> Result<u64> {
        if query.keyword.trim().is_empty() {
            anyhow::bail!("keyword must not be empty");
        }

        self.latest_request += 1;
        self.state = ViewState::Loading;
        self.notice = None;
        // Hide, don't destroy: the renderers keep their buffers.
        self.results_visible = false;

        Ok(self.latest_request)
    }

    /// Apply one completion. Only the latest issued request id may change
    /// state; everything else is a stale response and is discarded.
    pub fn apply_result(
        &mut self,
        request_id: u64,
        outcome: Result<AnalysisResult, FetchError>,
    ) -> ApplyOutcome {
        if request_id != self.latest_request {
            return ApplyOutcome::Stale;
        }

        match outcome {
            Ok(result) => {
                let snapshot = Arc::new(result);
                self.fan_out(&snapshot);
                self.state = ViewState::Ready(snapshot);
                self.results_visible = true;
                ApplyOutcome::Rendered
            }
            Err(err) => {
                let notice = format!("Failed to analyze trend: {err}");
                self.state = ViewState::Failed(notice.clone());
                self.notice = Some(notice);
                // Renderers stay untouched; whatever was rendered before
                // remains rendered, just not presented.
                ApplyOutcome::Failed
            }
        }
    }

    /// Convenience for one-shot use: submit, fetch on the calling thread,
    /// apply.
    pub fn submit_blocking(
        &mut self,
        fetcher: &impl TrendFetcher,
        query: &TrendQuery,
    ) -> Result<ApplyOutcome> {
        let request_id = self.begin_submit(query)?;
        let outcome = fetcher.analyze(query);
        Ok(self.apply_result(request_id, outcome))
    }

    /// Fan one immutable snapshot out to every render target, in a fixed
    /// deterministic order. All renderers complete before the results
    /// surface becomes visible.
    fn fan_out(&mut self, result: &Arc<AnalysisResult>) {
        self.status_card.render(result);
        self.lifecycle.render(result);
        self.factors.render(result);
        self.sparkline.render(result);
        match self.reveal_mode {
            RevealMode::Immediate => {
                self.insight.render_immediate(result);
                self.signals.render(&result.decline_signals);
            }
            RevealMode::Animated => {
                self.insight.start_reveal(result);
                self.signals.start_animation(&result.decline_signals);
            }
        }
    }

    // -- Accessors --

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Whether a submission is in flight (busy indicator, submission
    /// disabled).
    pub fn is_busy(&self) -> bool {
        self.state.is_loading()
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn latest_request(&self) -> u64 {
        self.latest_request
    }

    pub fn status_card(&self) -> &StatusCardRenderer {
        &self.status_card
    }

    pub fn lifecycle(&self) -> &LifecycleChartRenderer {
        &self.lifecycle
    }

    pub fn factors(&self) -> &FactorChartRenderer {
        &self.factors
    }

    pub fn sparkline(&self) -> &SparklineRenderer {
        &self.sparkline
    }

    pub fn insight(&self) -> &InsightRenderer {
        &self.insight
    }

    pub fn signals(&self) -> &SignalBarRenderer {
        &self.signals
    }

    // -- Presentation --

    /// Compose the visible dashboard as one string: busy indicator while
    /// loading, the failure notice after a failed fetch, and the full
    /// results surface once revealed.
    pub fn present(&self) -> String {
        let mut out = String::new();

        if self.is_busy() {
            out.push_str(&format!("{}\n", "  Analyzing trend...".dimmed()));
            return out;
        }

        if let Some(notice) = &self.notice {
            out.push_str(&format!("{}\n", notice.red().bold()));
        }

        if self.results_visible {
            out.push_str(&format!("{}\n", "Trend Status".bold().cyan()));
            out.push_str(&self.status_card.surface().to_string());
            out.push_str(&self.sparkline.surface().to_string());
            out.push('\n');
            out.push_str(&format!("{}\n", "Trend Lifecycle".bold().cyan()));
            out.push_str(&self.lifecycle.surface().to_string());
            out.push('\n');
            out.push_str(&format!("{}\n", "Decline Factors".bold().cyan()));
            out.push_str(&self.factors.surface().to_string());
            out.push('\n');
            out.push_str(&format!("{}\n", "Decline Signals".bold().cyan()));
            out.push_str(&self.signals.snapshot());
            out.push('\n');
            out.push_str(&self.insight.snapshot());
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
