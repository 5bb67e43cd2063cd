//! Status card renderer: the headline metrics of one analysis.
//!
//! Shows the trend status in its mapped color, the confidence percentage,
//! the predicted decline window, the engagement drop, and the saturation
//! index. The color mapping is a total function — unknown status labels get
//! a neutral fallback instead of failing.

use colored::{Color, Colorize};

use crate::model::AnalysisResult;
use crate::render::Surface;

/// Fallback color for status labels outside the known set.
const FALLBACK_COLOR: Color = Color::BrightBlack;

/// Map a trend status label to its display color. Total over all strings.
pub fn status_color(status: &str) -> Color {
    match status {
        "Critical Decline" => Color::Red,
        "Early Decline" | "Plateauing" => Color::Yellow,
        "Growing" => Color::Green,
        _ => FALLBACK_COLOR,
    }
}

/// Confidence as the displayed integer percent.
pub fn confidence_pct(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

/// Saturation index as the displayed `NN/100` numerator.
pub fn saturation_index(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

/// Renders the status card into its injected surface.
#[derive(Debug, Default)]
pub struct StatusCardRenderer {
    surface: Surface,
}

impl StatusCardRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the card contents from one result snapshot.
    pub fn render(&mut self, result: &AnalysisResult) {
        self.surface.clear();

        let status = result
            .trend_status
            .bold()
            .color(status_color(&result.trend_status));
        self.surface.line(format!("  Trend Status      {status}"));
        self.surface.line(format!(
            "  Confidence        {}%",
            confidence_pct(result.confidence_score)
        ));
        self.surface.line(format!(
            "  Predicted Window  {}",
            result.predicted_decline_time
        ));
        self.surface.line(format!(
            "  Engagement Drop   -{}%",
            result.decline_signals.engagement_drop_pct
        ));
        self.surface.line(format!(
            "  Saturation Index  {}/100",
            saturation_index(result.decline_signals.content_saturation_score)
        ));
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclineSignals, Lifecycle};
    use std::collections::BTreeMap;

    fn sample() -> AnalysisResult {
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
                dates: vec!["d1".into()],
                engagement: vec![1.0],
                post_frequency: vec![1.0],
            },
            feature_importance: BTreeMap::new(),
            explainable_reasoning: String::new(),
            genai_insight: String::new(),
        }
    }

    #[test]
    fn status_color_is_total() {
        assert_eq!(status_color("Critical Decline"), Color::Red);
        assert_eq!(status_color("Early Decline"), Color::Yellow);
        assert_eq!(status_color("Plateauing"), Color::Yellow);
        assert_eq!(status_color("Growing"), Color::Green);
        // Unknown labels never fail — they fall back.
        assert_eq!(status_color("Ascending To Orbit"), FALLBACK_COLOR);
        assert_eq!(status_color(""), FALLBACK_COLOR);
    }

    #[test]
    fn confidence_rounds_to_integer_percent() {
        assert_eq!(confidence_pct(0.72), 72);
        assert_eq!(confidence_pct(0.725), 73);
        assert_eq!(confidence_pct(0.0), 0);
        assert_eq!(confidence_pct(1.0), 100);
    }

    #[test]
    fn render_shows_all_card_fields() {
        let mut renderer = StatusCardRenderer::new();
        renderer.render(&sample());

        let text = renderer.surface().to_string();
        assert!(text.contains("Plateauing"));
        assert!(text.contains("72%"));
        assert!(text.contains("2-3 weeks"));
        assert!(text.contains("-18%"));
        assert!(text.contains("65/100"));
    }

    #[test]
    fn render_is_idempotent() {
        let mut renderer = StatusCardRenderer::new();
        let result = sample();
        renderer.render(&result);
        let first = renderer.surface().to_string();
        renderer.render(&result);
        assert_eq!(renderer.surface().to_string(), first);
        assert_eq!(renderer.surface().lines().len(), 5);
    }
}
