//! Signal bar renderer: the four decline indicators as proportional bars.
//!
//! Bar widths clamp to [0, 100]. In watch mode the bars animate from zero
//! with an initial delay and a per-bar staggered start; the animation is a
//! spawned continuation and purely cosmetic — one-shot output draws the
//! final widths directly.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tokio::task::JoinHandle;

use crate::config::schema::AnimationConfig;
use crate::model::DeclineSignals;
use crate::render::{SharedSurface, Surface, shared_surface};

/// Columns used by a bar at width 100.
const BAR_COLS: usize = 30;

/// One signal bar: display label, display value, and target width in
/// [0, 100].
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBar {
    pub label: &'static str,
    pub value_text: String,
    pub target: f64,
}

/// Compute the four bars from a result's decline signals.
pub fn signal_bars(signals: &DeclineSignals) -> [SignalBar; 4] {
    [
        SignalBar {
            label: "Engagement Drop",
            value_text: format!("{}%", signals.engagement_drop_pct),
            target: signals.engagement_drop_pct.clamp(0.0, 100.0),
        },
        SignalBar {
            label: "Sentiment Score",
            value_text: format!("{}", signals.sentiment_score),
            target: (signals.sentiment_score.abs() * 100.0).clamp(0.0, 100.0),
        },
        SignalBar {
            label: "Influencer Activity",
            value_text: format!(
                "{}%",
                (signals.influencer_activity_ratio * 100.0).round() as i64
            ),
            target: (signals.influencer_activity_ratio * 100.0).clamp(0.0, 100.0),
        },
        SignalBar {
            label: "Content Saturation",
            value_text: format!(
                "{}%",
                (signals.content_saturation_score * 100.0).round() as i64
            ),
            target: (signals.content_saturation_score * 100.0).clamp(0.0, 100.0),
        },
    ]
}

/// Renders the signal bars into a shared surface.
#[derive(Debug)]
pub struct SignalBarRenderer {
    surface: SharedSurface,
    task: Option<JoinHandle<()>>,
    initial_delay: Duration,
    stagger: Duration,
}

impl SignalBarRenderer {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            surface: shared_surface(),
            task: None,
            initial_delay: Duration::from_millis(config.bar_initial_delay_ms),
            stagger: Duration::from_millis(config.bar_stagger_ms),
        }
    }

    /// Draw all four bars at their final widths, cancelling any in-flight
    /// animation.
    pub fn render(&mut self, signals: &DeclineSignals) {
        self.cancel();
        let bars = signal_bars(signals);
        let mut surface = self.surface.lock().expect("signal surface poisoned");
        draw(&mut surface, &bars, bars.len());
    }

    /// Animate the bars: initial delay, then each bar appears after a
    /// per-bar stagger. Restart-safe — a prior animation is aborted first.
    pub fn start_animation(&mut self, signals: &DeclineSignals) {
        self.cancel();

        let bars = signal_bars(signals);
        let surface = Arc::clone(&self.surface);
        let initial_delay = self.initial_delay;
        let stagger = self.stagger;

        self.task = Some(tokio::spawn(async move {
            {
                let mut surface = surface.lock().expect("signal surface poisoned");
                draw(&mut surface, &bars, 0);
            }
            tokio::time::sleep(initial_delay).await;

            for grown in 1..=bars.len() {
                {
                    let mut surface = surface.lock().expect("signal surface poisoned");
                    draw(&mut surface, &bars, grown);
                }
                if grown < bars.len() {
                    tokio::time::sleep(stagger).await;
                }
            }
        }));
    }

    /// Abort the in-flight animation task, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn surface(&self) -> SharedSurface {
        Arc::clone(&self.surface)
    }

    pub fn snapshot(&self) -> String {
        self.surface
            .lock()
            .expect("signal surface poisoned")
            .to_string()
    }
}

impl Drop for SignalBarRenderer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Draw the grid with the first `grown` bars at full width and the rest at
/// zero (the staged-animation frame).
fn draw(surface: &mut Surface, bars: &[SignalBar], grown: usize) {
    surface.clear();
    for (i, bar) in bars.iter().enumerate() {
        let width = if i < grown {
            (bar.target / 100.0 * BAR_COLS as f64).round() as usize
        } else {
            0
        };
        let fill: String = "━".repeat(width);
        let rest: String = "─".repeat(BAR_COLS - width);
        surface.line(format!(
            "  {:<20} {:>6}  {}{}",
            bar.label,
            bar.value_text,
            fill.magenta(),
            rest.dimmed(),
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> DeclineSignals {
        DeclineSignals {
            engagement_drop_pct: 18.0,
            sentiment_score: -0.3,
            influencer_activity_ratio: 0.4,
            content_saturation_score: 0.65,
        }
    }

    #[test]
    fn bar_targets_follow_display_formulas() {
        let bars = signal_bars(&signals());
        assert_eq!(bars[0].target, 18.0);
        assert!((bars[1].target - 30.0).abs() < 1e-9);
        assert!((bars[2].target - 40.0).abs() < 1e-9);
        assert!((bars[3].target - 65.0).abs() < 1e-9);
    }

    #[test]
    fn bar_targets_clamp_to_percent_range() {
        let extreme = DeclineSignals {
            engagement_drop_pct: 250.0,
            sentiment_score: -3.0,
            influencer_activity_ratio: 1.4,
            content_saturation_score: -0.2,
        };
        let bars = signal_bars(&extreme);
        for bar in &bars {
            assert!((0.0..=100.0).contains(&bar.target), "{:?}", bar);
        }
    }

    #[test]
    fn render_shows_values_and_labels() {
        let mut renderer = SignalBarRenderer::new(&AnimationConfig::default());
        renderer.render(&signals());
        let text = renderer.snapshot();
        assert!(text.contains("Engagement Drop"));
        assert!(text.contains("18%"));
        assert!(text.contains("Sentiment Score"));
        assert!(text.contains("-0.3"));
        assert!(text.contains("40%"));
        assert!(text.contains("65%"));
    }

    #[tokio::test(start_paused = true)]
    async fn animation_staggers_bar_growth() {
        let mut renderer = SignalBarRenderer::new(&AnimationConfig {
            settle_delay_ms: 0,
            bar_initial_delay_ms: 200,
            bar_stagger_ms: 100,
        });
        renderer.start_animation(&signals());

        // Before the initial delay elapses every bar is at zero width.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let text = renderer.snapshot();
        assert!(!text.contains('━'));

        // After the full schedule all four bars are grown.
        tokio::time::sleep(Duration::from_secs(2)).await;
        let text = renderer.snapshot();
        let grown_rows = text.lines().filter(|l| l.contains('━')).count();
        assert_eq!(grown_rows, 4);
    }
}
