//! Insight text renderer with a cancellable typewriter reveal.
//!
//! The data-driven reasoning reveals first, one character per interval; the
//! GenAI insight joins in after a fixed stagger. Starting a new reveal
//! aborts the outstanding reveal task before spawning the next one — the
//! scheduled per-character continuation stops, it is not merely overwritten.
//! One-shot output paths use [`InsightRenderer::render_immediate`], which
//! needs no runtime.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tokio::task::JoinHandle;

use crate::config::schema::RevealConfig;
use crate::model::AnalysisResult;
use crate::render::{SharedSurface, Surface, shared_surface};

/// Renders the two insight texts into a shared surface.
#[derive(Debug)]
pub struct InsightRenderer {
    surface: SharedSurface,
    task: Option<JoinHandle<()>>,
    char_interval: Duration,
    stagger: Duration,
}

impl InsightRenderer {
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            surface: shared_surface(),
            task: None,
            char_interval: Duration::from_millis(config.char_interval_ms.max(1)),
            stagger: Duration::from_millis(config.stagger_ms),
        }
    }

    /// Write both texts in full, cancelling any in-flight reveal.
    pub fn render_immediate(&mut self, result: &AnalysisResult) {
        self.cancel();
        let mut surface = self.surface.lock().expect("insight surface poisoned");
        draw(
            &mut surface,
            &result.explainable_reasoning,
            &result.genai_insight,
        );
    }

    /// Start (or restart) the incremental reveal. Any outstanding reveal is
    /// aborted first, so a fresh result never interleaves characters with
    /// the previous one.
    pub fn start_reveal(&mut self, result: &AnalysisResult) {
        self.cancel();

        let surface = Arc::clone(&self.surface);
        let reasoning = result.explainable_reasoning.clone();
        let insight = result.genai_insight.clone();
        let char_interval = self.char_interval;
        let stagger = self.stagger;

        self.task = Some(tokio::spawn(async move {
            reveal(surface, reasoning, insight, char_interval, stagger).await;
        }));
    }

    /// Abort the in-flight reveal task, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Handle to the shared surface for presentation.
    pub fn surface(&self) -> SharedSurface {
        Arc::clone(&self.surface)
    }

    /// Current rendered text, for presentation and assertions.
    pub fn snapshot(&self) -> String {
        self.surface
            .lock()
            .expect("insight surface poisoned")
            .to_string()
    }
}

impl Drop for InsightRenderer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// The reveal continuation: one character per interval for the reasoning,
/// with the insight joining once the stagger has elapsed.
async fn reveal(
    surface: SharedSurface,
    reasoning: String,
    insight: String,
    char_interval: Duration,
    stagger: Duration,
) {
    let reasoning_chars: Vec<char> = reasoning.chars().collect();
    let insight_chars: Vec<char> = insight.chars().collect();

    let stagger_steps =
        (stagger.as_millis() / char_interval.as_millis().max(1)) as usize;

    let mut shown_r = 0usize;
    let mut shown_i = 0usize;
    let mut step = 0usize;

    loop {
        if shown_r < reasoning_chars.len() {
            shown_r += 1;
        }
        if step >= stagger_steps && shown_i < insight_chars.len() {
            shown_i += 1;
        }

        {
            let mut surface = surface.lock().expect("insight surface poisoned");
            let partial_r: String = reasoning_chars[..shown_r].iter().collect();
            let partial_i: String = insight_chars[..shown_i].iter().collect();
            draw(&mut surface, &partial_r, &partial_i);
        }

        if shown_r == reasoning_chars.len() && shown_i == insight_chars.len() {
            break;
        }

        step += 1;
        tokio::time::sleep(char_interval).await;
    }
}

fn draw(surface: &mut Surface, reasoning: &str, insight: &str) {
    surface.clear();
    surface.line(format!("  {}", "Data-Driven Insight".bold()));
    surface.line(format!("  {reasoning}"));
    surface.line(String::new());
    surface.line(format!("  {}", "GenAI Insight".bold()));
    surface.line(format!("  {insight}"));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
