//! Sparkline renderer: a compact, axis-less view of the engagement series.
//!
//! Eight block-glyph levels (▁▂▃▄▅▆▇█), min/max scaled. Sits next to the
//! status card as a quick shape-of-the-trend indicator; no labels, no axes,
//! engagement only.

use colored::Colorize;

use crate::model::AnalysisResult;
use crate::render::{ChartSlot, Surface};

/// Block characters for sparkline rendering, shortest to tallest.
const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One built sparkline instance.
#[derive(Debug, PartialEq, Eq)]
pub struct Sparkline {
    glyphs: String,
}

impl Sparkline {
    /// Build a sparkline from raw values, downsampled to at most `width`
    /// columns (bucket means when the series is longer than the width).
    pub fn build(values: &[f64], width: usize) -> Self {
        let glyphs = spark_glyphs(values, width);
        Self { glyphs }
    }

    pub fn glyphs(&self) -> &str {
        &self.glyphs
    }
}

fn spark_glyphs(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let samples: Vec<f64> = if values.len() <= width {
        values.to_vec()
    } else {
        // Bucket means so the overall shape survives downsampling.
        (0..width)
            .map(|i| {
                let lo = i * values.len() / width;
                let hi = ((i + 1) * values.len() / width).max(lo + 1);
                let bucket = &values[lo..hi];
                bucket.iter().sum::<f64>() / bucket.len() as f64
            })
            .collect()
    };

    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    samples
        .iter()
        .map(|&v| {
            if span <= f64::EPSILON {
                // Flat series: draw at mid height.
                SPARK_CHARS[SPARK_CHARS.len() / 2]
            } else {
                let level = ((v - min) / span * (SPARK_CHARS.len() - 1) as f64).round() as usize;
                SPARK_CHARS[level.min(SPARK_CHARS.len() - 1)]
            }
        })
        .collect()
}

/// Renders the engagement sparkline into its injected surface.
#[derive(Debug, Default)]
pub struct SparklineRenderer {
    surface: Surface,
    chart: ChartSlot<Sparkline>,
    width: usize,
}

impl SparklineRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            surface: Surface::new(),
            chart: ChartSlot::new(),
            width,
        }
    }

    pub fn render(&mut self, result: &AnalysisResult) {
        let values = &result.lifecycle.engagement;
        let width = self.width;
        let spark = self.chart.replace_with(|| Sparkline::build(values, width));

        self.surface.clear();
        self.surface
            .line(format!("  {}", spark.glyphs().cyan()));
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn chart(&self) -> &ChartSlot<Sparkline> {
        &self.chart
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
