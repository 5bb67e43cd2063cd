//! Factor chart renderer: one horizontal bar per feature-importance entry.
//!
//! Bars follow the map's key order, so output is deterministic for a given
//! result. Weights arrive in [0, 1] and display as percentages; the palette
//! cycles over four colors the way the dashboard's bar chart did.

use colored::{Color, Colorize};

use crate::model::AnalysisResult;
use crate::render::{ChartSlot, Surface};

/// Bar colors, cycled in entry order.
const PALETTE: [Color; 4] = [Color::Cyan, Color::Blue, Color::Yellow, Color::Red];

/// Widest bar in columns (weight 1.0).
const FULL_BAR: usize = 40;

/// One built factor bar.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorBar {
    pub label: String,
    pub weight: f64,
    pub percent: i64,
    pub width: usize,
}

/// One built factor chart instance.
#[derive(Debug, Default, PartialEq)]
pub struct BarChart {
    bars: Vec<FactorBar>,
}

impl BarChart {
    /// Build bars from the importance map, in key order. Weights are
    /// clamped to [0, 1] for the bar width; the percent label shows the
    /// scaled raw weight.
    pub fn build(importance: impl IntoIterator<Item = (String, f64)>) -> Self {
        let bars = importance
            .into_iter()
            .map(|(label, weight)| FactorBar {
                percent: (weight * 100.0).round() as i64,
                width: (weight.clamp(0.0, 1.0) * FULL_BAR as f64).round() as usize,
                label,
                weight,
            })
            .collect();
        Self { bars }
    }

    pub fn bars(&self) -> &[FactorBar] {
        &self.bars
    }
}

/// Renders the feature-importance bars into its injected surface.
#[derive(Debug, Default)]
pub struct FactorChartRenderer {
    surface: Surface,
    chart: ChartSlot<BarChart>,
}

impl FactorChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, result: &AnalysisResult) {
        let importance = result.feature_importance.clone();
        let chart = self.chart.replace_with(|| BarChart::build(importance));

        self.surface.clear();
        for (i, bar) in chart.bars().iter().enumerate() {
            let fill: String = "█".repeat(bar.width);
            let color = PALETTE[i % PALETTE.len()];
            self.surface.line(format!(
                "  {:<18} {} {}%",
                bar.label,
                fill.color(color),
                bar.percent,
            ));
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn chart(&self) -> &ChartSlot<BarChart> {
        &self.chart
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
