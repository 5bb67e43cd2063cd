//! Lifecycle chart renderer: engagement and post frequency over the shared
//! date axis.
//!
//! Draws the two series as a fixed-size character grid with a shared
//! zero-based y scale, a legend, and first/last date labels on the x axis.
//! The built grid lives in a [`ChartSlot`], so every re-render disposes the
//! prior chart before constructing the new one.

use colored::Colorize;

use crate::model::{AnalysisResult, Lifecycle};
use crate::render::{ChartSlot, Surface};

/// Plot marker for the engagement series.
const ENGAGEMENT_MARK: char = '●';
/// Plot marker for the post-frequency series.
const FREQUENCY_MARK: char = '○';

/// One built lifecycle chart: plain-character rows, colorized at draw time.
#[derive(Debug, PartialEq, Eq)]
pub struct LineChart {
    rows: Vec<String>,
    first_date: String,
    last_date: String,
}

impl LineChart {
    /// Plot both series into a `width` × `height` grid. Values share one
    /// zero-based scale so the two lines are comparable, matching the
    /// shared y axis of the dashboard chart.
    pub fn build(lifecycle: &Lifecycle, width: usize, height: usize) -> Self {
        let engagement = sample(&lifecycle.engagement, width);
        let frequency = sample(&lifecycle.post_frequency, width);

        let max = engagement
            .iter()
            .chain(frequency.iter())
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max)
            .max(1.0);

        let mut grid = vec![vec![' '; engagement.len()]; height];
        // Frequency first so engagement wins where the lines cross.
        plot(&mut grid, &frequency, max, FREQUENCY_MARK);
        plot(&mut grid, &engagement, max, ENGAGEMENT_MARK);

        let rows = grid.into_iter().map(|row| row.into_iter().collect()).collect();

        Self {
            rows,
            first_date: lifecycle.dates.first().cloned().unwrap_or_default(),
            last_date: lifecycle.dates.last().cloned().unwrap_or_default(),
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

/// Downsample `values` to at most `width` points via bucket means.
fn sample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width || width == 0 {
        return values.to_vec();
    }
    (0..width)
        .map(|i| {
            let lo = i * values.len() / width;
            let hi = ((i + 1) * values.len() / width).max(lo + 1);
            let bucket = &values[lo..hi];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect()
}

/// Place one series into the grid, top row = max, bottom row = zero.
fn plot(grid: &mut [Vec<char>], values: &[f64], max: f64, mark: char) {
    let height = grid.len();
    if height == 0 {
        return;
    }
    for (col, &v) in values.iter().enumerate() {
        let scaled = (v.max(0.0) / max * (height - 1) as f64).round() as usize;
        let row = height - 1 - scaled.min(height - 1);
        grid[row][col] = mark;
    }
}

/// Renders the lifecycle chart into its injected surface.
#[derive(Debug, Default)]
pub struct LifecycleChartRenderer {
    surface: Surface,
    chart: ChartSlot<LineChart>,
    width: usize,
    height: usize,
}

impl LifecycleChartRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            surface: Surface::new(),
            chart: ChartSlot::new(),
            width,
            height,
        }
    }

    pub fn render(&mut self, result: &AnalysisResult) {
        let (width, height) = (self.width, self.height);
        let lifecycle = &result.lifecycle;
        let chart = self
            .chart
            .replace_with(|| LineChart::build(lifecycle, width, height));

        self.surface.clear();
        self.surface.line(format!(
            "  {} {}    {} {}",
            ENGAGEMENT_MARK.to_string().cyan(),
            "Engagement".cyan(),
            FREQUENCY_MARK.to_string().blue(),
            "Post Frequency".blue(),
        ));
        for row in chart.rows() {
            self.surface.line(format!("  |{row}"));
        }
        self.surface.line(format!("  +{:-<w$}", "", w = width));
        let pad = width.saturating_sub(chart.first_date.len());
        self.surface.line(format!(
            "   {}{:>pad$}",
            chart.first_date, chart.last_date,
        ));
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn chart(&self) -> &ChartSlot<LineChart> {
        &self.chart
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
