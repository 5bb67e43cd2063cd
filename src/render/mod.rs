//! Render targets for the dashboard fan-out.
//!
//! Every renderer follows the same contract:
//!
//! - It owns its presentation state and writes into a [`Surface`] injected
//!   at construction — no ambient lookup of output targets, which keeps
//!   every renderer unit-testable without a terminal.
//! - It is idempotent: rendering the same [`AnalysisResult`] twice leaves
//!   the same visible output, and chart-holding renderers go through
//!   [`ChartSlot`], which guarantees the prior chart instance is disposed
//!   before a new one is built — at most one live instance per target.

pub mod factor_chart;
pub mod insight;
pub mod lifecycle_chart;
pub mod platform_chart;
pub mod signal_bars;
pub mod sparkline;
pub mod status_card;
pub mod ticker_list;

use std::fmt;
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// An owned line buffer a renderer draws into.
///
/// The dashboard collects surfaces in a fixed order and prints them when the
/// results surface becomes visible; hiding results means not printing, the
/// buffers are never destroyed by a visibility change.
#[derive(Debug, Default)]
pub struct Surface {
    lines: Vec<String>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all content. Renderers call this at the top of each render so
    /// repeated renders replace rather than append.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Append one line.
    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// A surface shared with an async writer (the insight reveal task updates
/// its surface across await points).
pub type SharedSurface = Arc<Mutex<Surface>>;

pub fn shared_surface() -> SharedSurface {
    Arc::new(Mutex::new(Surface::new()))
}

// ---------------------------------------------------------------------------
// ChartSlot
// ---------------------------------------------------------------------------

/// Owned chart-instance holder with destroy-then-build replacement.
///
/// Mirrors the charting collaborator contract: replacing a chart disposes
/// the prior instance before constructing the new one, so re-rendering can
/// never accumulate overlapping instances.
#[derive(Debug)]
pub struct ChartSlot<T> {
    instance: Option<T>,
    builds: u64,
}

impl<T> Default for ChartSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChartSlot<T> {
    pub fn new() -> Self {
        Self {
            instance: None,
            builds: 0,
        }
    }

    /// Dispose any prior instance, then build and install a new one.
    pub fn replace_with(&mut self, build: impl FnOnce() -> T) -> &T {
        // Drop before build: the old instance must be gone before the new
        // one exists.
        self.instance = None;
        self.builds += 1;
        self.instance.insert(build())
    }

    pub fn get(&self) -> Option<&T> {
        self.instance.as_ref()
    }

    /// Whether a chart instance is currently live. Never more than one.
    pub fn is_live(&self) -> bool {
        self.instance.is_some()
    }

    /// Total number of instances built over this slot's lifetime.
    pub fn builds(&self) -> u64 {
        self.builds
    }
}

// ---------------------------------------------------------------------------
// Shared formatting
// ---------------------------------------------------------------------------

/// Compact engagement-count formatting: `1_234_567` → `"1.2M"`,
/// `45_300` → `"45.3K"`, below a thousand unchanged.
pub fn format_number(num: u64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
