//! Live trends list renderer.
//!
//! Each ticker cycle hands over a complete replacement list — render clears
//! the surface and draws every entry fresh, no diffing against the prior
//! cycle. Entries are numbered so watch mode can feed one back into the
//! query form with `use <n>`.

use colored::Colorize;

use crate::model::{TickerDirection, TrendTickerItem};
use crate::render::{Surface, format_number};

/// Renders one ticker list (declining or rising) into its injected surface.
#[derive(Debug)]
pub struct TickerListRenderer {
    surface: Surface,
    direction: TickerDirection,
    items: Vec<TrendTickerItem>,
    first_index: usize,
}

impl TickerListRenderer {
    pub fn new(direction: TickerDirection) -> Self {
        Self::numbered_from(direction, 1)
    }

    /// A renderer whose displayed numbering starts at `first_index`. Watch
    /// mode numbers the rising list after the declining one so `use <n>`
    /// is unambiguous across both.
    pub fn numbered_from(direction: TickerDirection, first_index: usize) -> Self {
        Self {
            surface: Surface::new(),
            direction,
            items: Vec::new(),
            first_index,
        }
    }

    /// Replace the rendered list wholesale.
    pub fn render(&mut self, items: &[TrendTickerItem]) {
        self.items = items.to_vec();
        self.surface.clear();

        let title = match self.direction {
            TickerDirection::Declining => "Declining Now".red().bold(),
            TickerDirection::Rising => "Rising Now".green().bold(),
        };
        self.surface.line(format!("  {title}"));

        for (i, item) in self.items.iter().enumerate() {
            let change = format_change(item.change);
            let change = match self.direction {
                TickerDirection::Declining => change.red(),
                TickerDirection::Rising => change.green(),
            };
            self.surface.line(format!(
                "  [{}] {:<16} {:<11} {:>8} {:>8}",
                self.first_index + i,
                item.name,
                item.platform.clone().dimmed(),
                change,
                format_number(item.engagement),
            ));
        }
    }

    /// The entry a `use <n>` command refers to, by displayed number.
    pub fn entry(&self, display_index: usize) -> Option<&TrendTickerItem> {
        display_index
            .checked_sub(self.first_index)
            .and_then(|i| self.items.get(i))
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

/// Signed percent with an explicit `+` for gains, one decimal place.
fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{change:.1}%")
    } else {
        format!("{change:.1}%")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
