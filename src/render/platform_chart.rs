//! Platform share chart: the fixed platform-distribution panel shown in
//! the watch sidebar. The distribution is static — it frames the live
//! ticker rather than reflecting any fetched result, so it renders once at
//! startup.

use colored::{Color, Colorize};

use crate::render::Surface;

/// Static platform share, in display order.
const PLATFORM_SHARE: [(&str, u32, Color); 5] = [
    ("Instagram", 30, Color::Cyan),
    ("TikTok", 25, Color::Blue),
    ("Twitter/X", 20, Color::Yellow),
    ("LinkedIn", 15, Color::Red),
    ("YouTube", 10, Color::Green),
];

/// Columns at 100% share.
const FULL_BAR: usize = 30;

#[derive(Debug, Default)]
pub struct PlatformChartRenderer {
    surface: Surface,
}

impl PlatformChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self) {
        self.surface.clear();
        self.surface
            .line(format!("  {}", "Platform Share".bold()));
        for (name, share, color) in PLATFORM_SHARE {
            let width = (share as usize * FULL_BAR) / 100;
            let fill: String = "█".repeat(width);
            self.surface.line(format!(
                "  {:<10} {:>3}% {}",
                name,
                share,
                fill.color(color),
            ));
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
