/// Configuration schema and defaults for trendscope.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[api]`, `[ticker]`, `[reveal]`, `[animation]`, and `[display]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level trendscope configuration.
///
/// Maps directly to the `~/.trendscope/config.toml` and `.trendscope.toml`
/// file schemas. All sections and fields are optional — missing values fall
/// back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendscopeConfig {
    pub api: ApiConfig,
    pub ticker: TickerConfig,
    pub reveal: RevealConfig,
    pub animation: AnimationConfig,
    pub display: DisplayConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Analysis service endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the trend analysis service.
    pub base_url: String,
    /// Request timeout for analysis calls (milliseconds).
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 15_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [ticker]
// ---------------------------------------------------------------------------

/// Live trends ticker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Whether the live ticker runs in watch mode.
    pub enabled: bool,
    /// Fixed period between ticks (seconds). The first tick fires
    /// immediately at startup.
    pub period_secs: u64,
    /// Number of entries per list per tick.
    pub entries: usize,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period_secs: 30,
            entries: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// [reveal]
// ---------------------------------------------------------------------------

/// Incremental insight-text reveal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Interval between revealed characters (milliseconds).
    pub char_interval_ms: u64,
    /// Delay before the GenAI insight starts revealing, measured from the
    /// start of the reasoning reveal (milliseconds).
    pub stagger_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            char_interval_ms: 20,
            stagger_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// [animation]
// ---------------------------------------------------------------------------

/// Cosmetic animation timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Delay between fan-out completion and presenting the results surface
    /// (milliseconds) — lets everything settle before the reveal.
    pub settle_delay_ms: u64,
    /// Delay before the first signal bar starts growing (milliseconds).
    pub bar_initial_delay_ms: u64,
    /// Staggered start delay between consecutive signal bars (milliseconds).
    pub bar_stagger_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
            bar_initial_delay_ms: 200,
            bar_stagger_ms: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

/// Terminal rendering dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Plot width in columns for the lifecycle chart and sparkline.
    pub chart_width: usize,
    /// Plot height in rows for the lifecycle chart.
    pub chart_height: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart_width: 56,
            chart_height: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl TrendscopeConfig {
    /// The annotated default config written by `trendscope config init`.
    pub fn default_toml() -> String {
        r#"# trendscope Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (TRENDSCOPE_*)
#   2. Project config (.trendscope.toml in current directory)
#   3. User global config (~/.trendscope/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://localhost:5000"  # Trend analysis service
timeout_ms = 15000

[ticker]
enabled = true
period_secs = 30   # Fixed period between live-trend ticks
entries = 5        # Entries per list per tick

[reveal]
char_interval_ms = 20  # Per-character reveal interval
stagger_ms = 500       # Delay before the GenAI insight starts

[animation]
settle_delay_ms = 100
bar_initial_delay_ms = 200
bar_stagger_ms = 100

[display]
chart_width = 56
chart_height = 8
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = TrendscopeConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.ticker.period_secs, 30);
        assert_eq!(config.ticker.entries, 5);
        assert_eq!(config.reveal.char_interval_ms, 20);
        assert_eq!(config.reveal.stagger_ms, 500);
        assert_eq!(config.animation.settle_delay_ms, 100);
    }

    #[test]
    fn default_toml_parses_back() {
        let toml_str = TrendscopeConfig::default_toml();
        let parsed: TrendscopeConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.api.timeout_ms,
            TrendscopeConfig::default().api.timeout_ms
        );
        assert_eq!(parsed.ticker.period_secs, 30);
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let parsed: TrendscopeConfig = toml::from_str("[ticker]\nperiod_secs = 5\n").unwrap();
        assert_eq!(parsed.ticker.period_secs, 5);
        // Untouched sections keep their defaults.
        assert_eq!(parsed.api.base_url, "http://localhost:5000");
        assert_eq!(parsed.display.chart_height, 8);
    }
}
