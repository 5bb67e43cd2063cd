//! CLI command implementations for trendscope.
//!
//! Provides subcommand handlers for:
//! - `trendscope analyze "#keyword"` — one-shot analysis, rendered immediately
//! - `trendscope health` — check the analysis service, config, history log
//! - `trendscope platforms` — list the platforms the service supports
//! - `trendscope stats` — aggregate the local analysis history
//! - `trendscope config show|init|set|reset` — configuration management

use std::time::Instant;

use anyhow::Result;
use colored::Colorize;

use crate::analytics::{logger, reporter};
use crate::api::AnalysisClient;
use crate::config;
use crate::dashboard::{ApplyOutcome, Dashboard, RevealMode};
use crate::model::TrendQuery;

/// Output format for analytics commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// trendscope analyze
// ---------------------------------------------------------------------------

/// Run a single analysis and print the full dashboard.
///
/// One-shot mode skips the animated reveals — everything renders at its
/// final state. The outcome is appended to the analysis history either way.
pub fn run_analyze(query: &TrendQuery) -> Result<()> {
    let cfg = config::load();
    let client = AnalysisClient::from_config(&cfg.api);
    let mut dashboard = Dashboard::new(&cfg, RevealMode::Immediate);

    println!(
        "{} {} {}",
        "Analyzing".bold().cyan(),
        query.keyword.bold(),
        format!("on {} ({} – {})", query.platform, query.start_date, query.end_date).dimmed(),
    );

    let started = Instant::now();
    let outcome = dashboard.submit_blocking(&client, query)?;
    let latency_ms = started.elapsed().as_millis() as u64;

    match outcome {
        ApplyOutcome::Rendered => {
            if let crate::model::ViewState::Ready(result) = dashboard.state() {
                logger::log_analysis_success(
                    &query.keyword,
                    &query.platform,
                    &result.trend_status,
                    result.confidence_score,
                    latency_ms,
                );
            }
            println!();
            print!("{}", dashboard.present());
            Ok(())
        }
        ApplyOutcome::Failed => {
            logger::log_analysis_failure(&query.keyword, &query.platform, latency_ms);
            print!("{}", dashboard.present());
            anyhow::bail!("analysis did not complete");
        }
        // Unreachable in one-shot mode: there is exactly one request in
        // flight, so its id is always the latest.
        ApplyOutcome::Stale => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// trendscope health
// ---------------------------------------------------------------------------

/// Check system health: analysis service, config files, history log.
pub fn run_health() -> Result<()> {
    println!("{}", "trendscope Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let cfg = config::load();

    // 0. Config file status
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.trendscope/config.toml found"
        } else {
            "not found (run `trendscope config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".trendscope.toml found"
        } else {
            "none (optional)"
        },
    );

    // 1. Analysis service connectivity
    let client = AnalysisClient::from_config(&cfg.api);
    let service_ok = client.is_healthy();
    let service_detail = if service_ok {
        format!("reachable at {}", cfg.api.base_url)
    } else {
        format!(
            "not reachable at {} — is the analysis service running?",
            cfg.api.base_url
        )
    };
    print_health_item("Analysis service", service_ok, &service_detail);

    // 2. Ticker
    print_health_item(
        "Live ticker",
        cfg.ticker.enabled,
        &if cfg.ticker.enabled {
            format!("enabled, every {}s", cfg.ticker.period_secs)
        } else {
            "disabled".to_string()
        },
    );

    // 3. Analysis history
    let log_exists = logger::analysis_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    let log_entries = if log_exists {
        logger::read_all_entries().len()
    } else {
        0
    };
    print_health_item(
        "Analysis history",
        log_exists,
        &if log_exists {
            format!("{} entries", log_entries)
        } else {
            "no history yet".to_string()
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<18} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// trendscope platforms
// ---------------------------------------------------------------------------

/// List the platforms the analysis service supports.
pub fn run_platforms() -> Result<()> {
    let cfg = config::load();
    let client = AnalysisClient::from_config(&cfg.api);
    let platforms = client.platforms()?;

    println!("{}", "Supported Platforms".bold().cyan());
    for platform in &platforms {
        println!("  {} {}", "·".dimmed(), platform);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// trendscope stats
// ---------------------------------------------------------------------------

/// Show analysis history statistics.
pub fn run_stats(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let stats = reporter::compute_stats(days);

    if stats.total_analyses == 0 {
        println!(
            "{}",
            "No data yet. Run `trendscope analyze` to build a history.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_stats_json(&stats)?,
        OutputFormat::Csv => print_stats_csv(&stats),
        OutputFormat::Table => print_stats_table(&stats),
    }

    Ok(())
}

fn print_stats_table(stats: &reporter::Stats) {
    println!("{}", "trendscope Analysis Report".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    // Summary
    println!("  {} {}", "Total analyses:".bold(), stats.total_analyses);
    println!(
        "  {} {:.1}% ({} ok / {} failed)",
        "Success rate:  ".bold(),
        stats.success_rate_pct,
        stats.successes,
        stats.failures,
    );
    println!(
        "  {} {:.0}%",
        "Avg confidence:".bold(),
        stats.avg_confidence_pct
    );
    println!("  {} {:.0}ms", "Avg latency:   ".bold(), stats.avg_latency_ms);
    println!();

    // Status distribution
    if !stats.status_distribution.is_empty() {
        println!("{}", "Status Distribution".bold().cyan());
        for (status, count) in &stats.status_distribution {
            println!("  {:<18} {:>5}", status, count);
        }
        println!();
    }

    // Top keywords table
    if !stats.top_keywords.is_empty() {
        println!("{}", "Top Keywords".bold().cyan());
        println!("  {:<20} {:>6} Last status", "Keyword", "Count");
        println!("  {}", "-".repeat(48));

        for (i, kw) in stats.top_keywords.iter().take(15).enumerate() {
            let line = format!(
                "  {:<20} {:>6} {}",
                truncate(&kw.keyword, 20),
                kw.count,
                kw.last_status.as_deref().unwrap_or("—"),
            );

            if i % 2 == 0 {
                println!("{}", line);
            } else {
                println!("{}", line.dimmed());
            }
        }
    }
}

fn print_stats_json(stats: &reporter::Stats) -> Result<()> {
    let value = serde_json::json!({
        "total_analyses": stats.total_analyses,
        "successes": stats.successes,
        "failures": stats.failures,
        "success_rate_pct": stats.success_rate_pct,
        "avg_confidence_pct": stats.avg_confidence_pct,
        "avg_latency_ms": stats.avg_latency_ms,
        "status_distribution": stats.status_distribution.iter()
            .map(|(status, count)| serde_json::json!({ "status": status, "count": count }))
            .collect::<Vec<_>>(),
        "keywords": stats.top_keywords.iter().map(|k| serde_json::json!({
            "keyword": k.keyword,
            "count": k.count,
            "last_status": k.last_status,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_stats_csv(stats: &reporter::Stats) {
    println!("keyword,count,last_status");
    for kw in &stats.top_keywords {
        println!(
            "{},{},{}",
            kw.keyword,
            kw.count,
            kw.last_status.as_deref().unwrap_or(""),
        );
    }
}

// ---------------------------------------------------------------------------
// trendscope config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective trendscope Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    // Show source info
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.trendscope/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.trendscope/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".trendscope.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            ".trendscope.toml (not found)".dimmed()
        );
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "TRENDSCOPE_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.trendscope/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to customize trendscope behavior.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
