use anyhow::Result;
use clap::{Parser, Subcommand};

use trendscope::model::TrendQuery;
use trendscope::{cli, config, watch};

#[derive(Debug, Parser)]
#[command(name = "trendscope")]
#[command(about = "Social media trend decline analysis, in the terminal")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one trend and print the full dashboard
    Analyze {
        /// The trend keyword or hashtag, e.g. "#AIArt"
        keyword: String,
        /// Platform to analyze on
        #[arg(long, default_value = "Instagram")]
        platform: String,
        /// Analysis window start (YYYY-MM-DD, default: two weeks ago)
        #[arg(long)]
        start_date: Option<String>,
        /// Analysis window end (YYYY-MM-DD, default: today)
        #[arg(long)]
        end_date: Option<String>,
        /// Analysis depth requested from the service
        #[arg(long, default_value = "standard")]
        depth: String,
        /// Region scope
        #[arg(long, default_value = "Global")]
        region: String,
        /// Minimum engagement threshold
        #[arg(long, default_value = "1000")]
        min_engagement: u64,
        /// Requested confidence level (percent)
        #[arg(long, default_value = "85")]
        confidence_level: u32,
    },
    /// Interactive dashboard with the live trends ticker
    Watch,
    /// Check the analysis service, config files, and history log
    Health,
    /// List the platforms the analysis service supports
    Platforms,
    /// Show analysis history statistics
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective merged configuration
    Show,
    /// Write the default config to ~/.trendscope/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a single value, e.g. `ticker.period_secs 10`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Analyze {
            keyword,
            platform,
            start_date,
            end_date,
            depth,
            region,
            min_engagement,
            confidence_level,
        } => {
            let mut query = TrendQuery::with_platform(keyword, platform);
            if let Some(start) = start_date {
                query.start_date = start;
            }
            if let Some(end) = end_date {
                query.end_date = end;
            }
            query.analysis_depth = depth;
            query.region = region;
            query.min_engagement = min_engagement;
            query.confidence_level = confidence_level;
            cli::run_analyze(&query)
        }
        Commands::Watch => {
            let cfg = config::load();
            // Current-thread flavor: the dashboard is a cooperative
            // single-threaded loop; only fetches leave it via
            // spawn_blocking.
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(watch::run(cfg))
        }
        Commands::Health => cli::run_health(),
        Commands::Platforms => cli::run_platforms(),
        Commands::Stats { format, days } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt, days)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
