//! Live trends ticker: a fixed-period refresh loop feeding the two trend
//! lists.
//!
//! Runs as a spawned task on a `tokio::time::interval` — the first tick
//! fires immediately at startup, then every period (default 30 s). Each
//! tick synthesizes a complete replacement pair of lists and sends it to
//! the watch loop; nothing is merged or diffed. Dropping the
//! [`TickerHandle`] aborts the task, so the recurring timer can never fire
//! against a torn-down dashboard.
//!
//! The data source is a mock generator (bounded random magnitudes over
//! fixed name/platform pools). A real feed would replace
//! [`generate_trends`] only; the scheduling contract stays as-is.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::schema::TickerConfig;
use crate::model::{TickerDirection, TrendTickerItem};

/// One full replacement of both live lists.
#[derive(Debug, Clone)]
pub struct TickerUpdate {
    pub declining: Vec<TrendTickerItem>,
    pub rising: Vec<TrendTickerItem>,
}

impl TickerUpdate {
    /// Synthesize a fresh update with `entries` items per list.
    pub fn generate(entries: usize) -> Self {
        Self {
            declining: generate_trends(TickerDirection::Declining, entries),
            rising: generate_trends(TickerDirection::Rising, entries),
        }
    }
}

// ---------------------------------------------------------------------------
// Mock generator
// ---------------------------------------------------------------------------

const HASHTAGS: [&str; 15] = [
    "#AIArt",
    "#TechNews",
    "#Fitness2024",
    "#CryptoUpdate",
    "#FoodieLife",
    "#TravelGoals",
    "#StartupLife",
    "#Gaming",
    "#Fashion",
    "#Mindfulness",
    "#Sustainability",
    "#RemoteWork",
    "#WebDev",
    "#Photography",
    "#Music",
];

const PLATFORMS: [&str; 4] = ["Instagram", "TikTok", "Twitter/X", "LinkedIn"];

/// Synthesize `n` mock trend entries. Declining magnitudes fall in
/// (−50, −10], rising in [+20, +80); engagement in [50 000, 550 000).
pub fn generate_trends(direction: TickerDirection, n: usize) -> Vec<TrendTickerItem> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| {
            let change = match direction {
                TickerDirection::Declining => -rng.gen_range(10.0..50.0),
                TickerDirection::Rising => rng.gen_range(20.0..80.0),
            };
            TrendTickerItem {
                name: HASHTAGS[rng.gen_range(0..HASHTAGS.len())].to_string(),
                platform: PLATFORMS[rng.gen_range(0..PLATFORMS.len())].to_string(),
                // One decimal place, like the displayed value.
                change: (change * 10.0_f64).round() / 10.0,
                engagement: rng.gen_range(50_000..550_000),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ticker task
// ---------------------------------------------------------------------------

/// Handle to the running ticker. The ticker transitions `Stopped → Running`
/// on [`spawn`] and back on teardown: dropping the handle (or calling
/// [`stop`](TickerHandle::stop)) aborts the task and releases the timer.
#[derive(Debug)]
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Stop the ticker explicitly.
    pub fn stop(self) {
        // Drop does the abort.
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start the ticker. Sends a [`TickerUpdate`] immediately, then one per
/// period, until the receiver goes away or the handle is dropped.
pub fn spawn(config: &TickerConfig, tx: mpsc::UnboundedSender<TickerUpdate>) -> TickerHandle {
    let period = Duration::from_secs(config.period_secs.max(1));
    let entries = config.entries;

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if tx.send(TickerUpdate::generate(entries)).is_err() {
                break;
            }
        }
    });

    TickerHandle { task }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
