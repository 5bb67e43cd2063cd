//! Interactive watch mode: the live dashboard event loop.
//!
//! A single-threaded cooperative loop over one event queue. Three event
//! sources feed it:
//!
//! - stdin command lines (`analyze <keyword> [platform]`, `use <n>`,
//!   `quit`), bridged from a blocking reader thread;
//! - fetch completions, bridged from `spawn_blocking` tasks carrying the
//!   request id they must present to the controller;
//! - ticker updates, forwarded from the ticker task.
//!
//! Submitting while a fetch is in flight is allowed — the superseded
//! completion is rejected by id when it lands. Loop exit drops the ticker
//! handle, which aborts the recurring timer.

use std::io::BufRead;
use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;
use tokio::sync::mpsc;

use crate::analytics::logger;
use crate::api::{AnalysisClient, FetchError};
use crate::config::TrendscopeConfig;
use crate::dashboard::{ApplyOutcome, Dashboard, RevealMode};
use crate::model::{AnalysisResult, TickerDirection, TrendQuery, ViewState};
use crate::render::platform_chart::PlatformChartRenderer;
use crate::render::ticker_list::TickerListRenderer;
use crate::ticker::{self, TickerUpdate};

// ---------------------------------------------------------------------------
// Events and commands
// ---------------------------------------------------------------------------

/// Everything the event loop reacts to.
enum Event {
    /// One line typed on stdin.
    Input(String),
    /// A fetch completed (successfully or not).
    FetchDone {
        request_id: u64,
        latency_ms: u64,
        outcome: Result<AnalysisResult, FetchError>,
    },
    /// The live ticker produced a replacement pair of lists.
    Tick(TickerUpdate),
    /// Re-present the dashboard (scheduled after a reveal finishes).
    Redraw,
}

/// A parsed stdin command.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Analyze {
        keyword: String,
        platform: Option<String>,
    },
    Use(usize),
    Quit,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => Command::Empty,
        Some("analyze") => match parts.next() {
            Some(keyword) => Command::Analyze {
                keyword: keyword.to_string(),
                platform: parts.next().map(str::to_string),
            },
            None => Command::Unknown("analyze needs a keyword".to_string()),
        },
        Some("use") => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(n) => Command::Use(n),
            None => Command::Unknown("use needs a list number".to_string()),
        },
        Some("quit") | Some("exit") | Some("q") => Command::Quit,
        Some(other) => Command::Unknown(format!("unknown command: {other}")),
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run watch mode until `quit` or stdin closes.
pub async fn run(cfg: TrendscopeConfig) -> Result<()> {
    let client = AnalysisClient::from_config(&cfg.api);
    let mut dashboard = Dashboard::new(&cfg, RevealMode::Animated);

    let mut declining = TickerListRenderer::new(TickerDirection::Declining);
    let mut rising =
        TickerListRenderer::numbered_from(TickerDirection::Rising, cfg.ticker.entries + 1);
    let mut platform_chart = PlatformChartRenderer::new();
    platform_chart.render();

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    spawn_stdin_reader(tx.clone());

    let _ticker_handle = if cfg.ticker.enabled {
        Some(spawn_ticker(&cfg, tx.clone()))
    } else {
        None
    };

    println!("{}", "trendscope watch".bold().cyan());
    println!(
        "  {}",
        "commands: analyze <keyword> [platform] | use <n> | quit".dimmed()
    );
    println!();
    print!("{}", platform_chart.surface());

    let settle = Duration::from_millis(cfg.animation.settle_delay_ms);
    // The keyword/platform of the in-flight request, for analytics.
    let mut pending: Option<(u64, TrendQuery)> = None;

    while let Some(event) = rx.recv().await {
        match event {
            Event::Input(line) => match parse_command(&line) {
                Command::Quit => break,
                Command::Empty => {}
                Command::Unknown(msg) => println!("  {}", msg.yellow()),
                Command::Analyze { keyword, platform } => {
                    let query = match platform {
                        Some(p) => TrendQuery::with_platform(keyword, p),
                        None => TrendQuery::new(keyword),
                    };
                    submit(&mut dashboard, &client, &tx, query, &mut pending);
                }
                Command::Use(n) => {
                    // The click analog: feed a listed trend back into the
                    // query form.
                    let entry = declining.entry(n).or_else(|| rising.entry(n));
                    match entry {
                        Some(item) => {
                            let query =
                                TrendQuery::with_platform(&item.name, &item.platform);
                            submit(&mut dashboard, &client, &tx, query, &mut pending);
                        }
                        None => println!("  {}", format!("no list entry [{n}]").yellow()),
                    }
                }
            },
            Event::FetchDone {
                request_id,
                latency_ms,
                outcome,
            } => {
                match dashboard.apply_result(request_id, outcome) {
                    ApplyOutcome::Rendered => {
                        if let Some((id, query)) = &pending
                            && *id == request_id
                            && let ViewState::Ready(result) = dashboard.state()
                        {
                            logger::log_analysis_success(
                                &query.keyword,
                                &query.platform,
                                &result.trend_status,
                                result.confidence_score,
                                latency_ms,
                            );
                        }
                        // Let the fan-out settle before presenting, then
                        // schedule one redraw for when the reveal is done.
                        tokio::time::sleep(settle).await;
                        print!("{}", dashboard.present());
                        if let ViewState::Ready(result) = dashboard.state() {
                            schedule_redraw(&cfg, result, tx.clone());
                        }
                    }
                    ApplyOutcome::Failed => {
                        if let Some((id, query)) = &pending
                            && *id == request_id
                        {
                            logger::log_analysis_failure(
                                &query.keyword,
                                &query.platform,
                                latency_ms,
                            );
                        }
                        print!("{}", dashboard.present());
                    }
                    // Superseded by a newer submission; nothing to show.
                    ApplyOutcome::Stale => {}
                }
            }
            Event::Tick(update) => {
                declining.render(&update.declining);
                rising.render(&update.rising);
                println!();
                print!("{}", declining.surface());
                print!("{}", rising.surface());
            }
            Event::Redraw => {
                if dashboard.results_visible() && !dashboard.is_busy() {
                    print!("{}", dashboard.present());
                }
            }
        }
    }

    // Ticker handle drops here; its timer task is aborted.
    Ok(())
}

/// Begin a submission and hand the blocking fetch to the thread pool. The
/// completion comes back through the event queue with the request id.
fn submit(
    dashboard: &mut Dashboard,
    client: &AnalysisClient,
    tx: &mpsc::UnboundedSender<Event>,
    query: TrendQuery,
    pending: &mut Option<(u64, TrendQuery)>,
) {
    let request_id = match dashboard.begin_submit(&query) {
        Ok(id) => id,
        Err(err) => {
            println!("  {}", err.to_string().yellow());
            return;
        }
    };
    print!("{}", dashboard.present());

    *pending = Some((request_id, query.clone()));

    let client = client.clone();
    let tx = tx.clone();
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let outcome = client.analyze(&query);
        let latency_ms = started.elapsed().as_millis() as u64;
        let _ = tx.send(Event::FetchDone {
            request_id,
            latency_ms,
            outcome,
        });
    });
}

/// Bridge blocking stdin reads into the event queue. The thread ends when
/// stdin closes or the loop goes away.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<Event>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Input(line)).is_err() {
                break;
            }
        }
    });
}

/// Start the ticker and forward its updates into the event queue.
fn spawn_ticker(cfg: &TrendscopeConfig, tx: mpsc::UnboundedSender<Event>) -> ticker::TickerHandle {
    let (ticker_tx, mut ticker_rx) = mpsc::unbounded_channel();
    let handle = ticker::spawn(&cfg.ticker, ticker_tx);
    tokio::spawn(async move {
        while let Some(update) = ticker_rx.recv().await {
            if tx.send(Event::Tick(update)).is_err() {
                break;
            }
        }
    });
    handle
}

/// Queue one `Redraw` for when the insight reveal has run to completion,
/// so the fully revealed text ends up on screen.
fn schedule_redraw(cfg: &TrendscopeConfig, result: &AnalysisResult, tx: mpsc::UnboundedSender<Event>) {
    let chars = result
        .explainable_reasoning
        .chars()
        .count()
        .max(result.genai_insight.chars().count()) as u64;
    let reveal_ms = cfg.reveal.stagger_ms + chars * cfg.reveal.char_interval_ms.max(1);
    let delay = Duration::from_millis(reveal_ms + 50);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(Event::Redraw);
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
