//! trendscope — a terminal dashboard for social media trend decline
//! analysis.
//!
//! Talks to a trend analysis service (`POST /analyze-trend`) and renders
//! the response across a set of panels: status card, lifecycle chart,
//! decline factor bars, engagement sparkline, insight texts, and signal
//! bars. Watch mode adds a live trends ticker and an interactive event
//! loop; one-shot mode prints everything at once.

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod model;
pub mod render;
pub mod ticker;
pub mod watch;
