//! Analysis history and reporting.
//!
//! Every completed submission is appended to a JSONL log under
//! `~/.trendscope/`; `trendscope stats` aggregates it. Logging is
//! best-effort — an unwritable home directory never fails an analysis.

pub mod logger;
pub mod reporter;
