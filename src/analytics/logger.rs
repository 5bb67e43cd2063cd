use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Analysis log entry (JSONL history)
// ---------------------------------------------------------------------------

/// A single entry in the analysis history (`~/.trendscope/analysis-log.jsonl`).
///
/// Each entry records one completed submission — keyword, platform, the
/// returned status and confidence (when the fetch succeeded), and timing.
/// Used by the reporter for aggregation and `trendscope stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisLogEntry {
    pub timestamp: String,
    pub keyword: String,
    pub platform: String,
    /// Whether the fetch completed and rendered.
    #[serde(default = "default_true")]
    pub success: bool,
    /// Returned trend status (only set on success).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trend_status: Option<String>,
    /// Returned confidence in [0, 1] (only set on success).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence_score: Option<f64>,
    /// Wall-clock fetch latency in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Logging functions
// ---------------------------------------------------------------------------

/// Log a successful analysis.
pub fn log_analysis_success(
    keyword: &str,
    platform: &str,
    trend_status: &str,
    confidence_score: f64,
    latency_ms: u64,
) {
    let entry = AnalysisLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        keyword: keyword.to_string(),
        platform: platform.to_string(),
        success: true,
        trend_status: Some(trend_status.to_string()),
        confidence_score: Some(confidence_score),
        latency_ms: Some(latency_ms),
    };
    let _ = append_log_entry(&entry);
}

/// Log a failed analysis.
pub fn log_analysis_failure(keyword: &str, platform: &str, latency_ms: u64) {
    let entry = AnalysisLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        keyword: keyword.to_string(),
        platform: platform.to_string(),
        success: false,
        trend_status: None,
        confidence_score: None,
        latency_ms: Some(latency_ms),
    };
    let _ = append_log_entry(&entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all entries from `~/.trendscope/analysis-log.jsonl`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does
/// not exist or cannot be read.
pub fn read_all_entries() -> Vec<AnalysisLogEntry> {
    let Some(path) = analysis_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<AnalysisLogEntry>(&line).ok())
        .collect()
}

/// Read log entries filtered to a time window (last N days).
///
/// If `days` is `None`, returns all entries.
pub fn read_entries_since_days(days: Option<u32>) -> Vec<AnalysisLogEntry> {
    let entries = read_all_entries();

    let Some(days) = days else {
        return entries;
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let cutoff_str = cutoff.to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff_str)
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &AnalysisLogEntry) -> Result<()> {
    let Some(path) = analysis_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the analysis log file.
pub fn analysis_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".trendscope").join("analysis-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_through_json() {
        let entry = AnalysisLogEntry {
            timestamp: "2024-06-01T00:00:00Z".into(),
            keyword: "#AIArt".into(),
            platform: "TikTok".into(),
            success: true,
            trend_status: Some("Plateauing".into()),
            confidence_score: Some(0.72),
            latency_ms: Some(840),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: AnalysisLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.keyword, "#AIArt");
        assert_eq!(back.trend_status.as_deref(), Some("Plateauing"));
    }

    #[test]
    fn failure_entry_omits_result_fields() {
        let entry = AnalysisLogEntry {
            timestamp: "2024-06-01T00:00:00Z".into(),
            keyword: "#AIArt".into(),
            platform: "TikTok".into(),
            success: false,
            trend_status: None,
            confidence_score: None,
            latency_ms: Some(120),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("trend_status"));
        assert!(!json.contains("confidence_score"));
    }

    #[test]
    fn malformed_lines_are_skipped_on_read() {
        let line = r#"{"timestamp":"t","keyword":"k","platform":"p"}"#;
        let parsed: AnalysisLogEntry = serde_json::from_str(line).unwrap();
        // Missing optional fields default sensibly.
        assert!(parsed.success);
        assert!(parsed.trend_status.is_none());

        assert!(serde_json::from_str::<AnalysisLogEntry>("not json").is_err());
    }
}
