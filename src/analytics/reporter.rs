//! Aggregation over the analysis history for `trendscope stats`.

use std::collections::BTreeMap;

use super::logger::{self, AnalysisLogEntry};

/// Aggregated analysis history.
#[derive(Debug, Default)]
pub struct Stats {
    pub total_analyses: usize,
    pub successes: usize,
    pub failures: usize,
    pub success_rate_pct: f64,
    /// Mean confidence over successful analyses, as a percent.
    pub avg_confidence_pct: f64,
    /// Mean fetch latency over entries that recorded one.
    pub avg_latency_ms: f64,
    /// Status label → count over successful analyses, descending by count.
    pub status_distribution: Vec<(String, usize)>,
    /// Most-analyzed keywords, descending by count.
    pub top_keywords: Vec<KeywordStats>,
}

/// Per-keyword aggregation.
#[derive(Debug, Clone)]
pub struct KeywordStats {
    pub keyword: String,
    pub count: usize,
    /// Most recently returned status for this keyword, if any.
    pub last_status: Option<String>,
}

/// Compute stats over the last `days` days (or everything).
pub fn compute_stats(days: Option<u32>) -> Stats {
    aggregate(&logger::read_entries_since_days(days))
}

/// Pure aggregation, separated from file I/O for testability.
pub fn aggregate(entries: &[AnalysisLogEntry]) -> Stats {
    let total = entries.len();
    let successes = entries.iter().filter(|e| e.success).count();
    let failures = total - successes;

    let confidences: Vec<f64> = entries.iter().filter_map(|e| e.confidence_score).collect();
    let avg_confidence_pct = if confidences.is_empty() {
        0.0
    } else {
        confidences.iter().sum::<f64>() / confidences.len() as f64 * 100.0
    };

    let latencies: Vec<u64> = entries.iter().filter_map(|e| e.latency_ms).collect();
    let avg_latency_ms = if latencies.is_empty() {
        0.0
    } else {
        latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
    };

    let mut by_status: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries {
        if let Some(status) = &entry.trend_status {
            *by_status.entry(status).or_default() += 1;
        }
    }
    let mut status_distribution: Vec<(String, usize)> = by_status
        .into_iter()
        .map(|(status, count)| (status.to_string(), count))
        .collect();
    status_distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut by_keyword: BTreeMap<&str, KeywordStats> = BTreeMap::new();
    for entry in entries {
        let stats = by_keyword
            .entry(&entry.keyword)
            .or_insert_with(|| KeywordStats {
                keyword: entry.keyword.clone(),
                count: 0,
                last_status: None,
            });
        stats.count += 1;
        if let Some(status) = &entry.trend_status {
            // Entries are appended chronologically; the last one wins.
            stats.last_status = Some(status.clone());
        }
    }
    let mut top_keywords: Vec<KeywordStats> = by_keyword.into_values().collect();
    top_keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));

    Stats {
        total_analyses: total,
        successes,
        failures,
        success_rate_pct: if total == 0 {
            0.0
        } else {
            successes as f64 / total as f64 * 100.0
        },
        avg_confidence_pct,
        avg_latency_ms,
        status_distribution,
        top_keywords,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(keyword: &str, success: bool, status: Option<&str>, conf: Option<f64>) -> AnalysisLogEntry {
        AnalysisLogEntry {
            timestamp: "2024-06-01T00:00:00Z".into(),
            keyword: keyword.into(),
            platform: "Instagram".into(),
            success,
            trend_status: status.map(str::to_string),
            confidence_score: conf,
            latency_ms: Some(100),
        }
    }

    #[test]
    fn empty_history_aggregates_to_zero() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_analyses, 0);
        assert_eq!(stats.success_rate_pct, 0.0);
        assert!(stats.top_keywords.is_empty());
    }

    #[test]
    fn success_rate_and_confidence() {
        let entries = vec![
            entry("#A", true, Some("Growing"), Some(0.8)),
            entry("#A", true, Some("Plateauing"), Some(0.6)),
            entry("#B", false, None, None),
            entry("#C", true, Some("Growing"), Some(0.7)),
        ];
        let stats = aggregate(&entries);
        assert_eq!(stats.total_analyses, 4);
        assert_eq!(stats.successes, 3);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.success_rate_pct, 75.0);
        assert!((stats.avg_confidence_pct - 70.0).abs() < 1e-9);
    }

    #[test]
    fn status_distribution_sorts_by_count() {
        let entries = vec![
            entry("#A", true, Some("Growing"), Some(0.8)),
            entry("#B", true, Some("Growing"), Some(0.8)),
            entry("#C", true, Some("Plateauing"), Some(0.5)),
        ];
        let stats = aggregate(&entries);
        assert_eq!(stats.status_distribution[0], ("Growing".to_string(), 2));
        assert_eq!(stats.status_distribution[1], ("Plateauing".to_string(), 1));
    }

    #[test]
    fn top_keywords_track_count_and_last_status() {
        let entries = vec![
            entry("#A", true, Some("Growing"), Some(0.8)),
            entry("#A", true, Some("Early Decline"), Some(0.7)),
            entry("#B", true, Some("Plateauing"), Some(0.5)),
        ];
        let stats = aggregate(&entries);
        assert_eq!(stats.top_keywords[0].keyword, "#A");
        assert_eq!(stats.top_keywords[0].count, 2);
        assert_eq!(
            stats.top_keywords[0].last_status.as_deref(),
            Some("Early Decline")
        );
    }
}
