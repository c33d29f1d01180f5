//! Stats types for per-day invocation counts

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-day invocation counts, keyed by ISO date (YYYY-MM-DD).
/// BTreeMap keeps iteration date-sorted ascending.
pub type DailyBucket = BTreeMap<String, u64>;

/// UTC query window covering the last N days, current (partial) day included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window ending now and starting `days` days earlier
    pub fn last_days(days: u32) -> Self {
        Self::last_days_from(days, Utc::now())
    }

    /// Deterministic variant used by tests
    pub fn last_days_from(days: u32, end: DateTime<Utc>) -> Self {
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }
}

/// Per-account daily counts for each metric, plus their per-date sum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountStats {
    pub workers: DailyBucket,
    pub pages: DailyBucket,
    pub combined: DailyBucket,
}

impl AccountStats {
    /// Derive `combined` as the date-wise sum over the union of both key sets
    pub fn from_buckets(workers: DailyBucket, pages: DailyBucket) -> Self {
        let mut combined = DailyBucket::new();
        for (date, count) in workers.iter().chain(pages.iter()) {
            *combined.entry(date.clone()).or_insert(0) += count;
        }
        Self {
            workers,
            pages,
            combined,
        }
    }

    /// Sum of `combined` across the whole window
    pub fn window_total(&self) -> u64 {
        self.combined.values().sum()
    }
}

/// Report accumulated across accounts, in fetch order
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateReport {
    /// (display name, stats) pairs in the order accounts were fetched
    pub accounts: Vec<(String, AccountStats)>,
    /// Date-wise sum of every account's combined bucket
    pub totals: DailyBucket,
    /// Window length in days, for the grand-total label
    pub window_days: u32,
}

impl AggregateReport {
    pub fn new(window_days: u32) -> Self {
        Self {
            accounts: Vec::new(),
            totals: DailyBucket::new(),
            window_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bucket(entries: &[(&str, u64)]) -> DailyBucket {
        entries
            .iter()
            .map(|(d, c)| (d.to_string(), *c))
            .collect()
    }

    // ========== TimeWindow tests ==========

    #[test]
    fn test_window_spans_exactly_n_days() {
        let end = Utc.with_ymd_and_hms(2024, 1, 8, 15, 30, 0).unwrap();
        let window = TimeWindow::last_days_from(7, end);

        assert_eq!(window.end, end);
        assert_eq!(window.end - window.start, Duration::days(7));
    }

    // ========== AccountStats tests ==========

    #[test]
    fn test_combined_is_union_of_dates() {
        let workers = bucket(&[("2024-01-01", 10), ("2024-01-02", 20)]);
        let pages = bucket(&[("2024-01-02", 5), ("2024-01-03", 7)]);

        let stats = AccountStats::from_buckets(workers, pages);

        assert_eq!(stats.combined.len(), 3);
        assert_eq!(stats.combined["2024-01-01"], 10);
        assert_eq!(stats.combined["2024-01-02"], 25);
        assert_eq!(stats.combined["2024-01-03"], 7);
    }

    #[test]
    fn test_combined_no_extra_keys() {
        let workers = bucket(&[("2024-01-01", 1)]);
        let pages = DailyBucket::new();

        let stats = AccountStats::from_buckets(workers, pages);

        assert_eq!(
            stats.combined.keys().collect::<Vec<_>>(),
            vec!["2024-01-01"]
        );
    }

    #[test]
    fn test_combined_empty_buckets() {
        let stats = AccountStats::from_buckets(DailyBucket::new(), DailyBucket::new());
        assert!(stats.combined.is_empty());
        assert_eq!(stats.window_total(), 0);
    }

    #[test]
    fn test_window_total_sums_all_dates() {
        let workers = bucket(&[("2024-01-01", 10), ("2024-01-02", 20)]);
        let pages = bucket(&[("2024-01-01", 5)]);

        let stats = AccountStats::from_buckets(workers, pages);

        assert_eq!(stats.window_total(), 35);
    }
}
