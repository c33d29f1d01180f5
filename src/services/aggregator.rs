//! Aggregator service for cross-account totals

use crate::types::{AccountStats, AggregateReport, DailyBucket};

/// Aggregator folding per-account combined counts into running totals
pub struct Aggregator;

impl Aggregator {
    /// Append an account's stats to the report in fetch order and fold its
    /// combined counts into the running totals
    pub fn push_account(report: &mut AggregateReport, display_name: String, stats: AccountStats) {
        Self::fold_into(&mut report.totals, &stats);
        report.accounts.push((display_name, stats));
    }

    /// Add one account's combined counts into the running totals, creating
    /// date entries as needed. Dates are already normalized to YYYY-MM-DD
    /// by the metrics client, so date-key identity is the only merge rule.
    pub fn fold_into(totals: &mut DailyBucket, stats: &AccountStats) {
        for (date, count) in &stats.combined {
            *totals.entry(date.clone()).or_insert(0) += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(entries: &[(&str, u64)]) -> AccountStats {
        let workers: DailyBucket = entries
            .iter()
            .map(|(d, c)| (d.to_string(), *c))
            .collect();
        AccountStats::from_buckets(workers, DailyBucket::new())
    }

    #[test]
    fn test_fold_into_empty_totals() {
        let mut totals = DailyBucket::new();
        Aggregator::fold_into(&mut totals, &stats(&[("2024-01-01", 25)]));

        assert_eq!(totals["2024-01-01"], 25);
    }

    #[test]
    fn test_fold_into_accumulates_shared_dates() {
        let mut totals = DailyBucket::new();
        Aggregator::fold_into(&mut totals, &stats(&[("2024-01-01", 25)]));
        Aggregator::fold_into(&mut totals, &stats(&[("2024-01-01", 40)]));

        assert_eq!(totals["2024-01-01"], 65);
        assert_eq!(totals.len(), 1);
    }

    #[test]
    fn test_totals_is_datewise_sum_across_accounts() {
        let mut report = AggregateReport::new(7);
        Aggregator::push_account(
            &mut report,
            "A".into(),
            stats(&[("2024-01-01", 10), ("2024-01-02", 5)]),
        );
        Aggregator::push_account(&mut report, "B".into(), stats(&[("2024-01-02", 20)]));

        assert_eq!(report.totals["2024-01-01"], 10);
        assert_eq!(report.totals["2024-01-02"], 25);
        assert_eq!(report.totals.len(), 2);
    }

    #[test]
    fn test_push_account_folds_totals_and_keeps_fetch_order() {
        let mut report = AggregateReport::new(7);
        Aggregator::push_account(&mut report, "B".into(), stats(&[("2024-01-01", 25)]));
        Aggregator::push_account(&mut report, "A".into(), stats(&[("2024-01-01", 40)]));

        // Fetch order preserved, not sorted by name
        assert_eq!(report.accounts[0].0, "B");
        assert_eq!(report.accounts[1].0, "A");
        assert_eq!(report.totals["2024-01-01"], 65);
    }

    #[test]
    fn test_dates_absent_from_all_accounts_stay_absent() {
        let mut totals = DailyBucket::new();
        Aggregator::fold_into(&mut totals, &stats(&[("2024-01-03", 1)]));

        assert!(!totals.contains_key("2024-01-01"));
        assert_eq!(totals.len(), 1);
    }
}
