//! Report dispatch
//!
//! Decides between one consolidated message and one message per account plus
//! a summary, and hands the text to a `Notifier`. In split mode a failed
//! send is warned and counted but never blocks the remaining sends.

use crate::services::report;
use crate::types::{AggregateReport, CfStatsError, Result};

/// Delivery seam. Fire-and-forget from the dispatcher's perspective: only
/// transport-level success/failure comes back.
pub trait Notifier {
    fn send(&self, text: &str) -> Result<()>;
}

/// Dispatcher for formatted reports
pub struct Dispatcher;

impl Dispatcher {
    /// Send the report through `notifier` according to `split`. A `None`
    /// notifier makes delivery a no-op; the caller prints the report either
    /// way.
    pub fn dispatch(
        report: &AggregateReport,
        split: bool,
        notifier: Option<&dyn Notifier>,
    ) -> Result<()> {
        let Some(notifier) = notifier else {
            return Ok(());
        };

        if !split {
            return notifier.send(&report::format_full_report(report));
        }

        let mut failures = 0u32;
        for (name, stats) in &report.accounts {
            let text = format!(
                "{}\n\n{}",
                report::REPORT_TITLE,
                report::format_account_report(name, stats)
            );
            if let Err(e) = notifier.send(&text) {
                eprintln!("[cfstats] Warning: sending report for {} failed: {}", name, e);
                failures += 1;
            }
        }
        if let Err(e) = notifier.send(&report::format_summary(&report.totals, report.window_days))
        {
            eprintln!("[cfstats] Warning: sending summary failed: {}", e);
            failures += 1;
        }

        if failures > 0 {
            return Err(CfStatsError::Notify(format!(
                "{} of {} messages failed to send",
                failures,
                report.accounts.len() + 1
            )));
        }
        Ok(())
    }
}
