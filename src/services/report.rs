//! Report formatting
//!
//! Pure text rendering: data in, display string out. The labels mirror the
//! messages this tool has always sent, so downstream chat filters keep
//! matching.

use crate::types::{AccountStats, AggregateReport, DailyBucket};

/// Report title line
pub const REPORT_TITLE: &str = "📊 Cloudflare Workers/Pages 每日请求统计（多账号）";

/// Render a non-negative count with thousands separators (1234567 → "1,234,567")
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One account's section: header, one line per date ascending with the
/// Workers count, Pages count and their sum, then the account's window total
pub fn format_account_report(display_name: &str, stats: &AccountStats) -> String {
    let mut lines = vec![format!("🧾 账号 {}:", display_name)];
    for (date, combined) in &stats.combined {
        let workers = stats.workers.get(date).copied().unwrap_or(0);
        let pages = stats.pages.get(date).copied().unwrap_or(0);
        lines.push(format!(
            "  {}: Workers {} | Pages {} | 合计 {}",
            date,
            format_count(workers),
            format_count(pages),
            format_count(*combined)
        ));
    }
    lines.push(format!(
        "  小计：{} 次请求",
        format_count(stats.window_total())
    ));
    lines.join("\n")
}

/// Cross-account summary: one line per date ascending, then the grand total
/// labeled with the window length
pub fn format_summary(totals: &DailyBucket, window_days: u32) -> String {
    let mut lines = vec!["📈 所有账号总计：".to_string()];
    for (date, count) in totals {
        lines.push(format!("  {}: {} 次请求", date, format_count(*count)));
    }
    let grand_total: u64 = totals.values().sum();
    lines.push(String::new());
    lines.push(format!(
        "✅ 合计（{}天）：{} 次请求",
        window_days,
        format_count(grand_total)
    ));
    lines.join("\n")
}

/// Full report: title, each account in fetch order, then the summary
pub fn format_full_report(report: &AggregateReport) -> String {
    let mut sections = vec![REPORT_TITLE.to_string()];
    for (name, stats) in &report.accounts {
        sections.push(format_account_report(name, stats));
    }
    sections.push(format_summary(&report.totals, report.window_days));
    sections.join("\n\n")
}
