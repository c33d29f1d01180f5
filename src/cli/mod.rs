//! CLI entry point
//!
//! Every option can come from a flag or from the environment variable the
//! cron deployments already set (CF_ACCOUNT_IDS, CF_API_TOKENS, ...).

use clap::Parser;

use crate::config::{self, Config, TelegramTarget};
use crate::services::metrics::MetricsTransport;
use crate::services::{report, Aggregator, Dispatcher, MetricsClient, Notifier, TelegramNotifier};
use crate::types::{AggregateReport, Result, TimeWindow};

/// Daily Cloudflare Workers/Pages invocation reports across accounts
#[derive(Parser)]
#[command(name = "cfstats")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Comma-separated Cloudflare account ids
    #[arg(long, env = "CF_ACCOUNT_IDS")]
    account_ids: String,

    /// Comma-separated API tokens, paired 1:1 with account ids
    #[arg(long, env = "CF_API_TOKENS", hide_env_values = true)]
    api_tokens: String,

    /// Comma-separated display names, paired 1:1 with account ids
    #[arg(long, env = "CF_ACCOUNT_NAMES")]
    account_names: Option<String>,

    /// Window length in days (current partial day included)
    #[arg(long, env = "DAYS", default_value_t = 7)]
    days: u32,

    /// Send one Telegram message per account plus a summary message
    #[arg(long, env = "SPLIT_SEND")]
    split_send: bool,

    /// Telegram bot token; delivery is skipped when unset
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_bot_token: Option<String>,

    /// Telegram chat id; delivery is skipped when unset
    #[arg(long, env = "TELEGRAM_CHAT_ID", allow_hyphen_values = true)]
    telegram_chat_id: Option<String>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = self.into_config()?;
        let client = MetricsClient::new()?;
        let report = collect_report(&config, &client)?;

        // The report always goes to stdout, delivered or not
        println!("{}", report::format_full_report(&report));

        let notifier = match &config.telegram {
            Some(target) => Some(TelegramNotifier::new(target.clone())?),
            None => None,
        };
        Dispatcher::dispatch(
            &report,
            config.split_send,
            notifier.as_ref().map(|n| n as &dyn Notifier),
        )?;
        Ok(())
    }

    /// Validate option pairing before any network activity
    fn into_config(self) -> Result<Config> {
        let telegram = match (self.telegram_bot_token, self.telegram_chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramTarget { bot_token, chat_id }),
            (None, None) => None,
            _ => {
                eprintln!(
                    "[cfstats] Warning: Telegram needs both a bot token and a chat id; delivery disabled"
                );
                None
            }
        };

        Config::build(
            config::parse_list(&self.account_ids),
            config::parse_list(&self.api_tokens),
            self.account_names.as_deref().map(config::parse_list),
            self.days,
            self.split_send,
            telegram,
        )
    }
}

/// Fetch each account in input order and fold into the aggregate report.
/// The first account whose retries are exhausted aborts the run.
fn collect_report<T: MetricsTransport>(
    config: &Config,
    client: &MetricsClient<T>,
) -> Result<AggregateReport> {
    let window = TimeWindow::last_days(config.days);
    let mut report = AggregateReport::new(config.days);
    for credential in &config.accounts {
        let stats = client.fetch_account_stats(credential, &window)?;
        Aggregator::push_account(&mut report, credential.display_name.clone(), stats);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "cfstats",
            "--account-ids",
            "a1,a2",
            "--api-tokens",
            "t1,t2",
        ]
    }

    // ========== parse tests ==========

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::try_parse_from(base_args()).unwrap();
        assert_eq!(cli.days, 7);
        assert!(!cli.split_send);
        assert!(cli.account_names.is_none());
    }

    #[test]
    fn test_cli_parse_days_and_split() {
        let mut args = base_args();
        args.extend(["--days", "14", "--split-send"]);
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.days, 14);
        assert!(cli.split_send);
    }

    // ========== into_config tests ==========

    #[test]
    fn test_into_config_pairs_lists() {
        let mut args = base_args();
        args.extend(["--account-names", "Prod,Staging"]);
        let config = Cli::try_parse_from(args).unwrap().into_config().unwrap();

        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[0].display_name, "Prod");
        assert_eq!(config.accounts[1].account_id, "a2");
    }

    #[test]
    fn test_into_config_mismatch_fails_before_any_fetch() {
        let cli = Cli::try_parse_from([
            "cfstats",
            "--account-ids",
            "a1,a2,a3",
            "--api-tokens",
            "t1,t2",
        ])
        .unwrap();

        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_into_config_telegram_requires_both_parts() {
        let mut args = base_args();
        args.extend(["--telegram-bot-token", "123:abc"]);
        let config = Cli::try_parse_from(args).unwrap().into_config().unwrap();

        assert!(config.telegram.is_none());

        let mut args = base_args();
        args.extend([
            "--telegram-bot-token",
            "123:abc",
            "--telegram-chat-id",
            "-100",
        ]);
        let config = Cli::try_parse_from(args).unwrap().into_config().unwrap();

        assert!(config.telegram.is_some());
    }
}
