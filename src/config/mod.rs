//! Run configuration
//!
//! Built once from CLI flags / environment before any network activity and
//! passed explicitly into the services that need it. Account ids, API tokens
//! and display names arrive as positionally paired lists; pairing is
//! validated here so the rest of the code only ever sees complete
//! credentials.

use crate::types::{CfStatsError, Result};

/// One account's identity and bearer credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCredential {
    pub account_id: String,
    pub token: String,
    /// Shown in reports; defaults to the account id
    pub display_name: String,
}

/// Telegram delivery target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramTarget {
    pub bot_token: String,
    pub chat_id: String,
}

/// Validated run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub accounts: Vec<AccountCredential>,
    /// Window length in days
    pub days: u32,
    /// One message per account plus a summary, instead of one consolidated message
    pub split_send: bool,
    /// None disables delivery; the report still goes to stdout
    pub telegram: Option<TelegramTarget>,
}

impl Config {
    /// Pair up the positional id/token/name lists, failing eagerly on any
    /// length mismatch or an empty window.
    pub fn build(
        account_ids: Vec<String>,
        tokens: Vec<String>,
        display_names: Option<Vec<String>>,
        days: u32,
        split_send: bool,
        telegram: Option<TelegramTarget>,
    ) -> Result<Self> {
        if account_ids.is_empty() {
            return Err(CfStatsError::Config("no account ids configured".into()));
        }
        if account_ids.len() != tokens.len() {
            return Err(CfStatsError::Config(format!(
                "{} account ids but {} api tokens; the lists must pair 1:1",
                account_ids.len(),
                tokens.len()
            )));
        }
        if let Some(names) = &display_names {
            if names.len() != account_ids.len() {
                return Err(CfStatsError::Config(format!(
                    "{} display names for {} accounts; the lists must pair 1:1",
                    names.len(),
                    account_ids.len()
                )));
            }
        }
        if days == 0 {
            return Err(CfStatsError::Config(
                "window length must be at least 1 day".into(),
            ));
        }

        let accounts = account_ids
            .into_iter()
            .zip(tokens)
            .enumerate()
            .map(|(i, (account_id, token))| {
                let display_name = display_names
                    .as_ref()
                    .map(|names| names[i].clone())
                    .unwrap_or_else(|| account_id.clone());
                AccountCredential {
                    account_id,
                    token,
                    display_name,
                }
            })
            .collect();

        Ok(Self {
            accounts,
            days,
            split_send,
            telegram,
        })
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
