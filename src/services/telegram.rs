//! Telegram notifier

use crate::config::TelegramTarget;
use crate::services::dispatch::Notifier;
use crate::types::{CfStatsError, Result};
use std::time::Duration;

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Sends report text to a Telegram chat via the bot sendMessage API
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    target: TelegramTarget,
}

impl TelegramNotifier {
    pub fn new(target: TelegramTarget) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CfStatsError::Http(format!("HTTP client error: {}", e)))?;
        Ok(Self { client, target })
    }

    fn send_message_url(&self) -> String {
        format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.target.bot_token
        )
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&serde_json::json!({
                "chat_id": self.target.chat_id,
                "text": text,
            }))
            .send()
            .map_err(|e| CfStatsError::Notify(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CfStatsError::Notify(format!(
                "sendMessage failed ({}): {}",
                status, body
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url_embeds_bot_token() {
        let notifier = TelegramNotifier::new(TelegramTarget {
            bot_token: "123:abc".into(),
            chat_id: "-100200".into(),
        })
        .unwrap();

        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
