//! Cloudflare GraphQL metrics client
//!
//! Fetches per-day Workers and Pages-function invocation counts for one
//! account per query. Transient upstream failures are retried with a linear
//! backoff; once retries are exhausted the error surfaces as `Upstream` and
//! the whole run aborts.

use crate::config::AccountCredential;
use crate::types::{AccountStats, CfStatsError, DailyBucket, Result, TimeWindow};
use chrono::SecondsFormat;
use serde::Deserialize;
use std::time::Duration;

/// Cloudflare analytics GraphQL endpoint
const GRAPHQL_ENDPOINT: &str = "https://api.cloudflare.com/client/v4/graphql";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Retry attempts per account
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base backoff in seconds; attempt N sleeps N * this
const DEFAULT_RETRY_DELAY_SECS: u64 = 3;

/// Both invocation datasets for one account, grouped by day, ascending
const INVOCATIONS_QUERY: &str = r#"
query ($accountTag: string!, $start: DateTime!, $end: DateTime!) {
  viewer {
    accounts(filter: { accountTag: $accountTag }) {
      workers: workersInvocationsAdaptive(
        limit: 10000,
        filter: {
          datetime_geq: $start,
          datetime_leq: $end
        },
        orderBy: [datetime_ASC]
      ) {
        dimensions {
          date: datetime
        }
        sum {
          requests
        }
      }
      pages: pagesFunctionsInvocationsAdaptive(
        limit: 10000,
        filter: {
          datetime_geq: $start,
          datetime_leq: $end
        },
        orderBy: [datetime_ASC]
      ) {
        dimensions {
          date: datetime
        }
        sum {
          requests
        }
      }
    }
  }
}
"#;

/// GraphQL response envelope (minimal fields)
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResponseData {
    pub viewer: Option<Viewer>,
}

#[derive(Debug, Deserialize)]
pub struct Viewer {
    #[serde(default)]
    pub accounts: Vec<AccountResult>,
}

#[derive(Debug, Deserialize)]
pub struct AccountResult {
    #[serde(default)]
    pub workers: Vec<InvocationRecord>,
    #[serde(default)]
    pub pages: Vec<InvocationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct InvocationRecord {
    pub dimensions: Dimensions,
    pub sum: SumFields,
}

#[derive(Debug, Deserialize)]
pub struct Dimensions {
    /// ISO-8601 timestamp; only the date portion is used
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct SumFields {
    /// Null when the upstream has no count for the bucket
    pub requests: Option<u64>,
}

/// Transport seam: one authenticated query in, one parsed envelope out.
/// The string error covers transport failures and non-success statuses.
pub trait MetricsTransport {
    fn execute(
        &self,
        token: &str,
        body: &serde_json::Value,
    ) -> std::result::Result<GraphqlResponse, String>;
}

/// Production transport over a blocking reqwest client
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CfStatsError::Http(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }
}

impl MetricsTransport for HttpTransport {
    fn execute(
        &self,
        token: &str,
        body: &serde_json::Value,
    ) -> std::result::Result<GraphqlResponse, String> {
        let response = self
            .client
            .post(GRAPHQL_ENDPOINT)
            .bearer_auth(token)
            .json(body)
            .send()
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(format!("request failed ({}): {}", status, text));
        }

        response
            .json()
            .map_err(|e| format!("JSON parse error: {}", e))
    }
}

/// Metrics client with bounded retry
pub struct MetricsClient<T: MetricsTransport> {
    transport: T,
    max_retries: u32,
    retry_delay_secs: u64,
}

impl MetricsClient<HttpTransport> {
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: MetricsTransport> MetricsClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
        }
    }

    #[cfg(test)]
    fn with_retry_policy(transport: T, max_retries: u32, retry_delay_secs: u64) -> Self {
        Self {
            transport,
            max_retries,
            retry_delay_secs,
        }
    }

    /// Fetch one account's daily Workers/Pages counts for the window.
    /// Retries up to `max_retries` times, sleeping 3s, 6s, ... between
    /// attempts, then gives up with the last attempt's error.
    pub fn fetch_account_stats(
        &self,
        credential: &AccountCredential,
        window: &TimeWindow,
    ) -> Result<AccountStats> {
        let body = build_query_body(&credential.account_id, window);
        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            match self.try_fetch(&credential.token, &body) {
                Ok(stats) => return Ok(stats),
                Err(e) => {
                    eprintln!(
                        "[cfstats] Warning: attempt {}/{} for account {} failed: {}",
                        attempt, self.max_retries, credential.display_name, e
                    );
                    last_error = e;
                    if attempt < self.max_retries {
                        std::thread::sleep(Duration::from_secs(
                            self.retry_delay_secs * u64::from(attempt),
                        ));
                    }
                }
            }
        }

        Err(CfStatsError::Upstream {
            account: credential.display_name.clone(),
            message: last_error,
        })
    }

    /// One attempt: query, validate the envelope, fold both datasets
    fn try_fetch(
        &self,
        token: &str,
        body: &serde_json::Value,
    ) -> std::result::Result<AccountStats, String> {
        let response = self.transport.execute(token, body)?;

        if !response.errors.is_empty() {
            let messages: Vec<&str> =
                response.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(format!("provider errors: {}", messages.join("; ")));
        }

        let account = response
            .data
            .and_then(|d| d.viewer)
            .and_then(|v| v.accounts.into_iter().next())
            .ok_or_else(|| "account missing from response".to_string())?;

        let workers = fold_daily(&account.workers);
        let pages = fold_daily(&account.pages);
        Ok(AccountStats::from_buckets(workers, pages))
    }
}

/// Query body with per-account variables; timestamps are RFC3339 UTC
fn build_query_body(account_id: &str, window: &TimeWindow) -> serde_json::Value {
    serde_json::json!({
        "query": INVOCATIONS_QUERY,
        "variables": {
            "accountTag": account_id,
            "start": window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            "end": window.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    })
}

/// Sum records into per-date counts. The date is the first 10 characters of
/// the record timestamp; multiple records on one date accumulate.
fn fold_daily(records: &[InvocationRecord]) -> DailyBucket {
    let mut bucket = DailyBucket::new();
    for record in records {
        let stamp = &record.dimensions.date;
        let date = stamp.get(..10).unwrap_or(stamp);
        let count = record.sum.requests.unwrap_or(0);
        *bucket.entry(date.to_string()).or_insert(0) += count;
    }
    bucket
}
