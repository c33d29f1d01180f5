use thiserror::Error;

/// cfstats error types
#[derive(Error, Debug)]
pub enum CfStatsError {
    /// Configuration error (list-length mismatch, bad window length)
    #[error("config error: {0}")]
    Config(String),

    /// Metrics fetch failed after exhausting all retry attempts
    #[error("upstream error for account {account}: {message}")]
    Upstream { account: String, message: String },

    /// Notification delivery failed
    #[error("notify error: {0}")]
    Notify(String),

    /// HTTP client construction failed
    #[error("http error: {0}")]
    Http(String),
}

/// Result type alias for cfstats
pub type Result<T> = std::result::Result<T, CfStatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CfStatsError::Config("2 tokens for 3 accounts".into());
        assert_eq!(err.to_string(), "config error: 2 tokens for 3 accounts");
    }

    #[test]
    fn test_upstream_error_names_account() {
        let err = CfStatsError::Upstream {
            account: "acc-1".into(),
            message: "status 502".into(),
        };
        assert!(err.to_string().contains("acc-1"));
        assert!(err.to_string().contains("status 502"));
    }
}
