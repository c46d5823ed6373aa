use std::borrow::Cow;
use std::time::Duration;

use crate::transport::backoff::BackoffConfig;

/// Number of times a failed call is retried before its error is surfaced.
pub const DEFAULT_NUM_API_RETRIES: u32 = 3;

pub const DEFAULT_USER_AGENT: &str = concat!("bq-service/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Explicit client configuration. Nothing here is read from files or the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub max_retries: u32,
    pub backoff: BackoffConfig,
    pub user_agent: Cow<'static, str>,
    pub base_url: Cow<'static, str>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_NUM_API_RETRIES,
            backoff: BackoffConfig::default(),
            user_agent: Cow::Borrowed(DEFAULT_USER_AGENT),
            base_url: Cow::Borrowed(DEFAULT_BASE_URL),
        }
    }
}

impl ClientConfig {
    pub fn max_retries(&mut self, max_retries: u32) -> &mut Self {
        self.max_retries = max_retries;
        self
    }

    pub fn delays(&mut self, base_delay: Duration, max_delay: Duration) -> &mut Self {
        self.backoff = BackoffConfig::new(base_delay, max_delay);
        self
    }

    pub fn user_agent(&mut self, user_agent: impl Into<Cow<'static, str>>) -> &mut Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&mut self, base_url: impl Into<Cow<'static, str>>) -> &mut Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff.base_delay(), Duration::from_millis(100));
        assert_eq!(config.backoff.max_delay(), Duration::from_secs(10));
        assert!(config.user_agent.starts_with("bq-service/"));
    }

    #[test]
    fn test_setters() {
        let mut config = ClientConfig::default();
        config
            .max_retries(5)
            .delays(Duration::from_millis(10), Duration::from_secs(1))
            .user_agent("custom-agent");

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.backoff.base_delay(), Duration::from_millis(10));
        assert_eq!(config.user_agent, "custom-agent");
    }
}
