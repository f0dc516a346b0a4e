//! Segment connection configuration
//!
//! Plain, pre-resolved values: the host renders templates and resolves secrets
//! before anything here is built.

use courier_client::SegmentClient;
use reqwest::Client;
use std::time::Duration;

use crate::error::{Result, TaskError};
use crate::poll::PollConfig;

/// Connection and polling settings for the Segment tasks
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// Segment API base URL (e.g., "https://api.segmentapis.com")
    pub base_url: String,

    /// Segment API token
    pub token: String,

    /// How to wait for a sync to finish
    pub poll: PollConfig,
}

impl SegmentConfig {
    /// Creates a configuration against the public API with default polling
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: SegmentClient::DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            poll: PollConfig::default(),
        }
    }

    /// Overrides the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(TaskError::InvalidConfig("token cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(TaskError::InvalidConfig(
                "base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.poll.interval.is_zero() {
            return Err(TaskError::InvalidConfig(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builds a Segment client over `http`
    pub fn client(&self, http: Client) -> SegmentClient {
        SegmentClient::with_client(self.base_url.clone(), self.token.clone(), http)
    }
}

/// Parses a duration such as `10ms`, `5s`, `2m`, `1h`, or a bare number of seconds
pub fn parse_duration(input: &str) -> std::result::Result<Duration, String> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration {:?}: expected a number", input))?;

    let seconds_per_unit = match unit.trim() {
        "ms" => return Ok(Duration::from_millis(value)),
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        other => {
            return Err(format!(
                "invalid duration {:?}: unknown unit {:?} (use ms, s, m or h)",
                input, other
            ));
        }
    };

    value
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("invalid duration {:?}: too large", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SegmentConfig::new("token");
        assert_eq!(config.base_url, "https://api.segmentapis.com");
        assert_eq!(config.poll.interval, Duration::from_secs(5));
        assert_eq!(config.poll.max_wait, Duration::from_secs(3600));
        assert!(!config.poll.fail_on_failure);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SegmentConfig::new("token");

        // Empty token should fail
        config.token = "  ".to_string();
        assert!(config.validate().is_err());

        config.token = "token".to_string();

        // Invalid URL should fail
        config.base_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "http://localhost:28181".to_string();
        assert!(config.validate().is_ok());

        // Zero interval should fail
        config.poll.interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_client_uses_base_url() {
        let config = SegmentConfig::new("token").with_base_url("http://localhost:28181/");
        let client = config.client(Client::new());
        assert_eq!(client.base_url(), "http://localhost:28181");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10ms"), Ok(Duration::from_millis(10)));
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("30"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration(" 1h "), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("-5s").is_err());
    }
}
