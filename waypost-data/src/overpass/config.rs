//! Configuration for [`super::OverpassClient`].

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "waypost-overpass/0.1";

/// Outer per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Server-side query evaluation timeout in seconds (`[timeout:..]`).
const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 60;

/// Endpoint and timeout settings.
///
/// Defaults are the fixed production values; override them only to point
/// at a mirror or a mock server.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use waypost_data::overpass::OverpassClientConfig;
///
/// let config = OverpassClientConfig::new("http://localhost:12345/api/interpreter")
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("my-app/1.0");
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// assert_eq!(config.query_timeout_secs, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OverpassClientConfig {
    /// Interpreter URL receiving the POST.
    pub endpoint: String,
    /// Outer request timeout, also used as the connect timeout.
    ///
    /// Loaded from whole seconds under the `timeout_secs` key.
    #[serde(rename = "timeout_secs", deserialize_with = "duration_from_secs")]
    pub timeout: Duration,
    /// Query evaluation timeout embedded in the QL header.
    pub query_timeout_secs: u32,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OverpassClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OverpassClientConfig {
    /// Create a configuration for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the outer request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the server-side query timeout.
    #[must_use]
    pub fn with_query_timeout_secs(mut self, secs: u32) -> Self {
        self.query_timeout_secs = secs;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Outer request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_production_values() {
        let config = OverpassClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.query_timeout_secs, 60);
    }

    #[rstest]
    fn partial_json_keeps_defaults() {
        let config: OverpassClientConfig =
            serde_json::from_str(r#"{"endpoint": "http://mirror.example/api/interpreter"}"#)
                .expect("config should deserialise");
        assert_eq!(config.endpoint, "http://mirror.example/api/interpreter");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[rstest]
    fn timeout_loads_from_seconds() {
        let config: OverpassClientConfig = serde_json::from_str(r#"{"timeout_secs": 30}"#)
            .expect("config should deserialise");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[rstest]
    #[case(Duration::from_millis(500))]
    #[case(Duration::from_millis(1_500))]
    #[case(Duration::from_secs(90))]
    fn timeout_keeps_sub_second_precision(#[case] timeout: Duration) {
        let config = OverpassClientConfig::default().with_timeout(timeout);
        assert_eq!(config.timeout(), timeout);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = OverpassClientConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_query_timeout_secs(25)
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.endpoint, "http://example.com");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.query_timeout_secs, 25);
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
