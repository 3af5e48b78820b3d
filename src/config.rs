use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use url::Url;

/// Base URL of the OAuth service when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1323";

/// Lookup timeout in milliseconds when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 100;

/// Connection settings for the OAuth token service.
///
/// Built once at start-up and shared read-only by every authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Base URL the `/oauth/accesstoken/{userid}` path is appended to
    pub base_url: Url,
    /// Hard deadline for a single lookup
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            // Constant absolute http URL; parsing it cannot fail.
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl OAuthConfig {
    /// Build a validated config from raw values (CLI flags, env vars).
    pub fn parse(base_url: &str, timeout_ms: u64) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_string()))?;

        let config = Self {
            base_url,
            timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants every constructor path must uphold.
    ///
    /// Configs assembled through the builders or deserialized from a file
    /// are only checked here, so clients call this before using one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.base_url.scheme(), "http" | "https") || self.base_url.cannot_be_a_base()
        {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.to_string()));
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the lookup timeout. Sub-millisecond durations truncate to zero
    /// and fail [`validate`](Self::validate).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is not an absolute http(s) URL
    InvalidBaseUrl(String),
    /// Timeout must be at least one millisecond
    InvalidTimeout,
    /// The underlying HTTP client could not be built
    HttpClient(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(url) => write!(f, "Invalid OAuth base URL: {}", url),
            Self::InvalidTimeout => write!(f, "OAuth timeout must be greater than zero"),
            Self::HttpClient(msg) => write!(f, "Failed to create OAuth HTTP client: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OAuthConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:1323/");
        assert_eq!(config.timeout(), Duration::from_millis(100));
    }

    #[test]
    fn test_parse_valid() {
        let config = OAuthConfig::parse("https://oauth.internal:8443/api", 250).unwrap();
        assert_eq!(config.base_url.host_str(), Some("oauth.internal"));
        assert_eq!(config.timeout_ms, 250);
    }

    #[test]
    fn test_parse_rejects_bad_urls() {
        assert!(matches!(
            OAuthConfig::parse("not a url", 100),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            OAuthConfig::parse("ftp://oauth.internal", 100),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            OAuthConfig::parse("mailto:oauth@example.com", 100),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_parse_rejects_zero_timeout() {
        assert_eq!(
            OAuthConfig::parse(DEFAULT_BASE_URL, 0),
            Err(ConfigError::InvalidTimeout)
        );
    }

    #[test]
    fn test_builders() {
        let config = OAuthConfig::default()
            .with_base_url(Url::parse("http://127.0.0.1:9000").unwrap())
            .with_timeout(Duration::from_millis(50));
        assert_eq!(config.base_url.port(), Some(9000));
        assert_eq!(config.timeout_ms, 50);
    }

    #[test]
    fn test_with_timeout_sub_millisecond_fails_validation() {
        let config = OAuthConfig::default().with_timeout(Duration::from_micros(500));
        assert_eq!(config.timeout_ms, 0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeout));
    }

    #[test]
    fn test_with_timeout_saturates() {
        let config = OAuthConfig::default().with_timeout(Duration::MAX);
        assert_eq!(config.timeout_ms, u64::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_catches_deserialized_config() {
        let config: OAuthConfig =
            serde_json::from_str(r#"{"base_url": "mailto:x@y", "timeout_ms": 0}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl(_))
        ));

        let config: OAuthConfig =
            serde_json::from_str(r#"{"base_url": "http://oauth:1323", "timeout_ms": 0}"#).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeout));
    }

    #[test]
    fn test_deserialize_defaults_timeout() {
        let config: OAuthConfig =
            serde_json::from_str(r#"{"base_url": "http://oauth:1323"}"#).unwrap();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
