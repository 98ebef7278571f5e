//! Service configuration

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_SAFER_BASE_URL: &str = "https://safer.fmcsa.dot.gov/query.asp";
pub const DEFAULT_TIMEOUT_SECS: u64 = 12;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; CarrierVerify/0.1; +carrier-verification)";
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: SocketAddr,
    pub safer_base_url: String,
    /// Whole-request limit for one SAFER fetch
    pub timeout: Duration,
    pub user_agent: String,
    /// Zero disables the result cache
    pub cache_ttl: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            safer_base_url: DEFAULT_SAFER_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_ttl: Duration::ZERO,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.safer_base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.safer_base_url.clone(),
            source,
        })?;
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert!(config.cache_ttl.is_zero());
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = ServiceConfig {
            safer_base_url: "::nope".to_string(),
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BaseUrl { .. })));

        let config = ServiceConfig {
            timeout: Duration::ZERO,
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));

        let config = ServiceConfig {
            user_agent: "  ".to_string(),
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyUserAgent)));
    }
}
