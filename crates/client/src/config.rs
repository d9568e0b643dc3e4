//! Client configuration.
//!
//! Explicit fields with environment-variable loading: `SIGAID_AUTHORITY_URL`,
//! `SIGAID_API_KEY`, `SIGAID_LEASE_TTL` (seconds), `SIGAID_AUTO_RENEW`.

use std::time::Duration;

/// The default Authority endpoint.
pub const DEFAULT_AUTHORITY_URL: &str = "https://api.sigaid.com";
/// The default lease TTL in seconds.
pub const DEFAULT_LEASE_TTL_SECS: u32 = 300;

/// Configuration for an Authority client and its sessions.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Authority.
    pub authority_url: String,
    /// API key sent as `X-API-Key`, when set.
    pub api_key: Option<String>,
    /// Lease TTL requested on acquire and renew.
    pub lease_ttl_secs: u32,
    /// Whether sessions start a background renewal task.
    pub auto_renew: bool,
    /// Fraction of the TTL after which renewal fires.
    pub renew_fraction: f64,
    /// Seconds before expiry at which the lease is treated as lost if
    /// renewal has not succeeded.
    pub renew_safety_margin_secs: u64,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            authority_url: DEFAULT_AUTHORITY_URL.to_string(),
            api_key: None,
            lease_ttl_secs: DEFAULT_LEASE_TTL_SECS,
            auto_renew: true,
            renew_fraction: 0.8,
            renew_safety_margin_secs: 5,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Builds a configuration from the environment, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("SIGAID_AUTHORITY_URL") {
            if !url.is_empty() {
                config.authority_url = url;
            }
        }
        if let Ok(key) = std::env::var("SIGAID_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Ok(ttl) = std::env::var("SIGAID_LEASE_TTL") {
            if let Ok(parsed) = ttl.parse::<u32>() {
                config.lease_ttl_secs = parsed;
            }
        }
        if let Ok(auto) = std::env::var("SIGAID_AUTO_RENEW") {
            match auto.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.auto_renew = true,
                "0" | "false" | "no" | "off" => config.auto_renew = false,
                _ => {}
            }
        }
        config
    }

    /// Seconds after acquisition at which renewal fires.
    pub fn renew_after_secs(&self) -> u64 {
        (f64::from(self.lease_ttl_secs) * self.renew_fraction).max(1.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.authority_url, DEFAULT_AUTHORITY_URL);
        assert_eq!(config.lease_ttl_secs, 300);
        assert!(config.auto_renew);
        assert_eq!(config.renew_after_secs(), 240);
    }

    #[test]
    fn renew_point_never_zero() {
        let config = ClientConfig {
            lease_ttl_secs: 1,
            ..ClientConfig::default()
        };
        assert_eq!(config.renew_after_secs(), 1);
    }
}
