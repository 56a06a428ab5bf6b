//! Runtime configuration for the symptom selector.
//!
//! Resolved once at startup and passed into services, so request handlers
//! never read process environment variables.

use std::net::SocketAddr;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Symptom Selector";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prediction API base URL when `SYMPTOM_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Local UI bind address when `SYMPTOM_UI_ADDR` is unset.
pub const DEFAULT_UI_ADDR: &str = "127.0.0.1:3000";

const ENV_API_URL: &str = "SYMPTOM_API_URL";
const ENV_UI_ADDR: &str = "SYMPTOM_UI_ADDR";
const ENV_API_TIMEOUT: &str = "SYMPTOM_API_TIMEOUT_SECS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "symptom_selector_lib=info,symptom_selector=info,tower_http=warn"
}

/// Configuration resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the prediction API, without a trailing slash.
    pub api_base_url: String,
    /// Address the local UI server binds to.
    pub listen_addr: SocketAddr,
    /// Per-request timeout. `None` leaves failure detection to the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            listen_addr: default_listen_addr(),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = match lookup(ENV_API_URL) {
            Some(url) if !url.trim().is_empty() => normalize_base_url(&url),
            Some(_) => {
                tracing::warn!("{ENV_API_URL} is blank, using default: {DEFAULT_API_URL}");
                defaults.api_base_url
            }
            None => {
                tracing::info!("{ENV_API_URL} not set, using default: {DEFAULT_API_URL}");
                defaults.api_base_url
            }
        };

        let listen_addr = match lookup(ENV_UI_ADDR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!("Invalid {ENV_UI_ADDR} value {raw:?}: {e}");
                defaults.listen_addr
            }),
            None => defaults.listen_addr,
        };

        let request_timeout = lookup(ENV_API_TIMEOUT).and_then(|raw| {
            match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(e) => {
                    tracing::warn!("Invalid {ENV_API_TIMEOUT} value {raw:?}: {e}");
                    None
                }
            }
        });

        Self {
            api_base_url,
            listen_addr,
            request_timeout,
        }
    }
}

/// Trim whitespace and trailing slashes so endpoint paths can be appended.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.listen_addr.to_string(), DEFAULT_UI_ADDR);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn api_url_trailing_slash_trimmed() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            "SYMPTOM_API_URL",
            " http://predictor.local:9000/ ",
        )]));
        assert_eq!(config.api_base_url, "http://predictor.local:9000");
    }

    #[test]
    fn blank_api_url_falls_back() {
        let config = AppConfig::from_lookup(lookup_from(&[("SYMPTOM_API_URL", "   ")]));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn listen_addr_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[("SYMPTOM_UI_ADDR", "0.0.0.0:8080")]));
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn invalid_listen_addr_falls_back() {
        let config = AppConfig::from_lookup(lookup_from(&[("SYMPTOM_UI_ADDR", "not-an-addr")]));
        assert_eq!(config.listen_addr.to_string(), DEFAULT_UI_ADDR);
    }

    #[test]
    fn timeout_parsed_and_zero_disables() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("SYMPTOM_API_TIMEOUT_SECS", "30")]));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));

        let config = AppConfig::from_lookup(lookup_from(&[("SYMPTOM_API_TIMEOUT_SECS", "0")]));
        assert!(config.request_timeout.is_none());

        let config =
            AppConfig::from_lookup(lookup_from(&[("SYMPTOM_API_TIMEOUT_SECS", "soon")]));
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
