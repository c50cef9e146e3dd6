//! # SSL Labs Check Configuration
//!
//! Settings for the SSL Labs API and the polling loop. Everything has a
//! default, so a missing configuration file is not an error.
//!
//! ## Example
//!
//! ```yaml
//! api:
//!   url: https://api.ssllabs.com/api/v2/analyze
//!   timeout: 5 # seconds
//! polling:
//!   interval: 60 # seconds
//!   max_attempts: 30
//! ```
//!
//! Any value can be overridden by the `SSLLABS_API_` and `SSLLABS_POLLING_`
//! environment variables.

use figment::{Figment, providers::Serialized};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[cfg(feature = "client")]
mod client;
mod config;

/// Application Configuration
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,

    /// API Configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling Configuration
    #[serde(default)]
    pub polling: PollingConfig,
}

/// API Configuration
///
/// Settings are loaded from the `SSLLABS_API_` environment variables.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Analyze endpoint
    ///
    /// Env: `SSLLABS_API_URL`
    pub url: Url,
    /// Per-request timeout in seconds
    ///
    /// Env: `SSLLABS_API_TIMEOUT`
    pub timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            // Constant URL, parsing cannot fail
            url: Url::parse(crate::SSLLABS_API_URL).expect("default API URL is valid"),
            timeout: 5,
        }
    }
}

impl ApiConfig {
    /// Get the API Configuration
    pub(crate) fn figment(base: &Self) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Serialized::defaults(base))
            .merge(figment::providers::Env::prefixed("SSLLABS_API_"))
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Polling Configuration
///
/// Settings are loaded from the `SSLLABS_POLLING_` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds to wait between two polls
    ///
    /// Env: `SSLLABS_POLLING_INTERVAL`
    pub interval: u64,
    /// Maximum number of polls after the assessment was started (unbounded if unset)
    ///
    /// Env: `SSLLABS_POLLING_MAX_ATTEMPTS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: 60,
            max_attempts: None,
        }
    }
}

impl PollingConfig {
    /// Get the Polling Configuration
    pub(crate) fn figment(base: &Self) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Serialized::defaults(base))
            .merge(figment::providers::Env::prefixed("SSLLABS_POLLING_"))
    }

    /// Interval between two polls
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}
