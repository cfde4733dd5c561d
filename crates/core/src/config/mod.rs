//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MIXFEED_*)
//! 2. TOML config file (if MIXFEED_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Nested keys use `__` in environment variables, e.g.
//! `MIXFEED_PROVIDERS__1__EXPIRATION_MS=60000`.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::provider::FetchParams;
use crate::sequence::{ContentMix, MixEntry};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MIXFEED_*)
/// 2. TOML config file (if MIXFEED_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// TCP address for the HTTP server, in the form `host:port`.
    ///
    /// Set via MIXFEED_ADDR environment variable.
    #[serde(default = "default_addr")]
    pub addr: String,

    /// User-Agent string for outgoing provider requests.
    ///
    /// Set via MIXFEED_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Providers keyed by name.
    #[serde(default = "default_providers")]
    pub providers: BTreeMap<String, ProviderSettings>,

    /// Interleaving ratio and failover topology of the feed.
    #[serde(default = "default_content_mix")]
    pub content_mix: ContentMix,
}

/// How one provider is fetched and refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Refresh interval in milliseconds.
    #[serde(default = "default_expiration_ms")]
    pub expiration_ms: u64,

    /// Number of items fetched and cached.
    #[serde(default = "default_length")]
    pub length: usize,

    /// User IP forwarded to the provider.
    #[serde(default = "default_user_ip")]
    pub user_ip: String,

    #[serde(default)]
    pub source: ProviderSource,
}

/// Where a provider's content comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderSource {
    /// Synthetic content generated in-process.
    #[default]
    Sample,
    /// JSON feed served over HTTP.
    Http {
        url: String,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_user_agent() -> String {
    "mixfeed/0.1".into()
}

fn default_expiration_ms() -> u64 {
    600_000 // 10 minutes
}

fn default_length() -> usize {
    100
}

fn default_user_ip() -> String {
    "184.22.11.68".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_providers() -> BTreeMap<String, ProviderSettings> {
    ["1", "2", "3"]
        .into_iter()
        .map(|name| (name.to_string(), ProviderSettings::default()))
        .collect()
}

/// Five parts provider 1, two parts provider 2, one part provider 3.
fn default_content_mix() -> ContentMix {
    vec![
        MixEntry::new("1", Some("2")),
        MixEntry::new("1", Some("2")),
        MixEntry::new("2", Some("3")),
        MixEntry::new("3", Some("1")),
        MixEntry::new("1", None),
        MixEntry::new("1", Some("2")),
        MixEntry::new("1", Some("2")),
        MixEntry::new("2", Some("3")),
    ]
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            expiration_ms: default_expiration_ms(),
            length: default_length(),
            user_ip: default_user_ip(),
            source: ProviderSource::Sample,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            user_agent: default_user_agent(),
            providers: default_providers(),
            content_mix: default_content_mix(),
        }
    }
}

impl ProviderSettings {
    /// Expiration as Duration for use with tokio.
    pub fn expiration(&self) -> Duration {
        Duration::from_millis(self.expiration_ms)
    }

    pub fn fetch_params(&self) -> FetchParams {
        FetchParams { user_ip: self.user_ip.clone(), count: self.length }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MIXFEED_`
    /// 2. TOML file from `MIXFEED_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MIXFEED_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MIXFEED_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// The listen address, parsed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `addr` is not a `host:port` socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            field: "addr".into(),
            reason: e.to_string(),
        })
    }
}
