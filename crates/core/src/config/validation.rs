//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, ProviderSource};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no providers or no mix entries are
    /// configured, and `ConfigError::Invalid` if:
    /// - `addr` is not a socket address or `user_agent` is empty
    /// - a provider's `expiration_ms` is below 100ms or its `length` is 0
    /// - an HTTP source has a non-http(s) URL or a timeout outside 100ms..=5min
    /// - a mix entry names a provider that is not configured
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.providers.is_empty() {
            return Err(ConfigError::Missing {
                field: "providers".into(),
                hint: "configure at least one [providers.<name>] table".into(),
            });
        }

        for (name, settings) in &self.providers {
            if settings.expiration_ms < 100 {
                return Err(ConfigError::Invalid {
                    field: format!("providers.{name}.expiration_ms"),
                    reason: "must be at least 100ms".into(),
                });
            }
            if settings.length == 0 {
                return Err(ConfigError::Invalid {
                    field: format!("providers.{name}.length"),
                    reason: "must be greater than 0".into(),
                });
            }
            if let ProviderSource::Http { url, timeout_ms } = &settings.source {
                validate_http_source(name, url, *timeout_ms)?;
            }
        }

        if self.content_mix.is_empty() {
            return Err(ConfigError::Missing {
                field: "content_mix".into(),
                hint: "configure at least one content_mix entry".into(),
            });
        }

        for (idx, entry) in self.content_mix.iter().enumerate() {
            let referenced = std::iter::once(&entry.provider).chain(entry.fallback.as_ref());
            for provider in referenced {
                if !self.providers.contains_key(provider.as_str()) {
                    return Err(ConfigError::Invalid {
                        field: format!("content_mix[{idx}]"),
                        reason: format!("unknown provider '{provider}'"),
                    });
                }
            }
        }

        for name in self.providers.keys() {
            let mixed = self
                .content_mix
                .iter()
                .any(|entry| entry.provider.as_str() == name || entry.fallback.as_ref().is_some_and(|f| f.as_str() == name));
            if !mixed {
                tracing::warn!(provider = %name, "provider is configured but never used by the content mix");
            }
        }

        Ok(())
    }
}

fn validate_http_source(name: &str, raw_url: &str, timeout_ms: u64) -> Result<(), ConfigError> {
    let url = url::Url::parse(raw_url).map_err(|e| ConfigError::Invalid {
        field: format!("providers.{name}.source.url"),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            field: format!("providers.{name}.source.url"),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if timeout_ms < 100 {
        return Err(ConfigError::Invalid {
            field: format!("providers.{name}.source.timeout_ms"),
            reason: "must be at least 100ms".into(),
        });
    }
    if timeout_ms > 300_000 {
        return Err(ConfigError::Invalid {
            field: format!("providers.{name}.source.timeout_ms"),
            reason: "must not exceed 5 minutes (300000ms)".into(),
        });
    }

    Ok(())
}
