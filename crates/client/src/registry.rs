//! Builds provider clients from configuration.

use std::collections::HashMap;
use std::sync::Arc;

use mixfeed_core::{AppConfig, Provider, ProviderClient, ProviderConfig, ProviderSettings, ProviderSource};

use crate::http::{ClientError, HttpProvider, HttpProviderConfig};
use crate::sample::SampleProvider;

/// Instantiate the client for one configured provider.
pub fn build_client(
    name: &str, settings: &ProviderSettings, user_agent: &str,
) -> Result<Arc<dyn ProviderClient>, ClientError> {
    let client: Arc<dyn ProviderClient> = match &settings.source {
        ProviderSource::Sample => Arc::new(SampleProvider::new(name)),
        ProviderSource::Http { url, timeout_ms } => Arc::new(HttpProvider::new(HttpProviderConfig {
            timeout: std::time::Duration::from_millis(*timeout_ms),
            user_agent: user_agent.to_string(),
            ..HttpProviderConfig::new(url.clone())
        })?),
    };
    Ok(client)
}

/// Cache configuration for every provider in `config`.
pub fn provider_configs(config: &AppConfig) -> Result<HashMap<Provider, ProviderConfig>, ClientError> {
    config
        .providers
        .iter()
        .map(|(name, settings)| {
            let client = build_client(name, settings, &config.user_agent)?;
            tracing::debug!(provider = %name, source = ?settings.source, "provider client configured");
            Ok((
                Provider::new(name),
                ProviderConfig { expiration: settings.expiration(), params: settings.fetch_params(), client },
            ))
        })
        .collect()
}
