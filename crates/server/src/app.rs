//! Wiring of configuration into the cache and the read service.

use std::sync::Arc;

use mixfeed_core::{AppConfig, ConfiguredSequencer, ExpiringCache, Service};

/// Long-lived application components.
pub struct App {
    pub cache: Arc<ExpiringCache>,
    pub service: Service,
}

impl App {
    /// Build the cache and service described by `config`. Nothing is fetched yet.
    pub fn bootstrap(config: &AppConfig) -> anyhow::Result<Self> {
        let providers = mixfeed_client::provider_configs(config)?;
        let cache = Arc::new(ExpiringCache::new(providers)?);
        let sequencer = Arc::new(ConfiguredSequencer::new(config.content_mix.clone())?);
        let service = Service::new(cache.clone(), sequencer);

        Ok(Self { cache, service })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixfeed_core::{Cacher, Provider};

    #[tokio::test]
    async fn test_default_config_serves_mixed_page() {
        let app = App::bootstrap(&AppConfig::default()).unwrap();
        app.cache.start().await.unwrap();

        let items = app.service.content_items(8, 0).unwrap();
        let sources: Vec<&str> = items.iter().map(|item| item.source.as_str()).collect();
        assert_eq!(sources, ["1", "1", "2", "3", "1", "1", "1", "2"]);
        assert_eq!(app.cache.state().item_count(&Provider::new("3")), 100);

        app.cache.stop().await;
    }

    #[test]
    fn test_empty_mix_rejected() {
        let config = AppConfig { content_mix: Vec::new(), ..Default::default() };
        assert!(App::bootstrap(&config).is_err());
    }
}
