//! Synthetic provider that generates placeholder content in-process.
//!
//! Useful for local runs and demos: it never fails, and every fetch yields a
//! fresh batch with new ids so refreshes are observable.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use mixfeed_core::{ContentItem, FetchParams, Provider, ProviderClient, ProviderError};
use sha2::{Digest, Sha256};

/// Generates `count` placeholder items per fetch.
#[derive(Debug)]
pub struct SampleProvider {
    provider: Provider,
    generation: AtomicU64,
}

impl SampleProvider {
    pub fn new(provider: impl Into<Provider>) -> Self {
        Self { provider: provider.into(), generation: AtomicU64::new(0) }
    }

    /// Stable 16-hex-char id for one item of one fetch.
    fn item_id(&self, generation: u64, index: usize) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.provider.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(generation.to_le_bytes());
        hasher.update(b"\n");
        hasher.update(index.to_le_bytes());
        hex::encode(&hasher.finalize()[..8])
    }
}

#[async_trait]
impl ProviderClient for SampleProvider {
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<ContentItem>, ProviderError> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let expiry = Utc::now();

        tracing::debug!(provider = %self.provider, generation, count = params.count, "generating sample content");

        Ok((0..params.count)
            .map(|index| ContentItem {
                id: self.item_id(generation, index),
                title: "title".to_string(),
                source: self.provider.to_string(),
                summary: String::new(),
                link: String::new(),
                expiry,
            })
            .collect())
    }
}
