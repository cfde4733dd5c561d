//! Point-in-time view of every provider's cached content and health.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::content::{ContentAddress, ContentItem, Provider};
use crate::sequence::ProviderHealth;

/// Cached content and health of a single provider.
///
/// The item list sits behind an `Arc` so copying an entry into a snapshot
/// never copies payloads; a refresh swaps in a new list instead of editing this one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEntry {
    items: Arc<[Arc<ContentItem>]>,
    failing: bool,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Default for ProviderEntry {
    fn default() -> Self {
        Self { items: Arc::from(Vec::new()), failing: false, refreshed_at: None }
    }
}

impl ProviderEntry {
    pub fn failing(&self) -> bool {
        self.failing
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Replace the content list and clear the fail flag.
    pub(crate) fn record_success(&mut self, items: Arc<[Arc<ContentItem>]>, at: DateTime<Utc>) {
        self.items = items;
        self.failing = false;
        self.refreshed_at = Some(at);
    }

    /// Mark the provider failing. The previous content list stays available.
    pub(crate) fn record_failure(&mut self, at: DateTime<Utc>) {
        self.failing = true;
        self.refreshed_at = Some(at);
    }
}

/// An immutable snapshot of the cache.
///
/// Cloning is cheap and yields an independent value: nothing done to the live
/// cache afterwards is visible through a `State` already handed out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    providers: HashMap<Provider, ProviderEntry>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a healthy provider holding `items`.
    pub fn with_items(mut self, provider: impl Into<Provider>, items: Vec<ContentItem>) -> Self {
        self.entry_mut(provider.into()).record_success(share(items), Utc::now());
        self
    }

    /// Mark `provider` failing, keeping whatever content it already holds.
    pub fn with_failing(mut self, provider: impl Into<Provider>) -> Self {
        self.entry_mut(provider.into()).record_failure(Utc::now());
        self
    }

    /// Whether the last fetch of `provider` failed. Unknown providers are healthy.
    pub fn fails(&self, provider: &Provider) -> bool {
        self.providers.get(provider).is_some_and(ProviderEntry::failing)
    }

    /// The item at `addr`, or `None` if the index is beyond the provider's list.
    pub fn content_item(&self, addr: &ContentAddress) -> Option<Arc<ContentItem>> {
        self.providers
            .get(&addr.provider)
            .and_then(|entry| entry.items.get(addr.index))
            .cloned()
    }

    pub fn item_count(&self, provider: &Provider) -> usize {
        self.providers.get(provider).map_or(0, |entry| entry.items.len())
    }

    pub fn refreshed_at(&self, provider: &Provider) -> Option<DateTime<Utc>> {
        self.providers.get(provider).and_then(ProviderEntry::refreshed_at)
    }

    pub fn entry(&self, provider: &Provider) -> Option<&ProviderEntry> {
        self.providers.get(provider)
    }

    pub(crate) fn entry_mut(&mut self, provider: Provider) -> &mut ProviderEntry {
        self.providers.entry(provider).or_default()
    }
}

/// Wrap freshly fetched items for sharing between the live cache and snapshots.
pub(crate) fn share(items: Vec<ContentItem>) -> Arc<[Arc<ContentItem>]> {
    items.into_iter().map(Arc::new).collect()
}

impl ProviderHealth for State {
    fn fails(&self, provider: &Provider) -> bool {
        State::fails(self, provider)
    }

    fn available(&self, provider: &Provider) -> Option<usize> {
        Some(self.item_count(provider))
    }
}
