//! Content mix sequencing.
//!
//! Turns a content mix and the current provider health into the page of
//! content addresses for `[offset, offset + limit)` of the interleaved feed.
//!
//! ### Algorithm
//!
//! - Walk the mix cyclically, one entry per output position.
//! - A healthy entry resolves to its own provider; a failing one to its fallback,
//!   if it has one and the fallback is healthy.
//! - An entry that resolves to nothing ends the feed at that position.
//! - Each provider numbers its positions 0, 1, 2, ... across the whole walk.
//! - When the health view knows how many items each provider holds, the walk
//!   ends at the first cycle from which nothing could resolve.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::content::{ContentAddress, Provider};
use crate::error::Error;

/// One slot of the content mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixEntry {
    /// Provider that normally fills this slot.
    #[serde(rename = "type")]
    pub provider: Provider,
    /// Provider used instead while `provider` is failing.
    #[serde(default)]
    pub fallback: Option<Provider>,
}

impl MixEntry {
    pub fn new(provider: impl Into<Provider>, fallback: Option<&str>) -> Self {
        Self { provider: provider.into(), fallback: fallback.map(Provider::new) }
    }
}

/// Ordered slots defining both the interleaving ratio and the failover topology.
pub type ContentMix = Vec<MixEntry>;

/// Maximum number of positions a single page may span.
pub const MAX_PAGE_LEN: usize = 100_000;

/// Read-only view of which providers are currently failing.
pub trait ProviderHealth {
    fn fails(&self, provider: &Provider) -> bool;

    /// How many items the view can resolve for `provider`; `None` if unbounded.
    fn available(&self, _provider: &Provider) -> Option<usize> {
        None
    }
}

impl ProviderHealth for HashMap<Provider, bool> {
    fn fails(&self, provider: &Provider) -> bool {
        self.get(provider).copied().unwrap_or(false)
    }
}

/// Orders content addresses for a requested page.
pub trait Sequencer: Send + Sync {
    /// The addresses making up `[offset, offset + limit)` of the feed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `limit` or `offset` is negative, or if
    /// the page would span more than [`MAX_PAGE_LEN`] positions.
    fn sequence(&self, health: &dyn ProviderHealth, limit: i64, offset: i64) -> Result<Vec<ContentAddress>, Error>;
}

/// Validate a page request and convert it to unsigned bounds.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if either value is negative.
pub fn page_bounds(limit: i64, offset: i64) -> Result<(usize, usize), Error> {
    let limit = usize::try_from(limit).map_err(|_| Error::InvalidInput(format!("limit must not be negative: {limit}")))?;
    let offset =
        usize::try_from(offset).map_err(|_| Error::InvalidInput(format!("offset must not be negative: {offset}")))?;
    Ok((limit, offset))
}

/// Sequencer driven by a fixed content mix.
#[derive(Debug, Clone)]
pub struct ConfiguredSequencer {
    mix: ContentMix,
}

impl ConfiguredSequencer {
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the mix has no entries.
    pub fn new(mix: ContentMix) -> Result<Self, Error> {
        if mix.is_empty() {
            return Err(Error::InvalidInput("content mix must not be empty".into()));
        }
        Ok(Self { mix })
    }

    /// Resolve every entry once against `health`.
    ///
    /// Health cannot change during a call, so one pass over the mix fixes the
    /// whole walk: which provider each slot yields and how far each provider's
    /// counter advances per cycle.
    fn plan(&self, health: &dyn ProviderHealth) -> Plan {
        let mut slots = Vec::with_capacity(self.mix.len());
        let mut per_cycle: HashMap<Provider, usize> = HashMap::new();

        for entry in &self.mix {
            let resolved = if !health.fails(&entry.provider) {
                Some(&entry.provider)
            } else {
                entry.fallback.as_ref().filter(|fallback| !health.fails(fallback))
            };
            let Some(provider) = resolved else {
                return Plan { slots, per_cycle, truncated: true };
            };

            let seen = per_cycle.entry(provider.clone()).or_default();
            slots.push(Slot { provider: provider.clone(), seen_before: *seen });
            *seen += 1;
        }

        Plan { slots, per_cycle, truncated: false }
    }
}

impl Sequencer for ConfiguredSequencer {
    fn sequence(&self, health: &dyn ProviderHealth, limit: i64, offset: i64) -> Result<Vec<ContentAddress>, Error> {
        let (limit, offset) = page_bounds(limit, offset)?;
        let plan = self.plan(health);

        // A truncated mix ends inside its first cycle.
        let mut end = offset.saturating_add(limit);
        if plan.truncated {
            end = end.min(plan.slots.len());
        }
        if let Some(horizon) = plan.horizon(health, self.mix.len()) {
            end = end.min(horizon);
        }

        let len = end.saturating_sub(offset);
        if len > MAX_PAGE_LEN {
            return Err(Error::InvalidInput(format!("page of {len} positions exceeds the maximum of {MAX_PAGE_LEN}")));
        }

        Ok((offset..end).map(|position| plan.address(position, self.mix.len())).collect())
    }
}

struct Slot {
    provider: Provider,
    /// Occurrences of `provider` in earlier slots of the same cycle.
    seen_before: usize,
}

struct Plan {
    slots: Vec<Slot>,
    per_cycle: HashMap<Provider, usize>,
    truncated: bool,
}

impl Plan {
    /// Position from which no slot can resolve against `health`, rounded up to
    /// a whole cycle. `None` if some provider's item count is unknown.
    fn horizon(&self, health: &dyn ProviderHealth, cycle_len: usize) -> Option<usize> {
        let mut horizon = 0;
        for (provider, per_cycle) in &self.per_cycle {
            let available = health.available(provider)?;
            if available > 0 {
                let cycles = (available - 1) / per_cycle + 1;
                horizon = horizon.max(cycles.saturating_mul(cycle_len));
            }
        }
        Some(horizon)
    }

    fn address(&self, position: usize, cycle_len: usize) -> ContentAddress {
        let slot = &self.slots[position % cycle_len];
        let per_cycle = self.per_cycle.get(&slot.provider).copied().unwrap_or(0);
        ContentAddress { provider: slot.provider.clone(), index: (position / cycle_len) * per_cycle + slot.seen_before }
    }
}
