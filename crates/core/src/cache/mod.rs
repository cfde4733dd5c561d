//! In-memory cache of provider content.
//!
//! The cache is refreshed in the background on a per-provider schedule and is
//! read through immutable [`State`] snapshots:
//!
//! - One refresh task per provider, never two fetches for the same provider at once
//! - Failed fetches mark the provider failing and keep its last good content
//! - Snapshots share item payloads with the live cache but never observe later writes

pub mod expiring;
pub mod state;

pub use expiring::{ExpiringCache, ProviderConfig};
pub use state::{ProviderEntry, State};

/// Hands out snapshots of cached provider content.
pub trait Cacher: Send + Sync {
    /// A consistent copy of every provider's content and health. Never waits on the network.
    fn state(&self) -> State;
}
