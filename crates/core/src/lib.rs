//! Core types and shared functionality for mixfeed.
//!
//! This crate provides:
//! - Content domain types and the provider client boundary
//! - Expiring in-memory cache with per-provider refresh schedules
//! - Content mix sequencer and the aggregation service
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod provider;
pub mod sequence;
pub mod service;

pub use cache::{Cacher, ExpiringCache, ProviderConfig, State};
pub use config::{AppConfig, ConfigError, ProviderSettings, ProviderSource};
pub use content::{ContentAddress, ContentItem, Provider};
pub use error::{Error, ProviderError};
pub use provider::{FetchParams, ProviderClient};
pub use sequence::{ConfiguredSequencer, ContentMix, MixEntry, ProviderHealth, Sequencer};
pub use service::Service;
