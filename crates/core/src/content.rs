//! Content domain types.
//!
//! These carry no behavior of their own: the cache owns `ContentItem`s once
//! fetched, the sequencer produces `ContentAddress`es, and the service joins the two.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a content source.
///
/// Cheap to clone; serialized as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Provider(Arc<str>);

impl Provider {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Provider {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Provider {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// A single piece of content served by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub source: String,
    pub summary: String,
    pub link: String,
    pub expiry: DateTime<Utc>,
}

/// A logical pointer into a provider's current content list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentAddress {
    pub provider: Provider,
    pub index: usize,
}

impl ContentAddress {
    pub fn new(provider: impl Into<Provider>, index: usize) -> Self {
        Self { provider: provider.into(), index }
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.index)
    }
}
