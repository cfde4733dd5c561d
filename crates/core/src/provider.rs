//! The provider client boundary.

use async_trait::async_trait;

use crate::content::ContentItem;
use crate::error::ProviderError;

/// Parameters forwarded to a provider on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    /// Address of the end user the content is fetched on behalf of.
    pub user_ip: String,
    /// Maximum number of items to fetch.
    pub count: usize,
}

/// Fetches the latest content from one external source.
///
/// Implementations must not retry internally: the cache records a failure once
/// per refresh cycle and tries again on the next one.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<ContentItem>, ProviderError>;
}
