//! Web search provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One organic search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title
    pub title: String,
    /// Result URL
    pub link: String,
    /// Snippet of the matching content
    pub snippet: String,
}

/// Trait for the optional web-search capability some stages may invoke
///
/// Treated as opaque: query in, hits out.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a search and return organic results
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
