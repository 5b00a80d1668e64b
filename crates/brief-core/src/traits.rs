use crate::{Candidate, ExtractedArticle, TimeWindow};
use async_trait::async_trait;

/// Trait for news search providers
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return up to `limit` candidates for `stock` within `window`,
    /// in provider relevance order. Transport and parse failures are
    /// absorbed into an empty list so one window never aborts siblings.
    async fn search(&self, stock: &str, window: &TimeWindow, limit: usize) -> Vec<Candidate>;
}

/// Trait for article content extractors
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Download and parse the page at `url`. Any failure yields `None`.
    async fn extract(&self, url: &str) -> Option<ExtractedArticle>;
}
