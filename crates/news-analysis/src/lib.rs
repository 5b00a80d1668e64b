use brief_core::{ArticleFetcher, BriefError, SearchProvider, TimeWindow, WindowResult};
use chrono::{NaiveDate, Utc};
use futures_util::future::join_all;
use std::sync::Arc;

pub mod dates;
pub mod windows;

pub use dates::MalformedDates;
pub use windows::partition;

/// Maximum snippet length kept from an article body, in characters.
const SNIPPET_CHARS: usize = 1500;

/// Windowing and fan-out parameters for one digest run.
#[derive(Debug, Clone, Copy)]
pub struct NewsQuery {
    pub months_back: u32,
    pub month_step: u32,
    pub start_offset: u32,
    /// Candidates requested per window
    pub per_window_limit: usize,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            months_back: 12,
            month_step: 1,
            start_offset: 0,
            per_window_limit: 3,
        }
    }
}

/// Builds the chronological news digest for a stock.
///
/// One resolution task is launched per window and all windows run
/// concurrently; only the search client's own semaphore bounds actual
/// network concurrency. Window results are reassembled in publish-date
/// order, independent of completion order.
pub struct NewsAnalysisEngine {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn ArticleFetcher>,
    malformed_dates: MalformedDates,
}

impl NewsAnalysisEngine {
    pub fn new(search: Arc<dyn SearchProvider>, fetcher: Arc<dyn ArticleFetcher>) -> Self {
        Self {
            search,
            fetcher,
            malformed_dates: MalformedDates::default(),
        }
    }

    pub fn with_malformed_dates(mut self, policy: MalformedDates) -> Self {
        self.malformed_dates = policy;
        self
    }

    /// Produce the bulleted digest for `stock`. An empty string means no
    /// window yielded an article; that is "no news found", not a failure.
    pub async fn digest(&self, stock: &str, query: &NewsQuery) -> Result<String, BriefError> {
        self.digest_at(stock, query, Utc::now().date_naive()).await
    }

    /// Same as [`digest`](Self::digest) with an explicit "today", so window
    /// boundaries are deterministic for callers that need reproducibility.
    pub async fn digest_at(
        &self,
        stock: &str,
        query: &NewsQuery,
        today: NaiveDate,
    ) -> Result<String, BriefError> {
        let windows = windows::partition(
            query.months_back,
            query.month_step,
            query.start_offset,
            today,
        )?;

        tracing::info!(
            "Gathering news for {} across {} windows",
            stock,
            windows.len()
        );

        let tasks = windows
            .iter()
            .map(|window| self.resolve_window(stock, *window, query.per_window_limit));
        let resolved = join_all(tasks).await;

        let mut results: Vec<WindowResult> = resolved.into_iter().flatten().collect();

        if self.malformed_dates == MalformedDates::Exclude {
            results.retain(|r| {
                let ok = dates::try_parse_published(&r.published_date).is_some();
                if !ok {
                    tracing::warn!(
                        "Dropping article with unparseable date {:?} ({})",
                        r.published_date,
                        r.title
                    );
                }
                ok
            });
        }

        // Stable sort: windows sharing a publish date keep task order
        results.sort_by_key(|r| dates::sort_key(&r.published_date));

        Ok(render_digest(&results))
    }

    /// Try a window's candidates in provider order; first successfully
    /// extracted article wins and the rest are abandoned.
    async fn resolve_window(
        &self,
        stock: &str,
        window: TimeWindow,
        limit: usize,
    ) -> Option<WindowResult> {
        let candidates = self.search.search(stock, &window, limit).await;

        for candidate in candidates {
            let (url, published_date) = match (&candidate.url, &candidate.published_date) {
                (Some(url), Some(date)) => (url, date),
                _ => continue,
            };

            if let Some(article) = self.fetcher.extract(url).await {
                return Some(WindowResult {
                    window,
                    published_date: published_date.clone(),
                    title: article.title,
                    snippet: make_snippet(&article.body),
                });
            }
        }

        // Expected for sparse news periods, so a notice rather than an error
        tracing::warn!(
            "No article for {} months ago ({} - {})",
            window.index,
            window.start,
            window.end
        );
        None
    }
}

fn make_snippet(body: &str) -> String {
    body.replace('\n', " ").trim().chars().take(SNIPPET_CHARS).collect()
}

fn render_digest(results: &[WindowResult]) -> String {
    results
        .iter()
        .map(|r| format!("• [{}] {}\n  {}...", r.published_date, r.title, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}
