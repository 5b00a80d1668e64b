use async_trait::async_trait;
use brief_core::{BriefError, Candidate, SearchProvider, TimeWindow};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

const BASE_URL: &str = "https://serpapi.com/search.json";

/// Default cap on simultaneous in-flight search calls across a whole run.
const DEFAULT_MAX_CONCURRENT: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news_results: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    link: Option<String>,
    date: Option<String>,
}

/// News search client backed by SerpApi's Google News engine.
///
/// All windows of a run share one counting semaphore, so no more than
/// `max_concurrent` search requests are ever in flight at once. The permit
/// is held for the duration of the HTTP call and released on every path.
#[derive(Clone)]
pub struct SerpClient {
    api_key: String,
    client: Client,
    semaphore: Arc<Semaphore>,
}

impl SerpClient {
    pub fn new(api_key: String) -> Self {
        // Free SerpApi plans tolerate little parallelism; override with
        // SERP_MAX_CONCURRENT for paid plans.
        let max_concurrent: usize = std::env::var("SERP_MAX_CONCURRENT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONCURRENT);

        Self::with_concurrency(api_key, max_concurrent)
    }

    pub fn with_concurrency(api_key: String, max_concurrent: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            client,
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    async fn fetch_window(
        &self,
        stock: &str,
        window: &TimeWindow,
        limit: usize,
    ) -> Result<Vec<Candidate>, BriefError> {
        let query = news_query(stock);
        let date_filter = date_range_filter(window);
        let num = limit.to_string();

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| BriefError::ApiError(format!("Semaphore closed: {e}")))?;

        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("engine", "google"),
                ("q", &query),
                ("tbm", "nws"),
                ("api_key", &self.api_key),
                ("num", &num),
                ("tbs", &date_filter),
            ])
            .send()
            .await
            .map_err(|e| BriefError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BriefError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| BriefError::ApiError(e.to_string()))?;

        Ok(search_response
            .news_results
            .into_iter()
            .take(limit)
            .map(|item| Candidate {
                url: item.link,
                published_date: item.date,
            })
            .collect())
    }
}

#[async_trait]
impl SearchProvider for SerpClient {
    async fn search(&self, stock: &str, window: &TimeWindow, limit: usize) -> Vec<Candidate> {
        match self.fetch_window(stock, window, limit).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(
                    "Search failed for {} ({} - {}): {}",
                    stock,
                    window.start,
                    window.end,
                    e
                );
                Vec::new()
            }
        }
    }
}

/// Query string tuned to surface company coverage over earnings boilerplate.
fn news_query(stock: &str) -> String {
    format!("{stock} company news -earnings -report -%")
}

/// Google custom-date-range filter for one window, MM/DD/YYYY bounds.
fn date_range_filter(window: &TimeWindow) -> String {
    format!(
        "cdr:1,cd_min:{},cd_max:{}",
        window.start.format("%m/%d/%Y"),
        window.end.format("%m/%d/%Y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window(start: (i32, u32, u32), end: (i32, u32, u32)) -> TimeWindow {
        TimeWindow {
            index: 0,
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn test_news_query_shape() {
        assert_eq!(
            news_query("TATAMOTORS"),
            "TATAMOTORS company news -earnings -report -%"
        );
    }

    #[test]
    fn test_date_range_filter() {
        let w = window((2024, 3, 4), (2024, 4, 3));
        assert_eq!(date_range_filter(&w), "cdr:1,cd_min:03/04/2024,cd_max:04/03/2024");
    }

    #[test]
    fn test_parse_news_results() {
        let json = r#"{
            "search_metadata": {"status": "Success"},
            "news_results": [
                {"link": "https://example.com/a", "date": "04 Mar 2024", "title": "A"},
                {"link": "https://example.com/b", "date": null},
                {"date": "05 Mar 2024"}
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.news_results.len(), 3);
        assert_eq!(parsed.news_results[0].link.as_deref(), Some("https://example.com/a"));
        assert_eq!(parsed.news_results[1].date, None);
        assert_eq!(parsed.news_results[2].link, None);
    }

    #[test]
    fn test_parse_missing_news_results() {
        let json = r#"{"search_metadata": {"status": "Success"}}"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.news_results.is_empty());
    }
}
