use async_trait::async_trait;
use brief_core::{ArticleFetcher, ExtractedArticle};
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Default size of the blocking worker pool.
const DEFAULT_MAX_WORKERS: usize = 5;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Downloads and parses article pages on a bounded blocking worker pool.
///
/// Download + HTML parse is blocking work, so each extraction runs inside
/// `spawn_blocking`; the semaphore caps how many blocking tasks exist at
/// once so a burst of windows cannot exhaust the runtime's blocking threads.
/// The coordination task only awaits, it never blocks.
#[derive(Clone)]
pub struct ArticleExtractor {
    workers: Arc<Semaphore>,
    timeout: Duration,
}

impl ArticleExtractor {
    pub fn new() -> Self {
        let max_workers: usize = std::env::var("EXTRACTOR_MAX_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_WORKERS);

        Self::with_workers(max_workers)
    }

    pub fn with_workers(max_workers: usize) -> Self {
        Self {
            workers: Arc::new(Semaphore::new(max_workers.max(1))),
            timeout: Duration::from_secs(20),
        }
    }
}

impl Default for ArticleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleFetcher for ArticleExtractor {
    async fn extract(&self, url: &str) -> Option<ExtractedArticle> {
        let permit = self.workers.clone().acquire_owned().await.ok()?;
        let url_owned = url.to_string();
        let timeout = self.timeout;

        let result = tokio::task::spawn_blocking(move || {
            // Permit lives as long as the blocking task
            let _permit = permit;
            fetch_and_parse(&url_owned, timeout)
        })
        .await;

        match result {
            Ok(Some(article)) => Some(article),
            Ok(None) => {
                tracing::debug!("No extractable content at {}", url);
                None
            }
            Err(e) => {
                tracing::warn!("Extraction task panicked for {}: {}", url, e);
                None
            }
        }
    }
}

fn fetch_and_parse(url: &str, timeout: Duration) -> Option<ExtractedArticle> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .ok()?;

    let body = client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(|e| tracing::debug!("Download failed for {}: {}", url, e))
        .ok()?;

    parse_article(&body)
}

/// Pull (title, body) out of an arbitrary news page.
///
/// Title preference: `og:title` meta, then `<title>`, then the first `<h1>`.
/// Body: paragraphs inside `<article>`, falling back to all paragraphs on
/// pages that don't use the article element. Paywalled or malformed pages
/// usually fail the non-empty checks and yield `None`.
fn parse_article(html: &str) -> Option<ExtractedArticle> {
    let document = Html::parse_document(html);

    let og_title = Selector::parse(r#"meta[property="og:title"]"#).ok()?;
    let title_tag = Selector::parse("title").ok()?;
    let h1 = Selector::parse("h1").ok()?;
    let article_paragraphs = Selector::parse("article p").ok()?;
    let paragraphs = Selector::parse("p").ok()?;

    let title = document
        .select(&og_title)
        .next()
        .and_then(|el| el.value().attr("content").map(str::to_string))
        .or_else(|| {
            document
                .select(&title_tag)
                .next()
                .map(|el| el.text().collect::<String>())
        })
        .or_else(|| {
            document
                .select(&h1)
                .next()
                .map(|el| el.text().collect::<String>())
        })
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())?;

    let mut body = collect_paragraphs(document.select(&article_paragraphs));
    if body.is_empty() {
        body = collect_paragraphs(document.select(&paragraphs));
    }

    if body.is_empty() {
        return None;
    }

    Some(ExtractedArticle { title, body })
}

fn collect_paragraphs<'a>(paragraphs: impl Iterator<Item = scraper::ElementRef<'a>>) -> String {
    paragraphs
        .map(|p| p.text().collect::<String>())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_article_prefers_og_title() {
        let html = r#"<html><head>
            <meta property="og:title" content="Tata Motors expands EV lineup" />
            <title>Some site | Tata Motors</title>
            </head><body>
            <article><p>First paragraph.</p><p>Second paragraph.</p></article>
            </body></html>"#;

        let article = parse_article(html).unwrap();
        assert_eq!(article.title, "Tata Motors expands EV lineup");
        assert_eq!(article.body, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_parse_article_falls_back_to_all_paragraphs() {
        let html = r#"<html><head><title>Quarterly update</title></head>
            <body><div><p>Body text outside an article element.</p></div></body></html>"#;

        let article = parse_article(html).unwrap();
        assert_eq!(article.title, "Quarterly update");
        assert_eq!(article.body, "Body text outside an article element.");
    }

    #[test]
    fn test_parse_article_rejects_empty_body() {
        let html = r#"<html><head><title>Paywalled</title></head><body></body></html>"#;
        assert!(parse_article(html).is_none());
    }

    #[test]
    fn test_parse_article_rejects_missing_title() {
        let html = r#"<html><body><p>Orphan text with no heading.</p></body></html>"#;
        assert!(parse_article(html).is_none());
    }
}
