use brief_core::{AggregateBrief, BriefError};
use financial_analysis::FinancialAnalysisEngine;
use news_analysis::{NewsAnalysisEngine, NewsQuery};
use shareholder_analysis::ShareholderAnalysisEngine;

/// Fans the three independent sources out concurrently and joins them into
/// one brief.
///
/// Each source absorbs its own modeled failures (transport, parse, missing
/// data) into a placeholder string, so the only errors that cross this
/// boundary are genuine defects such as invalid window parameters; those
/// abort the whole gather rather than producing a partial brief.
pub struct BriefOrchestrator {
    shareholder: ShareholderAnalysisEngine,
    financial: FinancialAnalysisEngine,
    news: NewsAnalysisEngine,
    news_query: NewsQuery,
}

impl BriefOrchestrator {
    pub fn new(
        shareholder: ShareholderAnalysisEngine,
        financial: FinancialAnalysisEngine,
        news: NewsAnalysisEngine,
        news_query: NewsQuery,
    ) -> Self {
        Self {
            shareholder,
            financial,
            news,
            news_query,
        }
    }

    pub async fn gather(&self, stock: &str) -> Result<AggregateBrief, BriefError> {
        let symbol = stock.trim().to_uppercase();
        tracing::info!("Gathering brief sources for {}", symbol);

        let (investor_summary, financial_summary, news_digest) = tokio::join!(
            async { self.shareholder.investor_summary(&symbol) },
            self.financial.financial_summary(&symbol),
            self.news.digest(&symbol, &self.news_query),
        );

        Ok(AggregateBrief {
            news_digest: news_section(news_digest?, &symbol),
            investor_summary,
            financial_summary,
            symbol,
        })
    }
}

/// An empty digest means every window came up dry; say so in the prompt
/// instead of embedding a blank section.
fn news_section(digest: String, symbol: &str) -> String {
    if digest.is_empty() {
        format!("No recent news articles were found for {symbol}.")
    } else {
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_section_placeholder() {
        assert_eq!(
            news_section(String::new(), "TATAMOTORS"),
            "No recent news articles were found for TATAMOTORS."
        );
        assert_eq!(
            news_section("• [01 Jan 2024] Story\n  body...".to_string(), "TATAMOTORS"),
            "• [01 Jan 2024] Story\n  body..."
        );
    }
}
