//! equity-brief: assemble an LLM investment brief for a stock ticker.
//!
//! Reads a ticker from stdin, concurrently gathers shareholder allocations,
//! financial trends, and recent news, then asks a chat-completion endpoint
//! for the synthesized brief.
//!
//! Usage:
//!   SERPAPI_KEY=... OPENAI_API_KEY=... cargo run -p brief-cli

use anyhow::Context;
use article_extractor::ArticleExtractor;
use brief_orchestrator::BriefOrchestrator;
use financial_analysis::FinancialAnalysisEngine;
use llm_client::CompletionClient;
use news_analysis::NewsAnalysisEngine;
use serp_client::SerpClient;
use shareholder_analysis::ShareholderAnalysisEngine;
use std::io::{BufRead, Write};
use std::sync::Arc;
use yahoo_client::YahooClient;

mod config;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brief_cli=info,news_analysis=info,serp_client=warn".into()),
        )
        .init();

    let config = Config::from_env()?;

    let ticker = read_ticker()?;

    let shareholder = ShareholderAnalysisEngine::from_path(&config.investors_csv)?;
    let financial = FinancialAnalysisEngine::new(YahooClient::new());
    let news = NewsAnalysisEngine::new(
        Arc::new(SerpClient::new(config.serpapi_key.clone())),
        Arc::new(ArticleExtractor::new()),
    )
    .with_malformed_dates(config.malformed_dates);

    let orchestrator = BriefOrchestrator::new(shareholder, financial, news, config.news_query);
    let brief = orchestrator.gather(&ticker).await?;

    let system_prompt = std::fs::read_to_string(&config.system_prompt_file)
        .with_context(|| format!("Cannot read system prompt {}", config.system_prompt_file))?;

    let completion = CompletionClient::new(config.openai_api_key.clone())
        .complete(&system_prompt, &brief.to_prompt())
        .await?;

    println!("{completion}");

    Ok(())
}

fn read_ticker() -> anyhow::Result<String> {
    print!("Enter stock symbol (e.g. TATAMOTORS): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let ticker = line.trim().to_uppercase();
    anyhow::ensure!(!ticker.is_empty(), "No ticker provided");
    Ok(ticker)
}
