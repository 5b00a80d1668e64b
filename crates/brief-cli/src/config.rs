use anyhow::{Context, Result};
use news_analysis::{MalformedDates, NewsQuery};
use std::str::FromStr;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_key: String,
    pub openai_api_key: String,
    pub investors_csv: String,
    pub system_prompt_file: String,
    pub news_query: NewsQuery,
    pub malformed_dates: MalformedDates,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let serpapi_key =
            std::env::var("SERPAPI_KEY").context("SERPAPI_KEY must be set")?;
        let openai_api_key =
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?;

        let investors_csv = std::env::var("INVESTORS_CSV")
            .unwrap_or_else(|_| "data/top_investors.csv".to_string());
        let system_prompt_file = std::env::var("SYSTEM_PROMPT_FILE")
            .unwrap_or_else(|_| "prompts/system_prompt.txt".to_string());

        let defaults = NewsQuery {
            months_back: 2,
            month_step: 1,
            start_offset: 0,
            per_window_limit: 3,
        };
        let news_query = NewsQuery {
            months_back: env_or("NEWS_MONTHS_BACK", defaults.months_back),
            month_step: env_or("NEWS_MONTH_STEP", defaults.month_step),
            start_offset: env_or("NEWS_START_OFFSET", defaults.start_offset),
            per_window_limit: env_or("NEWS_RESULTS_PER_WINDOW", defaults.per_window_limit),
        };

        let malformed_dates = match std::env::var("NEWS_MALFORMED_DATES").as_deref() {
            Ok("exclude") => MalformedDates::Exclude,
            _ => MalformedDates::SortFirst,
        };

        Ok(Self {
            serpapi_key,
            openai_api_key,
            investors_csv,
            system_prompt_file,
            news_query,
            malformed_dates,
        })
    }
}

fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
