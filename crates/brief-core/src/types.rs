use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trailing time interval to search for news.
///
/// Window `index` covers `[today - 30*(index+1) days, today - 30*index days)`.
/// The 30-day month approximation is deliberate and not calendar-accurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Months-ago ordinal, 0 = most recent
    pub index: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One search hit for a window, in provider relevance order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub url: Option<String>,
    pub published_date: Option<String>,
}

/// Successfully downloaded and parsed article content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub title: String,
    pub body: String,
}

/// The single article retained for a window, ready for digest rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowResult {
    pub window: TimeWindow,
    /// Publish date exactly as the search provider reported it
    pub published_date: String,
    pub title: String,
    /// Article body, newline-stripped and truncated
    pub snippet: String,
}

/// Financial metrics tracked for the trend narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancialMetric {
    TotalRevenue,
    GrossProfit,
    NetIncome,
    DilutedEps,
}

impl FinancialMetric {
    pub const ALL: [FinancialMetric; 4] = [
        FinancialMetric::TotalRevenue,
        FinancialMetric::GrossProfit,
        FinancialMetric::NetIncome,
        FinancialMetric::DilutedEps,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FinancialMetric::TotalRevenue => "Total Revenue",
            FinancialMetric::GrossProfit => "Gross Profit",
            FinancialMetric::NetIncome => "Net Income",
            FinancialMetric::DilutedEps => "Diluted EPS",
        }
    }
}

/// Reporting cadence of a financial series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportPeriod {
    Yearly,
    Quarterly,
}

impl ReportPeriod {
    /// Noun used in the rendered narrative ("years" / "quarters")
    pub fn noun(&self) -> &'static str {
        match self {
            ReportPeriod::Yearly => "year",
            ReportPeriod::Quarterly => "quarter",
        }
    }
}

/// One reported value of a metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FinancialPoint {
    pub as_of: NaiveDate,
    pub value: f64,
}

/// Time-ordered value series for one metric at one cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSeries {
    pub metric: FinancialMetric,
    pub period: ReportPeriod,
    /// Ascending by `as_of`
    pub points: Vec<FinancialPoint>,
}

/// Joined output of the three independent sources, handed to the summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateBrief {
    pub symbol: String,
    pub investor_summary: String,
    pub financial_summary: String,
    pub news_digest: String,
}

impl AggregateBrief {
    /// Render the user message for the completion call.
    pub fn to_prompt(&self) -> String {
        format!(
            "Shareholder Data:\n{}\n\nFinancial Trends:\n{}\n\nNews Articles:\n{}\n",
            self.investor_summary, self.financial_summary, self.news_digest
        )
    }
}
