use brief_core::{FinancialMetric, FinancialSeries, ReportPeriod};
use yahoo_client::YahooClient;

/// Reports considered "recent" per cadence.
const RECENT_YEARS: usize = 5;
const RECENT_QUARTERS: usize = 4;

/// Turns fetched income-statement series into an LLM-readable trend
/// narrative: a value series plus a first-vs-last direction call per metric.
pub struct FinancialAnalysisEngine {
    client: YahooClient,
}

impl FinancialAnalysisEngine {
    pub fn new(client: YahooClient) -> Self {
        Self { client }
    }

    /// Fetch and summarize yearly + quarterly trends for `script`.
    ///
    /// Failures are absorbed into placeholder sentences so the other brief
    /// sources are never dragged down by a financials outage.
    pub async fn financial_summary(&self, script: &str) -> String {
        let symbol = format!("{}.NS", script.to_uppercase());

        let (yearly, quarterly) = tokio::join!(
            self.client.get_financials(&symbol, ReportPeriod::Yearly),
            self.client.get_financials(&symbol, ReportPeriod::Quarterly),
        );

        let (yearly, quarterly) = match (yearly, quarterly) {
            (Ok(y), Ok(q)) => (y, q),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Financials fetch failed for {}: {}", symbol, e);
                return format!("Failed to fetch financial data for {symbol}: {e}");
            }
        };

        render_summary(&symbol, &yearly, &quarterly)
    }
}

/// Pure rendering over already-fetched series.
pub fn render_summary(
    symbol: &str,
    yearly: &[FinancialSeries],
    quarterly: &[FinancialSeries],
) -> String {
    if yearly.is_empty() && quarterly.is_empty() {
        return format!("No financial data available for {symbol}.");
    }

    let mut output = format!("Financial trend analysis for {symbol}:\n\n");
    output.push_str("Yearly Performance:\n");
    output.push_str(&format_trend(yearly, ReportPeriod::Yearly));
    output.push_str("\nQuarterly Performance:\n");
    output.push_str(&format_trend(quarterly, ReportPeriod::Quarterly));

    output.trim_end().to_string()
}

fn format_trend(series: &[FinancialSeries], period: ReportPeriod) -> String {
    if series.is_empty() {
        return "No data available.\n".to_string();
    }

    let recent = match period {
        ReportPeriod::Yearly => RECENT_YEARS,
        ReportPeriod::Quarterly => RECENT_QUARTERS,
    };

    let mut lines = Vec::new();

    for metric in FinancialMetric::ALL {
        let Some(metric_series) = series.iter().find(|s| s.metric == metric) else {
            continue;
        };

        let points = &metric_series.points;
        if points.is_empty() {
            continue;
        }
        let tail = &points[points.len().saturating_sub(recent)..];

        let formatted: Vec<String> = tail.iter().map(|p| fmt_value(p.value)).collect();

        let summary = if tail.len() >= 2 {
            let first = tail[0].value;
            let last = tail[tail.len() - 1].value;
            let trend = if last > first {
                "increased"
            } else if last < first {
                "decreased"
            } else {
                "remained stable"
            };
            format!("→ Trend: {} from {} to {}", trend, fmt_value(first), fmt_value(last))
        } else {
            "→ Trend: not enough data to determine".to_string()
        };

        lines.push(format!(
            "- {} over the last {} {}s: [{}]\n  {}",
            metric.label(),
            formatted.len(),
            period.noun(),
            formatted.join(", "),
            summary
        ));
    }

    if lines.is_empty() {
        "Key metrics not found in the data.\n".to_string()
    } else {
        lines.join("\n")
    }
}

/// Magnitude-scaled number formatting: 1234567.0 -> "1.23M".
fn fmt_value(val: f64) -> String {
    let abs = val.abs();
    if abs >= 1e12 {
        format!("{:.2}T", val / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", val / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", val / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", val / 1e3)
    } else {
        format!("{val:.2}")
    }
}
