use brief_core::BriefError;
use serde::Deserialize;
use std::path::Path;

/// One row of the top-investors dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct Holding {
    #[serde(rename = "Script")]
    pub script: String,
    #[serde(rename = "Investor")]
    pub investor: String,
    #[serde(rename = "Amount Invested (in Cr)")]
    pub amount_invested: f64,
}

/// Summarizes how concentrated each tracked investor is in a given stock.
///
/// The dataset is loaded once at construction; every summary is a pure
/// filter + aggregate over the in-memory rows.
pub struct ShareholderAnalysisEngine {
    holdings: Vec<Holding>,
}

impl ShareholderAnalysisEngine {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BriefError> {
        let data = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            BriefError::DatasetError(format!(
                "Cannot read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Self {
            holdings: Self::parse_holdings(&data)?,
        })
    }

    pub fn parse_holdings(csv_data: &str) -> Result<Vec<Holding>, BriefError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());

        let mut holdings = Vec::new();
        for result in reader.deserialize::<Holding>() {
            match result {
                Ok(row) if row.script.is_empty() || row.investor.is_empty() => {
                    tracing::warn!("Skipping holding row with empty script or investor");
                }
                Ok(row) => holdings.push(row),
                Err(e) => {
                    tracing::warn!("Skipping malformed holding row: {}", e);
                }
            }
        }

        Ok(holdings)
    }

    /// Per-investor allocation report for `script`, or the canonical
    /// "No investors found" line when no row matches.
    pub fn investor_summary(&self, script: &str) -> String {
        let script = script.to_uppercase();

        let script_holdings: Vec<&Holding> = self
            .holdings
            .iter()
            .filter(|h| h.script == script)
            .collect();

        if script_holdings.is_empty() {
            return format!("No investors found for {script}.");
        }

        let mut summary = format!("Investors in {script} and their portfolio allocation:\n\n");

        for holding in &script_holdings {
            let total_investment: f64 = self
                .holdings
                .iter()
                .filter(|h| h.investor == holding.investor)
                .map(|h| h.amount_invested)
                .sum();

            let allocation_pct = if total_investment > 0.0 {
                (holding.amount_invested / total_investment * 1000.0).round() / 10.0
            } else {
                0.0
            };

            summary.push_str(&format!(
                "Investor: {}\n\
                 - Total Portfolio Investment: ₹{:.1} Cr\n\
                 - Investment in {}: ₹{:.1} Cr\n\
                 - Allocation to {}: {:.1}%\n\n",
                holding.investor, total_investment, script, holding.amount_invested, script,
                allocation_pct
            ));
        }

        summary.trim_end().to_string()
    }
}
