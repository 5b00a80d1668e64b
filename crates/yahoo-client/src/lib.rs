use brief_core::{BriefError, FinancialMetric, FinancialPoint, FinancialSeries, ReportPeriod};
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration as StdDuration;

const BASE_URL: &str = "https://query1.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";

/// Years of history requested; enough for 5 yearly and 4 quarterly reports.
const LOOKBACK_YEARS: i64 = 6;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; EquityBrief/0.1)";

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesBody,
}

#[derive(Debug, Deserialize)]
struct TimeseriesBody {
    #[serde(default)]
    result: Vec<TimeseriesEntry>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesEntry {
    meta: TimeseriesMeta,
    /// The value array lives under a key named after the requested type,
    /// e.g. "annualTotalRevenue"
    #[serde(flatten)]
    series: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesMeta {
    #[serde(rename = "type")]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Datum {
    #[serde(rename = "asOfDate")]
    as_of_date: String,
    #[serde(rename = "reportedValue")]
    reported_value: ReportedValue,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    raw: f64,
}

/// Client for Yahoo's fundamentals-timeseries endpoint.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Fetch the tracked income-statement metrics for `symbol` at one
    /// reporting cadence. Series come back ascending by report date; a
    /// metric Yahoo has no data for is simply absent from the result.
    pub async fn get_financials(
        &self,
        symbol: &str,
        period: ReportPeriod,
    ) -> Result<Vec<FinancialSeries>, BriefError> {
        let url = format!("{}/{}", BASE_URL, symbol);

        let now = Utc::now();
        let period1 = (now - Duration::days(365 * LOOKBACK_YEARS)).timestamp().to_string();
        let period2 = now.timestamp().to_string();
        let types = FinancialMetric::ALL
            .iter()
            .map(|m| series_type(*m, period))
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("type", &types),
                ("period1", &period1),
                ("period2", &period2),
                ("merge", "false"),
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

        let body: TimeseriesResponse = response
            .json()
            .await
            .map_err(|e| BriefError::ApiError(e.to_string()))?;

        Ok(parse_timeseries(body, period))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Yahoo's series type name for a metric at a cadence,
/// e.g. (TotalRevenue, Yearly) -> "annualTotalRevenue".
fn series_type(metric: FinancialMetric, period: ReportPeriod) -> String {
    let prefix = match period {
        ReportPeriod::Yearly => "annual",
        ReportPeriod::Quarterly => "quarterly",
    };
    let name = match metric {
        FinancialMetric::TotalRevenue => "TotalRevenue",
        FinancialMetric::GrossProfit => "GrossProfit",
        FinancialMetric::NetIncome => "NetIncome",
        FinancialMetric::DilutedEps => "DilutedEPS",
    };
    format!("{prefix}{name}")
}

fn metric_for_type(type_name: &str, period: ReportPeriod) -> Option<FinancialMetric> {
    FinancialMetric::ALL
        .into_iter()
        .find(|m| series_type(*m, period) == type_name)
}

fn parse_timeseries(body: TimeseriesResponse, period: ReportPeriod) -> Vec<FinancialSeries> {
    let mut out = Vec::new();

    for entry in body.timeseries.result {
        let Some(type_name) = entry.meta.types.first() else {
            continue;
        };
        let Some(metric) = metric_for_type(type_name, period) else {
            tracing::debug!("Ignoring unrequested series type {}", type_name);
            continue;
        };
        let Some(raw_series) = entry.series.get(type_name) else {
            continue;
        };

        // Missing quarters come back as nulls inside the array
        let data: Vec<Option<Datum>> = match serde_json::from_value(raw_series.clone()) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Malformed {} series: {}", type_name, e);
                continue;
            }
        };

        let mut points: Vec<FinancialPoint> = data
            .into_iter()
            .flatten()
            .filter_map(|d| {
                let as_of = NaiveDate::parse_from_str(&d.as_of_date, "%Y-%m-%d").ok()?;
                Some(FinancialPoint {
                    as_of,
                    value: d.reported_value.raw,
                })
            })
            .collect();

        if points.is_empty() {
            continue;
        }

        points.sort_by_key(|p| p.as_of);
        out.push(FinancialSeries {
            metric,
            period,
            points,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_type_names() {
        assert_eq!(
            series_type(FinancialMetric::TotalRevenue, ReportPeriod::Yearly),
            "annualTotalRevenue"
        );
        assert_eq!(
            series_type(FinancialMetric::DilutedEps, ReportPeriod::Quarterly),
            "quarterlyDilutedEPS"
        );
    }

    #[test]
    fn test_parse_timeseries() {
        let json = r#"{
            "timeseries": {
                "result": [
                    {
                        "meta": {"symbol": ["TATAMOTORS.NS"], "type": ["annualTotalRevenue"]},
                        "timestamp": [1648684800, 1680220800],
                        "annualTotalRevenue": [
                            {"asOfDate": "2023-03-31", "periodType": "12M",
                             "reportedValue": {"raw": 3456789000000.0, "fmt": "3.46T"}},
                            null,
                            {"asOfDate": "2022-03-31", "periodType": "12M",
                             "reportedValue": {"raw": 2784543000000.0, "fmt": "2.78T"}}
                        ]
                    },
                    {
                        "meta": {"symbol": ["TATAMOTORS.NS"], "type": ["annualDilutedEPS"]},
                        "annualDilutedEPS": []
                    }
                ],
                "error": null
            }
        }"#;

        let body: TimeseriesResponse = serde_json::from_str(json).unwrap();
        let series = parse_timeseries(body, ReportPeriod::Yearly);

        // Empty EPS series is dropped entirely
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].metric, FinancialMetric::TotalRevenue);

        // Null quarter skipped, points sorted ascending
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(
            series[0].points[0].as_of,
            NaiveDate::from_ymd_opt(2022, 3, 31).unwrap()
        );
        assert!(series[0].points[0].value < series[0].points[1].value);
    }

    #[test]
    fn test_parse_timeseries_ignores_unknown_type() {
        let json = r#"{
            "timeseries": {
                "result": [
                    {
                        "meta": {"type": ["annualOperatingIncome"]},
                        "annualOperatingIncome": [
                            {"asOfDate": "2023-03-31", "reportedValue": {"raw": 1.0}}
                        ]
                    }
                ]
            }
        }"#;

        let body: TimeseriesResponse = serde_json::from_str(json).unwrap();
        assert!(parse_timeseries(body, ReportPeriod::Yearly).is_empty());
    }
}
