//! Yahoo Finance API client
//!
//! Prices come from `yahoo_finance_api`; company metadata and statements are
//! read from the quoteSummary and fundamentals-timeseries endpoints, which
//! need a cookie and crumb pair obtained once per client.

use crate::error::{DashboardError, Result};
use crate::market::{
    CompanyInfo, DateRange, FinancialStatement, Frequency, LineItem, MarketDataProvider, PriceBar,
    PriceSeries, StatementKind,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use yahoo_finance_api as yahoo;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const QUERY1_URL: &str = "https://query1.finance.yahoo.com";
const QUERY2_URL: &str = "https://query2.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// quoteSummary modules, flattened in this order (later keys win)
const SUMMARY_MODULES: [&str; 5] = [
    "financialData",
    "quoteType",
    "defaultKeyStatistics",
    "assetProfile",
    "summaryDetail",
];

/// 2016-12-31, earliest period requested from the timeseries endpoint
const TIMESERIES_START: i64 = 1_483_142_400;

const INCOME_KEYS: &[&str] = &[
    "TotalRevenue",
    "OperatingRevenue",
    "CostOfRevenue",
    "GrossProfit",
    "OperatingExpense",
    "SellingGeneralAndAdministration",
    "ResearchAndDevelopment",
    "OperatingIncome",
    "NetNonOperatingInterestIncomeExpense",
    "InterestIncome",
    "InterestExpense",
    "OtherIncomeExpense",
    "PretaxIncome",
    "TaxProvision",
    "NetIncomeCommonStockholders",
    "NetIncome",
    "DilutedNIAvailtoComStockholders",
    "BasicEPS",
    "DilutedEPS",
    "BasicAverageShares",
    "DilutedAverageShares",
    "TotalExpenses",
    "NormalizedIncome",
    "EBIT",
    "EBITDA",
    "NormalizedEBITDA",
    "ReconciledDepreciation",
];

const BALANCE_SHEET_KEYS: &[&str] = &[
    "TotalAssets",
    "CurrentAssets",
    "CashAndCashEquivalents",
    "CashCashEquivalentsAndShortTermInvestments",
    "Receivables",
    "Inventory",
    "TotalNonCurrentAssets",
    "NetPPE",
    "GoodwillAndOtherIntangibleAssets",
    "TotalLiabilitiesNetMinorityInterest",
    "CurrentLiabilities",
    "AccountsPayable",
    "CurrentDebt",
    "LongTermDebt",
    "TotalDebt",
    "NetDebt",
    "StockholdersEquity",
    "CommonStockEquity",
    "RetainedEarnings",
    "TotalCapitalization",
    "WorkingCapital",
    "TangibleBookValue",
    "InvestedCapital",
    "ShareIssued",
    "OrdinarySharesNumber",
    "TreasurySharesNumber",
];

const CASH_FLOW_KEYS: &[&str] = &[
    "OperatingCashFlow",
    "InvestingCashFlow",
    "FinancingCashFlow",
    "EndCashPosition",
    "BeginningCashPosition",
    "ChangesInCash",
    "CapitalExpenditure",
    "FreeCashFlow",
    "IssuanceOfDebt",
    "RepaymentOfDebt",
    "RepurchaseOfCapitalStock",
    "CashDividendsPaid",
    "DepreciationAndAmortization",
    "StockBasedCompensation",
    "ChangeInWorkingCapital",
    "NetIncomeFromContinuingOperations",
    "IncomeTaxPaidSupplementalData",
    "InterestPaidSupplementalData",
];

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    http: Client,
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceClient {
    /// Create a client whose requests give up after `timeout_secs`
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            crumb: Mutex::new(None),
        })
    }

    /// Crumb for the current cookie session, fetched on first use
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // fc.yahoo.com answers 404 but still sets the session cookie
        if let Err(e) = self.http.get(COOKIE_URL).send().await {
            warn!("Cookie request to {} failed: {}", COOKIE_URL, e);
        }

        let response = self
            .http
            .get(format!("{QUERY1_URL}/v1/test/getcrumb"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DashboardError::YahooFinanceError(format!(
                "crumb request failed: HTTP {}",
                response.status()
            )));
        }

        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(DashboardError::YahooFinanceError(
                "crumb request returned no crumb".to_string(),
            ));
        }

        debug!("Obtained Yahoo Finance crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)], symbol: &str) -> Result<Value> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Stale session; the next request performs a new handshake
            self.crumb.lock().await.take();
            return Err(DashboardError::YahooFinanceError(format!(
                "session rejected: HTTP {status}"
            )));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(DashboardError::InvalidSymbol(symbol.to_string()));
        }
        if !status.is_success() {
            return Err(DashboardError::ApiError(format!("HTTP error: {status}")));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    #[instrument(skip(self))]
    async fn price_history(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| DashboardError::YahooFinanceError(e.to_string()))?;

        let start = to_offset_datetime(range.start)?;
        let end = to_offset_datetime(range.end)?;

        let response = provider
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| DashboardError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| DashboardError::YahooFinanceError(e.to_string()))?;

        // Bars are stamped at the session open; the exchange's local date is the trading day
        let gmtoffset = response.metadata().map(|m| m.gmtoffset).unwrap_or_else(|e| {
            warn!("No chart metadata for {}, dating bars in UTC: {}", symbol, e);
            0
        });

        let bars = quotes
            .iter()
            .map(|q| {
                Ok(PriceBar {
                    date: exchange_date(q.timestamp, gmtoffset)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Fetched {} daily bars for {}", bars.len(), symbol);
        Ok(PriceSeries::new(symbol, bars))
    }

    #[instrument(skip(self))]
    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo> {
        let crumb = self.crumb().await?;
        let modules = SUMMARY_MODULES.join(",");
        let url = format!("{QUERY2_URL}/v10/finance/quoteSummary/{symbol}");

        let body = self
            .get_json(
                &url,
                &[
                    ("modules", modules.as_str()),
                    ("formatted", "false"),
                    ("crumb", crumb.as_str()),
                ],
                symbol,
            )
            .await?;

        let info = parse_quote_summary(symbol, &body)?;
        debug!("Company info for {} has {} fields", symbol, info.len());
        Ok(info)
    }

    #[instrument(skip(self))]
    async fn financial_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
        frequency: Frequency,
    ) -> Result<FinancialStatement> {
        let crumb = self.crumb().await?;
        let types = timeseries_types(kind, frequency);
        let period1 = TIMESERIES_START.to_string();
        let period2 = Utc::now().timestamp().to_string();
        let url = format!("{QUERY2_URL}/ws/fundamentals-timeseries/v1/finance/timeseries/{symbol}");

        let body = self
            .get_json(
                &url,
                &[
                    ("symbol", symbol),
                    ("type", types.as_str()),
                    ("period1", period1.as_str()),
                    ("period2", period2.as_str()),
                    ("crumb", crumb.as_str()),
                ],
                symbol,
            )
            .await?;

        let statement = parse_timeseries(kind, frequency, &body)?;
        debug!(
            "{} for {}: {} rows over {} periods",
            statement.title(),
            symbol,
            statement.rows.len(),
            statement.periods.len()
        );
        Ok(statement)
    }
}

/// Calendar date of a bar timestamp at the exchange's UTC offset (seconds)
fn exchange_date(timestamp: i64, gmtoffset: i32) -> Result<NaiveDate> {
    let offset = FixedOffset::east_opt(gmtoffset).ok_or_else(|| {
        DashboardError::YahooFinanceError(format!("invalid exchange offset {gmtoffset}"))
    })?;
    let utc = DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
        DashboardError::YahooFinanceError(format!("invalid quote timestamp {timestamp}"))
    })?;
    Ok(utc.with_timezone(&offset).date_naive())
}

fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime> {
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        DashboardError::YahooFinanceError(format!("invalid date {date}"))
    })?;
    OffsetDateTime::from_unix_timestamp(midnight.and_utc().timestamp())
        .map_err(|e| DashboardError::YahooFinanceError(format!("Invalid timestamp: {e}")))
}

fn line_item_keys(kind: StatementKind) -> &'static [&'static str] {
    match kind {
        StatementKind::Income => INCOME_KEYS,
        StatementKind::BalanceSheet => BALANCE_SHEET_KEYS,
        StatementKind::CashFlow => CASH_FLOW_KEYS,
    }
}

/// Comma separated `type` parameter, e.g. `quarterlyTotalRevenue,...`
fn timeseries_types(kind: StatementKind, frequency: Frequency) -> String {
    line_item_keys(kind)
        .iter()
        .map(|key| format!("{}{}", frequency.key_prefix(), key))
        .collect::<Vec<_>>()
        .join(",")
}

/// `TotalRevenue` -> `Total Revenue`, `BasicEPS` -> `Basic EPS`
fn camel_to_title(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut title = String::with_capacity(key.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                title.push(' ');
            }
        }
        title.push(c);
    }

    title
}

/// `{"raw": x, "fmt": ..}` -> `x`; null and empty objects count as absent
fn unwrap_raw(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => map
            .get("raw")
            .map_or_else(|| Some(value.clone()), unwrap_raw),
        other => Some(other.clone()),
    }
}

fn parse_quote_summary(symbol: &str, body: &Value) -> Result<CompanyInfo> {
    let summary = &body["quoteSummary"];

    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        let reason = error
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("quoteSummary error")
            .to_string();
        return Err(DashboardError::DataUnavailable {
            symbol: symbol.to_string(),
            reason,
        });
    }

    let result = summary["result"]
        .get(0)
        .ok_or_else(|| DashboardError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "empty quoteSummary result".to_string(),
        })?;

    let mut fields = Map::new();
    for module in SUMMARY_MODULES {
        let Some(Value::Object(entries)) = result.get(module) else {
            continue;
        };
        for (key, value) in entries {
            if key == "maxAge" {
                continue;
            }
            if let Some(value) = unwrap_raw(value) {
                fields.insert(key.clone(), value);
            }
        }
    }

    Ok(CompanyInfo::new(fields))
}

fn parse_timeseries(
    kind: StatementKind,
    frequency: Frequency,
    body: &Value,
) -> Result<FinancialStatement> {
    let results = body["timeseries"]["result"].as_array().ok_or_else(|| {
        DashboardError::YahooFinanceError("timeseries response without result".to_string())
    })?;

    let prefix = frequency.key_prefix();
    let mut series: HashMap<&str, HashMap<NaiveDate, f64>> = HashMap::new();
    let mut periods = BTreeSet::new();

    for entry in results {
        let Some(type_key) = entry["meta"]["type"].get(0).and_then(Value::as_str) else {
            continue;
        };
        let Some(key) = type_key.strip_prefix(prefix) else {
            continue;
        };
        let Some(points) = entry.get(type_key).and_then(Value::as_array) else {
            continue;
        };

        for point in points {
            let Some(date) = point["asOfDate"]
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            else {
                continue;
            };
            let Some(value) = point["reportedValue"]["raw"].as_f64() else {
                continue;
            };
            periods.insert(date);
            series.entry(key).or_default().insert(date, value);
        }
    }

    let periods: Vec<NaiveDate> = periods.into_iter().rev().collect();
    let rows = line_item_keys(kind)
        .iter()
        .filter_map(|key| {
            let values = series.get(key)?;
            Some(LineItem {
                name: camel_to_title(key),
                values: periods.iter().map(|d| values.get(d).copied()).collect(),
            })
        })
        .collect();

    Ok(FinancialStatement::new(kind, frequency, periods, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::TOTAL_REVENUE;
    use serde_json::json;

    #[test]
    fn test_exchange_date_ahead_of_utc() {
        // ASX open on 2024-01-02 is 2024-01-01T23:00Z, AEDT is UTC+11
        let date = exchange_date(1_704_150_000, 39_600).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_exchange_date_behind_utc() {
        // NYSE open on 2024-01-02 is 14:30Z, EST is UTC-5
        let date = exchange_date(1_704_205_800, -18_000).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_exchange_date_rejects_bad_offset() {
        assert!(exchange_date(1_704_205_800, 90_000).is_err());
    }

    #[test]
    fn test_camel_to_title() {
        assert_eq!(camel_to_title("TotalRevenue"), "Total Revenue");
        assert_eq!(camel_to_title("BasicEPS"), "Basic EPS");
        assert_eq!(camel_to_title("NetPPE"), "Net PPE");
        assert_eq!(camel_to_title("EBITDA"), "EBITDA");
        assert_eq!(
            camel_to_title("DilutedNIAvailtoComStockholders"),
            "Diluted NI Availto Com Stockholders"
        );
    }

    #[test]
    fn test_timeseries_types_prefixes_every_key() {
        let types = timeseries_types(StatementKind::CashFlow, Frequency::Quarterly);
        assert!(types.starts_with("quarterlyOperatingCashFlow,quarterlyInvestingCashFlow"));
        assert_eq!(types.split(',').count(), CASH_FLOW_KEYS.len());
        assert!(types.split(',').all(|t| t.starts_with("quarterly")));
    }

    #[test]
    fn test_parse_quote_summary_flattens_modules() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "financialData": {
                        "maxAge": 86400,
                        "currentPrice": {"raw": 9875.0, "fmt": "9,875.00"},
                        "returnOnEquity": {"raw": 0.2131, "fmt": "21.31%"},
                        "targetHighPrice": {}
                    },
                    "quoteType": {"symbol": "BBCA.JK", "longName": "PT Bank Central Asia Tbk"},
                    "defaultKeyStatistics": {"forwardPE": null},
                    "summaryDetail": {
                        "marketCap": 1_217_369_000_000_000_i64,
                        "trailingPE": 23.9,
                        "currentPrice": 9900.0
                    }
                }],
                "error": null
            }
        });

        let info = parse_quote_summary("BBCA.JK", &body).unwrap();
        assert_eq!(info.get("currentPrice"), Some(&json!(9900.0)));
        assert_eq!(info.get("returnOnEquity"), Some(&json!(0.2131)));
        assert_eq!(info.get("marketCap"), Some(&json!(1_217_369_000_000_000_i64)));
        assert_eq!(info.get("longName"), Some(&json!("PT Bank Central Asia Tbk")));
        assert!(info.get("forwardPE").is_none());
        assert!(info.get("targetHighPrice").is_none());
        assert!(info.get("maxAge").is_none());
    }

    #[test]
    fn test_parse_quote_summary_error() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": {"code": "Not Found", "description": "Quote not found for symbol: NOPE"}
            }
        });

        let err = parse_quote_summary("NOPE", &body).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
        assert!(err.to_string().contains("Quote not found"));
    }

    #[test]
    fn test_parse_timeseries() {
        let body = json!({
            "timeseries": {
                "result": [
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["quarterlyNetIncome"]},
                        "timestamp": [1_696_032_000, 1_703_980_800],
                        "quarterlyNetIncome": [
                            {"asOfDate": "2023-09-30", "reportedValue": {"raw": 22.956e9}},
                            {"asOfDate": "2023-12-31", "reportedValue": {"raw": 33.916e9}}
                        ]
                    },
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["quarterlyTotalRevenue"]},
                        "timestamp": [1_696_032_000, 1_703_980_800],
                        "quarterlyTotalRevenue": [
                            null,
                            {"asOfDate": "2023-12-31", "reportedValue": {"raw": 119.575e9}}
                        ]
                    },
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["quarterlyEBITDA"]}
                    }
                ],
                "error": null
            }
        });

        let statement =
            parse_timeseries(StatementKind::Income, Frequency::Quarterly, &body).unwrap();

        assert_eq!(
            statement.periods,
            vec![
                NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(2023, 9, 30).unwrap(),
            ]
        );
        let names: Vec<&str> = statement.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec![TOTAL_REVENUE, "Net Income"]);
        assert_eq!(
            statement.row(TOTAL_REVENUE).unwrap().values,
            vec![Some(119.575e9), None]
        );
        assert_eq!(
            statement.row("Net Income").unwrap().values,
            vec![Some(33.916e9), Some(22.956e9)]
        );
    }

    #[test]
    fn test_parse_timeseries_ignores_other_frequency() {
        let body = json!({
            "timeseries": {
                "result": [{
                    "meta": {"type": ["annualTotalRevenue"]},
                    "annualTotalRevenue": [
                        {"asOfDate": "2023-09-30", "reportedValue": {"raw": 383.285e9}}
                    ]
                }]
            }
        });

        let statement =
            parse_timeseries(StatementKind::Income, Frequency::Quarterly, &body).unwrap();
        assert!(statement.is_empty());
        assert!(statement.periods.is_empty());
    }

    #[test]
    fn test_parse_timeseries_missing_result() {
        let err = parse_timeseries(StatementKind::Income, Frequency::Annual, &json!({}))
            .unwrap_err();
        assert!(matches!(err, DashboardError::YahooFinanceError(_)));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_price_history() {
        let client = YahooFinanceClient::new(30).unwrap();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        );
        let series = client.price_history("AAPL", &range).await.unwrap();
        assert!(!series.is_empty());
        assert!(series.bars.iter().all(|b| b.close > 0.0));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_company_info() {
        let client = YahooFinanceClient::new(30).unwrap();
        let info = client.company_info("AAPL").await.unwrap();
        assert!(info.get("currentPrice").is_some());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_quarterly_income_statement() {
        let client = YahooFinanceClient::new(30).unwrap();
        let statement = client
            .financial_statement("AAPL", StatementKind::Income, Frequency::Quarterly)
            .await
            .unwrap();
        assert!(statement.row(TOTAL_REVENUE).is_some());
    }
}
