//! The per-trigger dashboard pipeline

use crate::analyzer::NarrativeAnalyzer;
use crate::error::{DashboardError, Result};
use crate::fundamentals::{self, FundamentalSummary};
use crate::market::{
    DateRange, FinancialStatements, MarketDataProvider, PriceSeries, TECHNICAL_COLUMNS,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub symbol: String,
    pub range: DateRange,
}

impl DashboardRequest {
    /// The symbol is trimmed, otherwise used as typed
    pub fn new(symbol: impl AsRef<str>, range: DateRange) -> Self {
        Self {
            symbol: symbol.as_ref().trim().to_string(),
            range,
        }
    }
}

/// Everything one trigger produced, ready for presentation
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub symbol: String,
    pub range: DateRange,
    pub prices: PriceSeries,
    pub fundamentals: FundamentalSummary,
    pub fundamental_text: String,
    pub technical_data: String,
    pub statements: FinancialStatements,
    pub analysis: String,
}

/// Fetch, extract, analyze
pub struct Dashboard {
    market: Arc<dyn MarketDataProvider>,
    analyzer: NarrativeAnalyzer,
}

impl Dashboard {
    pub fn new(market: Arc<dyn MarketDataProvider>, analyzer: NarrativeAnalyzer) -> Self {
        Self { market, analyzer }
    }

    /// Run every step in order; the first failure aborts the run
    #[instrument(skip(self), fields(symbol = %request.symbol))]
    pub async fn run(&self, request: &DashboardRequest) -> Result<DashboardReport> {
        let symbol = request.symbol.as_str();
        if symbol.is_empty() {
            return Err(DashboardError::InvalidRequest(
                "stock symbol must not be empty".to_string(),
            ));
        }

        let prices = self.market.price_history(symbol, &request.range).await?;
        if prices.is_empty() {
            return Err(DashboardError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!(
                    "no price history between {} and {}",
                    request.range.start, request.range.end
                ),
            });
        }

        let info = self.market.company_info(symbol).await?;
        let summary = fundamentals::extract(&info);
        let fundamental_text = fundamentals::format_fundamentals(&summary);

        let mut statements = Vec::with_capacity(FinancialStatements::LAYOUT.len());
        for (kind, frequency) in FinancialStatements::LAYOUT {
            statements.push(
                self.market
                    .financial_statement(symbol, kind, frequency)
                    .await?,
            );
        }
        let statements = FinancialStatements::from_statements(statements);

        let technical_data = prices.to_text(&TECHNICAL_COLUMNS);
        let analysis = self
            .analyzer
            .analyze(&technical_data, &fundamental_text)
            .await?;

        info!("Dashboard ready: {} bars", prices.len());

        Ok(DashboardReport {
            symbol: symbol.to_string(),
            range: request.range,
            prices,
            fundamentals: summary,
            fundamental_text,
            technical_data,
            statements,
            analysis,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::LlmSettings;
    use crate::market::{
        CompanyInfo, FinancialStatement, Frequency, LineItem, PriceBar, StatementKind,
        TOTAL_REVENUE,
    };
    use analyzer_llm::{
        CompletionRequest, CompletionResponse, LLMProvider, Message, StopReason, TokenUsage,
    };
    use analyzer_prompt::Language;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use mockall::mock;
    use serde_json::json;
    use std::sync::Mutex;

    mock! {
        pub Market {}

        #[async_trait]
        impl MarketDataProvider for Market {
            async fn price_history(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries>;
            async fn company_info(&self, symbol: &str) -> Result<CompanyInfo>;
            async fn financial_statement(
                &self,
                symbol: &str,
                kind: StatementKind,
                frequency: Frequency,
            ) -> Result<FinancialStatement>;
        }
    }

    mock! {
        pub Llm {}

        #[async_trait]
        impl LLMProvider for Llm {
            async fn complete(
                &self,
                request: CompletionRequest,
            ) -> analyzer_llm::Result<CompletionResponse>;
            fn name(&self) -> &str;
        }
    }

    pub(crate) fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    pub(crate) fn sample_prices(symbol: &str) -> PriceSeries {
        PriceSeries::new(
            symbol,
            vec![
                PriceBar {
                    date: date("2024-01-03"),
                    open: 184.220001,
                    high: 185.880005,
                    low: 183.429993,
                    close: 184.25,
                    volume: 58_414_500,
                },
                PriceBar {
                    date: date("2024-01-02"),
                    open: 187.149994,
                    high: 188.440002,
                    low: 183.889999,
                    close: 185.639999,
                    volume: 82_488_700,
                },
            ],
        )
    }

    pub(crate) fn sample_info() -> CompanyInfo {
        match json!({
            "currentPrice": 189.5,
            "marketCap": 2_950_000_000_000_i64,
            "trailingPE": 29.4,
            "forwardPE": 28.1,
            "dividendYield": 0.0051,
        }) {
            serde_json::Value::Object(map) => CompanyInfo::new(map),
            _ => unreachable!(),
        }
    }

    pub(crate) fn sample_statement(kind: StatementKind, frequency: Frequency) -> FinancialStatement {
        FinancialStatement::new(
            kind,
            frequency,
            vec![date("2023-12-31"), date("2023-09-30")],
            vec![LineItem {
                name: TOTAL_REVENUE.to_string(),
                values: vec![Some(119.575e9), None],
            }],
        )
    }

    fn range() -> DateRange {
        DateRange::new(date("2024-01-01"), date("2024-01-04"))
    }

    fn market() -> MockMarket {
        let mut market = MockMarket::new();
        market
            .expect_price_history()
            .times(1)
            .returning(|symbol, _| Ok(sample_prices(symbol)));
        market
            .expect_company_info()
            .times(1)
            .returning(|_| Ok(sample_info()));
        market
            .expect_financial_statement()
            .times(6)
            .returning(|_, kind, frequency| Ok(sample_statement(kind, frequency)));
        market
    }

    fn analyzer(llm: MockLlm) -> NarrativeAnalyzer {
        NarrativeAnalyzer::new(Arc::new(llm), &LlmSettings::default(), Language::Indonesian)
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&prompts);

        let mut llm = MockLlm::new();
        llm.expect_complete().times(1).returning(move |request| {
            seen.lock()
                .unwrap()
                .push(request.messages[0].content.clone());
            Ok(CompletionResponse {
                message: Message::assistant("<p>Analisis AAPL</p>"),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        });

        let dashboard = Dashboard::new(Arc::new(market()), analyzer(llm));
        let report = dashboard
            .run(&DashboardRequest::new(" AAPL ", range()))
            .await
            .unwrap();

        assert_eq!(report.symbol, "AAPL");
        assert_eq!(report.analysis, "<p>Analisis AAPL</p>");
        assert_eq!(
            report.technical_data,
            "                  Open       Close\n\
             Date                              \n\
             2024-01-02  187.149994  185.639999\n\
             2024-01-03  184.220001  184.250000"
        );

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(&report.technical_data));
        assert!(prompts[0].contains(&report.fundamental_text));
        assert!(report.fundamental_text.contains("- Forward P/E: 28.1"));
        assert!(report.fundamental_text.contains("**Return on Equity (ROE)**: N/A%"));
        assert_eq!(report.statements.iter().count(), 6);
    }

    #[tokio::test]
    async fn test_blank_symbol_is_rejected_before_any_fetch() {
        let mut market = MockMarket::new();
        market.expect_price_history().never();
        let mut llm = MockLlm::new();
        llm.expect_complete().never();

        let dashboard = Dashboard::new(Arc::new(market), analyzer(llm));
        let err = dashboard
            .run(&DashboardRequest::new("   ", range()))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRequest(_)));
        assert!(!err.is_upstream());
    }

    #[tokio::test]
    async fn test_empty_history_aborts_before_llm() {
        let mut market = MockMarket::new();
        market
            .expect_price_history()
            .times(1)
            .returning(|symbol, _| Ok(PriceSeries::new(symbol, Vec::new())));
        market.expect_company_info().never();
        market.expect_financial_statement().never();

        let mut llm = MockLlm::new();
        llm.expect_complete().never();

        let dashboard = Dashboard::new(Arc::new(market), analyzer(llm));
        let err = dashboard
            .run(&DashboardRequest::new("NOPE.JK", range()))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_statement_failure_aborts() {
        let mut market = MockMarket::new();
        market
            .expect_price_history()
            .returning(|symbol, _| Ok(sample_prices(symbol)));
        market.expect_company_info().returning(|_| Ok(sample_info()));
        market
            .expect_financial_statement()
            .times(1)
            .returning(|_, _, _| Err(DashboardError::ApiError("HTTP error: 500".to_string())));

        let mut llm = MockLlm::new();
        llm.expect_complete().never();

        let dashboard = Dashboard::new(Arc::new(market), analyzer(llm));
        let err = dashboard
            .run(&DashboardRequest::new("AAPL", range()))
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }
}
