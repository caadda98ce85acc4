//! Stock data dashboard
//!
//! Fetches daily prices, company metadata and financial statements for one
//! ticker from Yahoo Finance, asks a Groq-hosted model for a narrative
//! analysis, and presents everything in three regions (Analyze, Stock Data,
//! Financial Statement) either as a web page or as a terminal report.
//!
//! Each trigger runs [`Dashboard::run`], a strictly sequential pipeline:
//!
//! 1. price history for the date range
//! 2. company metadata, projected into a [`FundamentalSummary`]
//! 3. the six financial statements
//! 4. one completion call with the Open/Close text and the fundamental text
//!
//! The first failing step aborts the run with a [`DashboardError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use analyzer_llm::providers::OpenAIProvider;
//! use stock_analyzer::{
//!     Dashboard, DashboardConfig, DashboardRequest, DateRange, NarrativeAnalyzer,
//!     YahooFinanceClient,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::from_env()?;
//!     let provider = Arc::new(OpenAIProvider::with_config(config.provider_config())?);
//!     let analyzer = NarrativeAnalyzer::new(provider, &config.llm, config.language.clone())?;
//!     let market = Arc::new(YahooFinanceClient::new(config.http_timeout.as_secs())?);
//!     let dashboard = Dashboard::new(market, analyzer);
//!
//!     let range = DateRange::new("2024-01-01".parse()?, "2024-06-30".parse()?);
//!     let report = dashboard.run(&DashboardRequest::new("BBCA.JK", range)).await?;
//!     println!("{}", report.analysis);
//!
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod api;
pub mod config;
pub mod error;
pub mod fundamentals;
pub mod market;
pub mod pipeline;
pub mod presentation;
pub mod prompts;
pub mod server;

pub use analyzer::NarrativeAnalyzer;
pub use api::YahooFinanceClient;
pub use config::{DashboardConfig, DashboardConfigBuilder, LlmSettings};
pub use error::{DashboardError, Result};
pub use fundamentals::{FundamentalSummary, Metric, PriceToEarnings, extract, format_fundamentals};
pub use market::{
    CompanyInfo, DateRange, FinancialStatement, FinancialStatements, Frequency, LineItem,
    MarketDataProvider, PriceBar, PriceSeries, StatementKind,
};
pub use pipeline::{Dashboard, DashboardReport, DashboardRequest};
pub use presentation::{DashboardView, FormDefaults, HtmlRenderer, render_terminal};
pub use server::{AppState, router, serve};
