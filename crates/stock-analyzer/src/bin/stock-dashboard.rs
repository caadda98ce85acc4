//! Stock data dashboard
//!
//! Serves the web dashboard or prints a one-off terminal report.
//!
//! # Usage
//!
//! ```bash
//! export GROQ_API_KEY="gsk_..."
//!
//! # Web dashboard on http://127.0.0.1:8501
//! cargo run --bin stock-dashboard -p stock-analyzer -- serve
//!
//! # Terminal report
//! cargo run --bin stock-dashboard -p stock-analyzer -- analyze BBCA.JK --start 2024-01-01
//! ```

use analyzer_llm::providers::OpenAIProvider;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use stock_analyzer::{
    AppState, Dashboard, DashboardConfig, DashboardRequest, DashboardView, DateRange,
    HtmlRenderer, NarrativeAnalyzer, YahooFinanceClient, render_terminal, serve,
};

#[derive(Parser)]
#[command(name = "stock-dashboard", version, about = "Stock Data Analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web dashboard
    Serve {
        /// Bind address (overrides ANALYZER_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Fetch, analyze and print a report for one symbol
    Analyze {
        /// Ticker symbol, e.g. BBCA.JK
        symbol: String,
        /// First day of the price history
        #[arg(long, default_value = "2024-01-01")]
        start: NaiveDate,
        /// Day after the last bar (defaults to today)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

fn build_dashboard(config: &DashboardConfig) -> anyhow::Result<Dashboard> {
    let provider = OpenAIProvider::with_config(config.provider_config())
        .context("failed to create LLM provider")?;
    let market = YahooFinanceClient::new(config.http_timeout.as_secs())
        .context("failed to create Yahoo Finance client")?;
    let analyzer = NarrativeAnalyzer::new(Arc::new(provider), &config.llm, config.language.clone())
        .context("failed to load narrative prompt")?;

    Ok(Dashboard::new(Arc::new(market), analyzer))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    analyzer_utils::load_dotenv();
    analyzer_utils::init_tracing();

    let cli = Cli::parse();
    let config = DashboardConfig::from_env().context("invalid configuration")?;
    tracing::debug!("Loaded {:?}", config);

    let dashboard = build_dashboard(&config)?;

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(config.bind);
            let state = AppState::new(dashboard, HtmlRenderer::new()?);
            serve(state, addr).await?;
        }
        Command::Analyze { symbol, start, end } => {
            let end = end.unwrap_or_else(|| Local::now().date_naive());
            let request = DashboardRequest::new(symbol, DateRange::new(start, end));

            let report = dashboard
                .run(&request)
                .await
                .with_context(|| format!("analysis of {} failed", request.symbol))?;
            println!("{}", render_terminal(&DashboardView::from_report(&report)));
        }
    }

    Ok(())
}
