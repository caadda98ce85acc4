//! Fundamental metrics projected from company metadata

use crate::market::CompanyInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Printed in place of a field the provider did not report
pub const NOT_AVAILABLE: &str = "N/A";

/// One reported value, passed through as the provider sent it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Metric {
    Reported(Value),
    NotAvailable,
}

impl Metric {
    fn lookup(info: &CompanyInfo, field: &str) -> Self {
        match info.get(field) {
            Some(value) => Metric::Reported(value.clone()),
            None => Metric::NotAvailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Metric::Reported(_))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Reported(Value::String(s)) => f.write_str(s),
            Metric::Reported(value) => write!(f, "{value}"),
            Metric::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceToEarnings {
    pub trailing: Metric,
    pub forward: Metric,
}

/// The five fundamental entries shown to the user and the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSummary {
    pub current_price: Metric,
    pub market_cap: Metric,
    pub price_to_earnings: PriceToEarnings,
    pub dividend_yield: Metric,
    pub return_on_equity: Metric,
}

/// Project the fundamental entries out of the metadata mapping
///
/// Values are neither validated nor converted; an absent field becomes
/// [`Metric::NotAvailable`].
pub fn extract(info: &CompanyInfo) -> FundamentalSummary {
    FundamentalSummary {
        current_price: Metric::lookup(info, "currentPrice"),
        market_cap: Metric::lookup(info, "marketCap"),
        price_to_earnings: PriceToEarnings {
            trailing: Metric::lookup(info, "trailingPE"),
            forward: Metric::lookup(info, "forwardPE"),
        },
        dividend_yield: Metric::lookup(info, "dividendYield"),
        return_on_equity: Metric::lookup(info, "returnOnEquity"),
    }
}

/// Render the summary as the bilingual markdown block
///
/// Ratios get a bare `%` suffix; they are not scaled.
pub fn format_fundamentals(summary: &FundamentalSummary) -> String {
    format!(
        "**Current Price (Harga Saham Saat Ini)**: {} IDR\n\n\
         **Market Cap (Kapitalisasi Pasar)**: {} IDR\n\n\
         **Price to Earnings Ratio (P/E Ratio)**:\n  \
         - Trailing P/E: {}\n  \
         - Forward P/E: {}\n\n\
         **Dividend Yield (Hasil Dividen)**: {}%\n\n\
         **Return on Equity (ROE)**: {}%",
        summary.current_price,
        summary.market_cap,
        summary.price_to_earnings.trailing,
        summary.price_to_earnings.forward,
        summary.dividend_yield,
        summary.return_on_equity,
    )
}
