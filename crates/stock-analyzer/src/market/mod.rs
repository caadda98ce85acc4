//! Market data model and the provider seam
//!
//! Everything here is rebuilt from scratch on every dashboard trigger.

mod prices;
mod statements;

pub use prices::{PriceBar, PriceColumn, PriceSeries, TECHNICAL_COLUMNS};
pub use statements::{
    FinancialStatement, FinancialStatements, Frequency, LineItem, RevenueSeries, StatementKind,
    TOTAL_REVENUE,
};

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Calendar date range requested by the user
///
/// `start <= end` is not enforced; the provider decides what an inverted
/// range returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Provider-defined company metadata (the "info" mapping)
///
/// Field names and value types belong to the provider; nothing here is
/// validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyInfo(Map<String, Value>);

impl CompanyInfo {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Look up a provider field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for CompanyInfo {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Source of prices, company metadata and financial statements
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily OHLCV bars for `symbol` inside `range`, oldest first
    async fn price_history(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries>;

    /// Company metadata mapping for `symbol`
    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo>;

    /// One financial statement table for `symbol`
    async fn financial_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
        frequency: Frequency,
    ) -> Result<FinancialStatement>;
}
