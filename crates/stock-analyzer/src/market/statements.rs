//! Financial statement tables

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Line item charted in the revenue region
pub const TOTAL_REVENUE: &str = "Total Revenue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Income,
    BalanceSheet,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [
        StatementKind::Income,
        StatementKind::BalanceSheet,
        StatementKind::CashFlow,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            StatementKind::Income => "Income Statement",
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::CashFlow => "Cash Flow Statement",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Annual,
    Quarterly,
}

impl Frequency {
    pub const ALL: [Frequency; 2] = [Frequency::Annual, Frequency::Quarterly];

    /// Provider key prefix (`annualTotalRevenue`, `quarterlyTotalRevenue`)
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Frequency::Annual => "annual",
            Frequency::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_prefix())
    }
}

/// One statement row; `values[i]` belongs to `periods[i]` of the statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A (line item × period) table, periods newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub kind: StatementKind,
    pub frequency: Frequency,
    pub periods: Vec<NaiveDate>,
    pub rows: Vec<LineItem>,
}

impl FinancialStatement {
    pub fn new(
        kind: StatementKind,
        frequency: Frequency,
        periods: Vec<NaiveDate>,
        rows: Vec<LineItem>,
    ) -> Self {
        Self {
            kind,
            frequency,
            periods,
            rows,
        }
    }

    pub fn empty(kind: StatementKind, frequency: Frequency) -> Self {
        Self::new(kind, frequency, Vec::new(), Vec::new())
    }

    /// Display title, e.g. `Quarterly Balance Sheet`
    pub fn title(&self) -> String {
        match self.frequency {
            Frequency::Annual => self.kind.title().to_string(),
            Frequency::Quarterly => format!("Quarterly {}", self.kind.title()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, name: &str) -> Option<&LineItem> {
        self.rows.iter().find(|row| row.name == name)
    }

    /// The `Total Revenue` row with missing periods dropped, period order kept
    ///
    /// `None` when the statement has no such row at all.
    pub fn total_revenue(&self) -> Option<RevenueSeries> {
        let row = self.row(TOTAL_REVENUE)?;
        let points = self
            .periods
            .iter()
            .zip(&row.values)
            .filter_map(|(period, value)| value.map(|v| (*period, v)))
            .collect();
        Some(RevenueSeries { points })
    }
}

/// Revenue values per reporting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSeries {
    pub points: Vec<(NaiveDate, f64)>,
}

impl RevenueSeries {
    pub fn periods(&self) -> Vec<String> {
        self.points.iter().map(|(d, _)| d.to_string()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The six statements of one symbol, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    statements: Vec<FinancialStatement>,
}

impl FinancialStatements {
    /// Fetch and display order
    pub const LAYOUT: [(StatementKind, Frequency); 6] = [
        (StatementKind::Income, Frequency::Annual),
        (StatementKind::Income, Frequency::Quarterly),
        (StatementKind::BalanceSheet, Frequency::Annual),
        (StatementKind::BalanceSheet, Frequency::Quarterly),
        (StatementKind::CashFlow, Frequency::Annual),
        (StatementKind::CashFlow, Frequency::Quarterly),
    ];

    /// Collect statements, placing each in its layout slot
    ///
    /// Missing slots are filled with empty tables.
    pub fn from_statements(statements: impl IntoIterator<Item = FinancialStatement>) -> Self {
        let mut slots: Vec<Option<FinancialStatement>> = vec![None; Self::LAYOUT.len()];
        for statement in statements {
            if let Some(i) = Self::LAYOUT
                .iter()
                .position(|&(k, f)| k == statement.kind && f == statement.frequency)
            {
                slots[i] = Some(statement);
            }
        }

        let statements = Self::LAYOUT
            .iter()
            .zip(slots)
            .map(|(&(kind, frequency), slot)| {
                slot.unwrap_or_else(|| FinancialStatement::empty(kind, frequency))
            })
            .collect();

        Self { statements }
    }

    pub fn get(&self, kind: StatementKind, frequency: Frequency) -> Option<&FinancialStatement> {
        self.statements
            .iter()
            .find(|s| s.kind == kind && s.frequency == frequency)
    }

    pub fn quarterly_income(&self) -> Option<&FinancialStatement> {
        self.get(StatementKind::Income, Frequency::Quarterly)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FinancialStatement> {
        self.statements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn quarterly_income(rows: Vec<LineItem>) -> FinancialStatement {
        FinancialStatement::new(
            StatementKind::Income,
            Frequency::Quarterly,
            vec![
                date("2024-06-30"),
                date("2024-03-31"),
                date("2023-12-31"),
                date("2023-09-30"),
            ],
            rows,
        )
    }

    #[test]
    fn test_total_revenue_drops_missing_and_keeps_order() {
        let statement = quarterly_income(vec![
            LineItem {
                name: "Net Income".to_string(),
                values: vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
            },
            LineItem {
                name: TOTAL_REVENUE.to_string(),
                values: vec![Some(85.7e9), None, Some(119.5e9), None],
            },
        ]);

        let revenue = statement.total_revenue().unwrap();
        assert_eq!(revenue.periods(), vec!["2024-06-30", "2023-12-31"]);
        assert_eq!(revenue.values(), vec![85.7e9, 119.5e9]);
    }

    #[test]
    fn test_total_revenue_absent_row() {
        let statement = quarterly_income(vec![LineItem {
            name: "Gross Profit".to_string(),
            values: vec![Some(1.0); 4],
        }]);
        assert!(statement.total_revenue().is_none());
    }

    #[test]
    fn test_titles() {
        assert_eq!(
            FinancialStatement::empty(StatementKind::Income, Frequency::Annual).title(),
            "Income Statement"
        );
        assert_eq!(
            FinancialStatement::empty(StatementKind::CashFlow, Frequency::Quarterly).title(),
            "Quarterly Cash Flow Statement"
        );
    }

    #[test]
    fn test_from_statements_orders_and_fills_layout() {
        let statements = FinancialStatements::from_statements(vec![
            FinancialStatement::empty(StatementKind::CashFlow, Frequency::Quarterly),
            quarterly_income(vec![]),
        ]);

        let titles: Vec<String> = statements.iter().map(FinancialStatement::title).collect();
        assert_eq!(
            titles,
            vec![
                "Income Statement",
                "Quarterly Income Statement",
                "Balance Sheet",
                "Quarterly Balance Sheet",
                "Cash Flow Statement",
                "Quarterly Cash Flow Statement",
            ]
        );
        assert_eq!(statements.quarterly_income().unwrap().periods.len(), 4);
    }
}
