//! Display tables shared by the HTML and terminal renderers

use crate::market::{FinancialStatement, PriceColumn, PriceSeries};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Raw price rows: Date, Open, High, Low, Close, Volume
    pub fn from_price_series(series: &PriceSeries) -> Self {
        let headers = std::iter::once("Date".to_string())
            .chain(PriceColumn::ALL.iter().map(|c| c.label().to_string()))
            .collect();

        let columns: Vec<Vec<String>> = PriceColumn::ALL
            .iter()
            .map(|c| c.format_column(&series.bars))
            .collect();

        let rows = series
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                std::iter::once(bar.date.to_string())
                    .chain(columns.iter().map(|column| column[i].clone()))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Line items down, periods across (newest first); gaps are blank
    pub fn from_statement(statement: &FinancialStatement) -> Self {
        let headers = std::iter::once(String::new())
            .chain(statement.periods.iter().map(ToString::to_string))
            .collect();

        let rows = statement
            .rows
            .iter()
            .map(|item| {
                std::iter::once(item.name.clone())
                    .chain(item.values.iter().map(|v| format_amount(*v)))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn format_amount(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{Frequency, LineItem, StatementKind};
    use crate::pipeline::tests::{date, sample_prices};

    #[test]
    fn test_price_table() {
        let table = Table::from_price_series(&sample_prices("AAPL"));

        assert_eq!(
            table.headers,
            vec!["Date", "Open", "High", "Low", "Close", "Volume"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "2024-01-02");
        assert_eq!(table.rows[0][1], "187.149994");
        assert_eq!(table.rows[0][5], "82488700");
    }

    #[test]
    fn test_statement_table() {
        let statement = FinancialStatement::new(
            StatementKind::BalanceSheet,
            Frequency::Annual,
            vec![date("2023-09-30"), date("2022-09-30")],
            vec![
                LineItem {
                    name: "Total Assets".to_string(),
                    values: vec![Some(352_583_000_000.0), Some(352_755_000_000.0)],
                },
                LineItem {
                    name: "Basic EPS".to_string(),
                    values: vec![Some(6.16), None],
                },
            ],
        );

        let table = Table::from_statement(&statement);
        assert_eq!(table.headers, vec!["", "2023-09-30", "2022-09-30"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["Total Assets", "352583000000", "352755000000"],
                vec!["Basic EPS", "6.16", ""],
            ]
        );
    }
}
