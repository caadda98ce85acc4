//! Dashboard presentation
//!
//! A [`DashboardView`] is built once from a [`DashboardReport`] and then handed
//! to either renderer: [`HtmlRenderer`] for the web page or
//! [`render_terminal`] for the CLI.

pub mod chart;
mod html;
mod table;
mod terminal;

pub use chart::Figure;
pub use html::{FormDefaults, HtmlRenderer};
pub use table::Table;
pub use terminal::render_terminal;

use crate::pipeline::DashboardReport;
use serde::Serialize;

pub const PAGE_TITLE: &str = "Stock Data Analyzer v1.1";
pub const REVENUE_SUBHEADER: &str = "Total Revenue per Quarter";
pub const REVENUE_NOTICE: &str =
    "Row 'Total Revenue' not found in the quarterly income statement.";

/// Region 1: the narrative beside the candlestick chart
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRegion {
    pub subheader: String,
    /// Model output, shown as raw HTML
    pub analysis: String,
    pub chart_subheader: String,
    pub candlestick: Figure,
}

/// One statement preceded by its metric header
#[derive(Debug, Clone, Serialize)]
pub struct StatementSection {
    pub label: String,
    pub value: String,
    pub table: Table,
}

/// Region 2: raw data
#[derive(Debug, Clone, Serialize)]
pub struct StockDataRegion {
    pub prices: Table,
    pub fundamentals: String,
    pub statements: Vec<StatementSection>,
}

#[derive(Debug, Clone, Serialize)]
pub enum RevenuePanel {
    Chart(Figure),
    Notice(String),
}

/// Region 3: quarterly revenue
#[derive(Debug, Clone, Serialize)]
pub struct FinancialRegion {
    pub subheader: String,
    pub revenue: RevenuePanel,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub symbol: String,
    pub analyze: AnalyzeRegion,
    pub stock_data: StockDataRegion,
    pub financial: FinancialRegion,
}

impl DashboardView {
    pub fn from_report(report: &DashboardReport) -> Self {
        let statements = report
            .statements
            .iter()
            .map(|statement| {
                let title = statement.title();
                StatementSection {
                    label: title.clone(),
                    value: title,
                    table: Table::from_statement(statement),
                }
            })
            .collect();

        let revenue = match report
            .statements
            .quarterly_income()
            .and_then(|s| s.total_revenue())
        {
            Some(series) => RevenuePanel::Chart(Figure::revenue_bars(&report.symbol, &series)),
            None => RevenuePanel::Notice(REVENUE_NOTICE.to_string()),
        };

        Self {
            title: PAGE_TITLE.to_string(),
            symbol: report.symbol.clone(),
            analyze: AnalyzeRegion {
                subheader: format!("Analysis for {}", report.symbol),
                analysis: report.analysis.clone(),
                chart_subheader: "Stock Data Graph".to_string(),
                candlestick: Figure::candlestick(&report.prices),
            },
            stock_data: StockDataRegion {
                prices: Table::from_price_series(&report.prices),
                fundamentals: report.fundamental_text.clone(),
                statements,
            },
            financial: FinancialRegion {
                subheader: REVENUE_SUBHEADER.to_string(),
                revenue,
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fundamentals;
    use crate::market::{
        DateRange, FinancialStatement, FinancialStatements, Frequency, LineItem, StatementKind,
    };
    use crate::pipeline::tests::{date, sample_info, sample_prices, sample_statement};

    pub(crate) fn sample_report(with_revenue: bool) -> DashboardReport {
        let prices = sample_prices("BBCA.JK");
        let summary = fundamentals::extract(&sample_info());
        let statements = FinancialStatements::LAYOUT.iter().map(|&(kind, frequency)| {
            if with_revenue {
                sample_statement(kind, frequency)
            } else {
                FinancialStatement::new(
                    kind,
                    frequency,
                    vec![date("2023-12-31")],
                    vec![LineItem {
                        name: "Net Income".to_string(),
                        values: vec![Some(1.0)],
                    }],
                )
            }
        });

        DashboardReport {
            symbol: "BBCA.JK".to_string(),
            range: DateRange::new(date("2024-01-01"), date("2024-01-04")),
            technical_data: prices.to_text(&crate::market::TECHNICAL_COLUMNS),
            prices,
            fundamental_text: fundamentals::format_fundamentals(&summary),
            fundamentals: summary,
            statements: FinancialStatements::from_statements(statements),
            analysis: "<b>Tren naik</b>".to_string(),
        }
    }

    #[test]
    fn test_view_regions() {
        let view = DashboardView::from_report(&sample_report(true));

        assert_eq!(view.title, "Stock Data Analyzer v1.1");
        assert_eq!(view.analyze.subheader, "Analysis for BBCA.JK");
        assert_eq!(view.analyze.analysis, "<b>Tren naik</b>");
        assert_eq!(
            view.analyze.candlestick.layout.title.text,
            "BBCA.JK Stock Candlestick Chart"
        );

        let labels: Vec<&str> = view
            .stock_data
            .statements
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Income Statement",
                "Quarterly Income Statement",
                "Balance Sheet",
                "Quarterly Balance Sheet",
                "Cash Flow Statement",
                "Quarterly Cash Flow Statement",
            ]
        );
        assert!(view.stock_data.statements.iter().all(|s| s.label == s.value));
    }

    #[test]
    fn test_revenue_chart_drops_gaps() {
        let view = DashboardView::from_report(&sample_report(true));
        let RevenuePanel::Chart(figure) = &view.financial.revenue else {
            panic!("expected a revenue chart");
        };

        assert_eq!(figure.layout.title.text, "BBCA.JK Total Revenue per Quarter");
        assert_eq!(
            figure.data,
            vec![chart::Trace::Bar {
                x: vec!["2023-12-31".to_string()],
                y: vec![119.575e9],
                name: "Total Revenue".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_revenue_row_gives_notice() {
        let view = DashboardView::from_report(&sample_report(false));
        assert!(matches!(
            &view.financial.revenue,
            RevenuePanel::Notice(text)
                if text == "Row 'Total Revenue' not found in the quarterly income statement."
        ));
    }

    #[test]
    fn test_other_statement_kinds_do_not_matter_for_revenue() {
        let mut report = sample_report(false);
        report.statements = FinancialStatements::from_statements(vec![sample_statement(
            StatementKind::Income,
            Frequency::Annual,
        )]);
        let view = DashboardView::from_report(&report);
        assert!(matches!(view.financial.revenue, RevenuePanel::Notice(_)));
    }
}
