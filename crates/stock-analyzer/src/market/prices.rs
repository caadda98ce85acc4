//! Historical price series and its text rendering

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One daily OHLCV row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Column selector for [`PriceSeries::to_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
    Volume,
}

/// Columns sent to the narrative analyzer as technical data
pub const TECHNICAL_COLUMNS: [PriceColumn; 2] = [PriceColumn::Open, PriceColumn::Close];

impl PriceColumn {
    pub const ALL: [PriceColumn; 5] = [
        PriceColumn::Open,
        PriceColumn::High,
        PriceColumn::Low,
        PriceColumn::Close,
        PriceColumn::Volume,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriceColumn::Open => "Open",
            PriceColumn::High => "High",
            PriceColumn::Low => "Low",
            PriceColumn::Close => "Close",
            PriceColumn::Volume => "Volume",
        }
    }

    /// Cell text for this column of `bar`
    pub fn format(&self, bar: &PriceBar) -> String {
        match self {
            PriceColumn::Open => format_price(bar.open),
            PriceColumn::High => format_price(bar.high),
            PriceColumn::Low => format_price(bar.low),
            PriceColumn::Close => format_price(bar.close),
            PriceColumn::Volume => bar.volume.to_string(),
        }
    }

    /// Cell text for this column over a whole series
    ///
    /// Prices share one precision per column: six decimals, with trailing
    /// zeros dropped while every cell still has one to drop, keeping at
    /// least one decimal (`9875.0`, `184.25`).
    pub fn format_column(&self, bars: &[PriceBar]) -> Vec<String> {
        let mut cells: Vec<String> = bars.iter().map(|bar| self.format(bar)).collect();
        if *self != PriceColumn::Volume {
            trim_shared_zeros(&mut cells);
        }
        cells
    }
}

impl fmt::Display for PriceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn format_price(value: f64) -> String {
    format!("{value:.6}")
}

fn trim_shared_zeros(cells: &mut [String]) {
    let trimmable =
        |cell: &String| cell.contains('.') && cell.ends_with('0') && !cell.ends_with(".0");
    while !cells.is_empty() && cells.iter().all(trimmable) {
        for cell in cells.iter_mut() {
            cell.pop();
        }
    }
}

/// Ordered daily bars for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn dates(&self) -> Vec<String> {
        self.bars.iter().map(|bar| bar.date.to_string()).collect()
    }

    /// Plain-text table of the selected columns, one row per date
    ///
    /// The layout is a date index column titled `Date` on its own line,
    /// followed by right-aligned value columns separated by two spaces:
    ///
    /// ```text
    ///                   Open       Close
    /// Date
    /// 2024-01-02  187.149994  185.639999
    /// ```
    pub fn to_text(&self, columns: &[PriceColumn]) -> String {
        const INDEX_NAME: &str = "Date";

        let cells: Vec<Vec<String>> = columns
            .iter()
            .map(|column| column.format_column(&self.bars))
            .collect();

        let index_width = self
            .bars
            .iter()
            .map(|bar| bar.date.to_string().len())
            .chain(std::iter::once(INDEX_NAME.len()))
            .max()
            .unwrap_or(INDEX_NAME.len());

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                cells[i]
                    .iter()
                    .map(String::len)
                    .chain(std::iter::once(column.label().len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.bars.len() + 2);

        let mut header = " ".repeat(index_width);
        for (column, width) in columns.iter().zip(&widths) {
            header.push_str(&format!("  {:>width$}", column.label()));
        }
        lines.push(header);

        let mut index_line = format!("{INDEX_NAME:<index_width$}");
        for width in &widths {
            index_line.push_str(&" ".repeat(width + 2));
        }
        lines.push(index_line);

        for (row, bar) in self.bars.iter().enumerate() {
            let mut line = format!("{:<index_width$}", bar.date.to_string());
            for (column, width) in cells.iter().zip(&widths) {
                line.push_str(&format!("  {:>width$}", column[row]));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}
