//! Plotly figure descriptions
//!
//! Figures serialize to the `{data, layout}` JSON that `Plotly.newPlot`
//! accepts.

use crate::error::Result;
use crate::market::{PriceBar, PriceSeries, RevenueSeries};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick {
        x: Vec<String>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Bar {
        x: Vec<String>,
        y: Vec<f64>,
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

impl Layout {
    fn new(title: impl Into<String>, x: &str, y: &str) -> Self {
        Self {
            title: Title::new(title),
            xaxis: Axis { title: Title::new(x) },
            yaxis: Axis { title: Title::new(y) },
        }
    }
}

impl Figure {
    /// Daily OHLC candlesticks
    pub fn candlestick(series: &PriceSeries) -> Self {
        let column = |f: fn(&PriceBar) -> f64| -> Vec<f64> {
            series.bars.iter().map(f).collect()
        };

        Self {
            data: vec![Trace::Candlestick {
                x: series.dates(),
                open: column(|b| b.open),
                high: column(|b| b.high),
                low: column(|b| b.low),
                close: column(|b| b.close),
            }],
            layout: Layout::new(
                format!("{} Stock Candlestick Chart", series.symbol),
                "Date",
                "Price (IDR)",
            ),
        }
    }

    /// Revenue bars, one per reported quarter
    pub fn revenue_bars(symbol: &str, revenue: &RevenueSeries) -> Self {
        Self {
            data: vec![Trace::Bar {
                x: revenue.periods(),
                y: revenue.values(),
                name: "Total Revenue".to_string(),
            }],
            layout: Layout::new(
                format!("{symbol} Total Revenue per Quarter"),
                "Quarter",
                "Amount (IDR)",
            ),
        }
    }

    /// JSON safe to embed inside a `<script>` element
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?.replace("</", "<\\/"))
    }
}
