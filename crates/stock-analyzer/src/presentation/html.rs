//! HTML page rendering with minijinja

use super::{DashboardView, PAGE_TITLE, RevenuePanel};
use crate::error::Result;
use crate::pipeline::DashboardRequest;
use chrono::{Local, NaiveDate};
use minijinja::{Environment, context};
use serde::Serialize;

pub const DEFAULT_SYMBOL: &str = "AAPL";

/// Values pre-filled in the sidebar form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormDefaults {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FormDefaults {
    /// `AAPL` from 2024-01-01 to today
    pub fn for_today() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            end: Local::now().date_naive(),
        }
    }

    pub fn from_request(request: &DashboardRequest) -> Self {
        Self {
            symbol: request.symbol.clone(),
            start: request.range.start,
            end: request.range.end,
        }
    }
}

/// Renders the index, dashboard and error pages
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("layout.html", include_str!("templates/layout.html"))?;
        env.add_template("index.html", include_str!("templates/index.html"))?;
        env.add_template("dashboard.html", include_str!("templates/dashboard.html"))?;
        env.add_template("error.html", include_str!("templates/error.html"))?;
        Ok(Self { env })
    }

    /// Empty dashboard with the sidebar form
    pub fn render_index(&self, form: &FormDefaults) -> Result<String> {
        let template = self.env.get_template("index.html")?;
        Ok(template.render(context! { title => PAGE_TITLE, form => form })?)
    }

    pub fn render_dashboard(&self, view: &DashboardView, form: &FormDefaults) -> Result<String> {
        let candlestick_json = view.analyze.candlestick.to_json()?;
        let (revenue_json, revenue_notice) = match &view.financial.revenue {
            RevenuePanel::Chart(figure) => (Some(figure.to_json()?), None),
            RevenuePanel::Notice(text) => (None, Some(text.as_str())),
        };

        let template = self.env.get_template("dashboard.html")?;
        Ok(template.render(context! {
            title => view.title,
            form => form,
            view => view,
            candlestick_json => candlestick_json,
            revenue_json => revenue_json,
            revenue_notice => revenue_notice,
        })?)
    }

    pub fn render_error(&self, heading: &str, message: &str, form: &FormDefaults) -> Result<String> {
        let template = self.env.get_template("error.html")?;
        Ok(template.render(context! {
            title => PAGE_TITLE,
            form => form,
            heading => heading,
            message => message,
        })?)
    }
}
