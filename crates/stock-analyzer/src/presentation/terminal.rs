//! Plain terminal report for the CLI

use super::{DashboardView, RevenuePanel, Table, chart::Trace};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table as TextTable};
use std::fmt::Write;

fn text_table(table: &Table) -> TextTable {
    let mut out = TextTable::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(table.headers.clone());
    for row in &table.rows {
        out.add_row(row.clone());
    }
    out
}

fn heading(out: &mut String, text: &str) {
    let _ = writeln!(out, "\n== {text} ==\n");
}

/// Render all three regions one after another
pub fn render_terminal(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);

    heading(&mut out, &view.analyze.subheader);
    let _ = writeln!(out, "{}", view.analyze.analysis);

    heading(&mut out, "Stock Data");
    let _ = writeln!(out, "{}", text_table(&view.stock_data.prices));

    heading(&mut out, "Stock Information");
    let _ = writeln!(out, "{}", view.stock_data.fundamentals);

    heading(&mut out, "Financial Statements");
    for section in &view.stock_data.statements {
        let _ = writeln!(out, "{}: {}", section.label, section.value);
        if section.table.is_empty() {
            let _ = writeln!(out, "(empty)\n");
        } else {
            let _ = writeln!(out, "{}\n", text_table(&section.table));
        }
    }

    heading(&mut out, &view.financial.subheader);
    match &view.financial.revenue {
        RevenuePanel::Chart(figure) => {
            let _ = writeln!(out, "{}", figure.layout.title.text);
            for trace in &figure.data {
                if let Trace::Bar { x, y, .. } = trace {
                    let table = Table {
                        headers: vec![
                            figure.layout.xaxis.title.text.clone(),
                            figure.layout.yaxis.title.text.clone(),
                        ],
                        rows: x
                            .iter()
                            .zip(y)
                            .map(|(quarter, amount)| vec![quarter.clone(), amount.to_string()])
                            .collect(),
                    };
                    let _ = writeln!(out, "{}", text_table(&table));
                }
            }
        }
        RevenuePanel::Notice(text) => {
            let _ = writeln!(out, "{text}");
        }
    }

    out
}
