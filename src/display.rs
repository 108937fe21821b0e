//! Plain-text rendering of the expense list view.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::config;
use crate::models::{ExpenseRecord, RecordDate};
use crate::state::ViewState;

pub const TITLE: &str = "Expense List";
pub const LOADING: &str = "Loading expenses...";
pub const EMPTY: &str = "No expenses found";
pub const INVALID_DATE: &str = "Invalid Date";

const HEADERS: [&str; 5] = ["Id", "Amount", "Category", "Description", "Date"];

/// Amount prefixed with the currency glyph, e.g. `₹ 12.5`.
pub fn format_amount(amount: f64) -> String {
    format!("{} {}", config::CURRENCY_GLYPH, amount)
}

/// Short `M/D/YYYY` date in UTC, or `Invalid Date` if the value cannot be
/// parsed.
pub fn format_date(date: &RecordDate) -> String {
    parse_date(date)
        .map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

fn parse_date(date: &RecordDate) -> Option<NaiveDate> {
    match date {
        RecordDate::EpochMillis(ms) => {
            DateTime::<Utc>::from_timestamp_millis(*ms).map(|d| d.date_naive())
        }
        RecordDate::Iso(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc).date_naive());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(dt.date());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
        }
    }
}

fn row(record: &ExpenseRecord) -> [String; 5] {
    [
        record.id.clone(),
        format_amount(record.amount),
        record.category.clone(),
        record.description.clone(),
        format_date(&record.date),
    ]
}

/// Render records as an aligned text table with a header row.
pub fn render_table(records: &[ExpenseRecord]) -> String {
    let rows: Vec<[String; 5]> = records.iter().map(row).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: &[&str]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| {
                let pad = w - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    };

    push_line(&HEADERS[..]);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    push_line(&rule[..]);
    for r in &rows {
        let cells: Vec<&str> = r.iter().map(String::as_str).collect();
        push_line(&cells[..]);
    }
    out
}

/// Render the whole view: title, error line if any, then the loading
/// placeholder, the table, or the empty placeholder.
pub fn render_view(state: &ViewState) -> String {
    let mut out = format!("{}\n\n", TITLE);
    if let Some(error) = state.error() {
        out.push_str(error);
        out.push('\n');
    }
    if state.is_loading() {
        out.push_str(LOADING);
        out.push('\n');
    } else if state.is_empty() {
        out.push_str(EMPTY);
        out.push('\n');
    } else {
        out.push_str(&render_table(state.records()));
    }
    out
}
