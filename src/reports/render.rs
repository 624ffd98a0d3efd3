use askama::Template;
use chrono::{NaiveDate, NaiveDateTime};

use super::columns::{Cell, Column};
use super::summary::SummaryItem;
use super::{Layout, ReportKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub label: &'static str,
    pub numeric: bool,
}

/// A fully prepared report, ready to be rendered to a standalone HTML page.
#[derive(Template, Debug, Clone)]
#[template(path = "report.html")]
pub struct ReportDocument {
    pub kind: ReportKind,
    pub title: &'static str,
    pub table_title: &'static str,
    pub generated_at: String,
    pub badges: Vec<String>,
    pub layout: Layout,
    pub summary: Vec<SummaryItem>,
    pub headers: Vec<Header>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportDocument {
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }
}

pub(crate) fn project<T>(records: &[T], columns: &[&Column<T>]) -> (Vec<Header>, Vec<Vec<Cell>>) {
    let rows: Vec<Vec<Cell>> = records
        .iter()
        .map(|r| columns.iter().map(|c| c.cell(r)).collect())
        .collect();
    let headers = columns
        .iter()
        .enumerate()
        .map(|(i, c)| Header {
            label: c.label,
            numeric: rows.first().is_some_and(|row| row[i].numeric),
        })
        .collect();
    (headers, rows)
}

pub(crate) fn timestamp(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y às %H:%M").to_string()
}

/// Header badges describing the territory and period the report covers.
pub(crate) fn badges(
    territory: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(t) = territory {
        out.push(format!("Território: {t}"));
    }
    if from.is_some() || to.is_some() {
        let fmt = |d: NaiveDate| d.format("%d/%m/%Y").to_string();
        out.push(format!(
            "Período: {} até {}",
            from.map(fmt).unwrap_or_else(|| "Início".to_string()),
            to.map(fmt).unwrap_or_else(|| "Atual".to_string()),
        ));
    }
    out
}
