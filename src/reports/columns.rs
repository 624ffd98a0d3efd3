use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

use crate::models::{ActionItem, AgendaItem, Meeting, Status};

/// Days from 0001-01-01 to 1970-01-01; unset dates sort as this instant.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Typed cell value; drives both rendering and sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Date(Option<NaiveDate>),
    Number(usize),
    Text(String),
    Status(Status),
}

impl Value {
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Date(a), Value::Date(b)) => epoch_days(*a).cmp(&epoch_days(*b)),
            (Value::Number(a), Value::Number(b)) => a.cmp(b),
            _ => compare_text(&self.sort_text(), &other.sort_text()),
        }
    }

    fn sort_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Status(s) => s.label().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Date(d) => d.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

fn epoch_days(date: Option<NaiveDate>) -> i32 {
    date.map_or(0, |d| d.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
}

/// Case- and accent-insensitive comparison, falling back to the lowercase
/// text so accented and plain spellings still order deterministically.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let (la, lb) = (a.to_lowercase(), b.to_lowercase());
    fold_accents(&la).cmp(&fold_accents(&lb)).then_with(|| la.cmp(&lb))
}

fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// One rendered table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    /// Status badge class, when the cell shows a status.
    pub badge: Option<&'static str>,
    pub numeric: bool,
}

/// Report column: stable key, header label, whether it is on by default,
/// the text shown for a blank value, and how to read the value.
pub struct Column<T> {
    pub key: &'static str,
    pub label: &'static str,
    pub default: bool,
    pub sortable: bool,
    pub blank: &'static str,
    pub value: fn(&T) -> Value,
}

impl<T> Column<T> {
    fn new(key: &'static str, label: &'static str, value: fn(&T) -> Value) -> Self {
        Self { key, label, default: true, sortable: false, blank: "", value }
    }

    fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    fn off_by_default(mut self) -> Self {
        self.default = false;
        self
    }

    fn blank(mut self, blank: &'static str) -> Self {
        self.blank = blank;
        self
    }

    pub fn cell(&self, record: &T) -> Cell {
        match (self.value)(record) {
            Value::Date(Some(d)) => Cell::plain(d.format("%d/%m/%Y").to_string()),
            Value::Date(None) => Cell::plain(self.blank.to_string()),
            Value::Number(n) => Cell { text: n.to_string(), badge: None, numeric: true },
            Value::Text(s) if s.trim().is_empty() => Cell::plain(self.blank.to_string()),
            Value::Text(s) => Cell::plain(s),
            Value::Status(s) => Cell { text: s.label().to_string(), badge: Some(s.css_class()), numeric: false },
        }
    }
}

impl Cell {
    fn plain(text: String) -> Self {
        Self { text, badge: None, numeric: false }
    }
}

pub fn meeting_columns() -> Vec<Column<Meeting>> {
    vec![
        Column::new("date", "Data", |m: &Meeting| Value::Date(Some(m.date))).sortable(),
        Column::new("time", "Hora", |m: &Meeting| Value::Text(m.time.clone().unwrap_or_default()))
            .blank("Não informado"),
        Column::new("territory", "Território", |m: &Meeting| Value::Text(m.territory.clone())).sortable(),
        Column::new("facilitator", "Secretário", |m: &Meeting| Value::Text(m.facilitator.clone())).sortable(),
        Column::new("agenda_items", "Pautas", |m: &Meeting| Value::Number(m.total_agenda_items)).sortable(),
        Column::new("actions", "Apontamentos", |m: &Meeting| Value::Number(m.total_actions)).sortable(),
    ]
}

pub fn agenda_columns() -> Vec<Column<AgendaItem>> {
    vec![
        Column::new("description", "Descrição da Pauta", |a: &AgendaItem| Value::Text(a.description.clone()))
            .sortable(),
        Column::new("territory", "Território", |a: &AgendaItem| Value::Text(a.territory.clone())).sortable(),
        Column::new("meeting_date", "Data Reunião", |a: &AgendaItem| Value::Date(Some(a.meeting_date)))
            .sortable(),
        Column::new("total", "Total", |a: &AgendaItem| Value::Number(a.total_actions)).sortable(),
        Column::new("pending", "Pendentes", |a: &AgendaItem| Value::Number(a.pending_count)).sortable(),
        Column::new("in_progress", "Em Andamento", |a: &AgendaItem| Value::Number(a.in_progress_count)),
        Column::new("done", "Concluídos", |a: &AgendaItem| Value::Number(a.done_count)),
    ]
}

pub fn action_columns() -> Vec<Column<ActionItem>> {
    vec![
        Column::new("agenda", "Pauta", |a: &ActionItem| Value::Text(a.agenda_item_description.clone()))
            .sortable(),
        Column::new("problem", "Problema", |a: &ActionItem| Value::Text(a.problem.clone())),
        Column::new("description", "Descrição", |a: &ActionItem| Value::Text(a.description.clone()))
            .blank("N/A"),
        Column::new("territory", "Território", |a: &ActionItem| Value::Text(a.territory.clone())).sortable(),
        Column::new("responsible", "Responsáveis", |a: &ActionItem| Value::Text(a.responsible_parties.clone()))
            .sortable(),
        Column::new("deadline", "Prazo", |a: &ActionItem| Value::Date(a.deadline))
            .sortable()
            .blank("Sem prazo"),
        Column::new("status", "Status", |a: &ActionItem| Value::Status(a.status)).sortable(),
        Column::new("solution", "Solução", |a: &ActionItem| Value::Text(a.solution.clone()))
            .off_by_default()
            .blank("Sem solução"),
    ]
}
