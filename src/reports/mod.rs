//! Printable report generation for the three record kinds.
//!
//! A report is filtered, sorted, projected onto the selected columns and
//! rendered to one self-contained HTML page, then handed to an output target.

use std::collections::BTreeSet;
use std::fmt;

use askama::Template;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::filters::{self, FilterSpec, Filterable};
use crate::models::{ActionItem, AgendaItem, Meeting, Status};

pub mod columns;
pub mod render;
pub mod sort;
pub mod summary;

pub use columns::{Cell, Column};
pub use render::ReportDocument;
pub use sort::{SortDir, SortSpec};
pub use summary::SummaryItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Meetings,
    AgendaItems,
    ActionItems,
}

impl ReportKind {
    pub fn key(self) -> &'static str {
        match self {
            ReportKind::Meetings => "meetings",
            ReportKind::AgendaItems => "agenda-items",
            ReportKind::ActionItems => "action-items",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        [ReportKind::Meetings, ReportKind::AgendaItems, ReportKind::ActionItems]
            .into_iter()
            .find(|k| k.key() == key)
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Meetings => "Relatório de Reuniões",
            ReportKind::AgendaItems => "Relatório de Pautas",
            ReportKind::ActionItems => "Relatório de Apontamentos",
        }
    }

    pub fn table_title(self) -> &'static str {
        match self {
            ReportKind::Meetings => "Detalhamento das Reuniões",
            ReportKind::AgendaItems => "Detalhamento das Pautas",
            ReportKind::ActionItems => "Detalhamento dos Apontamentos",
        }
    }

    /// Newest first on the kind's main date.
    pub fn default_sort(self) -> SortSpec {
        let field = match self {
            ReportKind::Meetings => "date",
            ReportKind::AgendaItems => "meeting_date",
            ReportKind::ActionItems => "deadline",
        };
        SortSpec::new(field, SortDir::Desc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub include_header: bool,
    pub include_summary: bool,
    pub include_footer: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self { include_header: true, include_summary: true, include_footer: true }
    }
}

/// Report-only filter: one territory, a date range, and for action items
/// one status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub territory: Option<String>,
    #[serde(default, deserialize_with = "filters::optional_date")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "filters::optional_date")]
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl ReportFilter {
    /// The equivalent shared filter spec. The status is only kept for action items.
    pub fn to_spec(&self, kind: ReportKind) -> FilterSpec {
        FilterSpec {
            territories: self.territory.iter().filter(|t| !t.is_empty()).cloned().collect(),
            statuses: match (kind, self.status) {
                (ReportKind::ActionItems, Some(s)) => BTreeSet::from([s]),
                _ => BTreeSet::new(),
            },
            date_from: self.date_from,
            date_to: self.date_to,
            search: String::new(),
        }
    }
}

/// User choices for a custom report. Missing parts fall back to the kind's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub filter: ReportFilter,
    /// Column keys to include; `None` selects the default columns.
    pub fields: Option<BTreeSet<String>>,
    pub sort: Option<SortSpec>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportMode {
    /// Everything given, unfiltered and unsorted, with default columns.
    Quick,
    Custom(ReportConfig),
}

impl ReportMode {
    pub fn is_quick(&self) -> bool {
        matches!(self, ReportMode::Quick)
    }
}

/// What happens to a rendered report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    #[default]
    Print,
    Download,
    /// Rendered for display only; no output target is involved.
    Preview,
}

/// Title and description of a user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(title: &str, description: impl Into<String>) -> Self {
        Self { title: title.to_string(), description: description.into() }
    }
}

#[derive(Debug)]
pub enum ReportError {
    /// Nothing left to report after filtering.
    EmptyResult { quick: bool, delivery: Delivery },
    /// The output target refused to open.
    TargetUnavailable { delivery: Delivery },
    Render(askama::Error),
}

impl ReportError {
    pub fn notice(&self) -> Notice {
        match self {
            ReportError::EmptyResult { quick: true, .. } => {
                Notice::new("Nenhum dado disponível", "Não há dados para gerar o relatório.")
            }
            ReportError::EmptyResult { delivery, .. } => {
                let title = match delivery {
                    Delivery::Print => "Nenhum dado para imprimir",
                    Delivery::Download => "Nenhum dado para baixar",
                    Delivery::Preview => "Nenhum dado para exibir",
                };
                Notice::new(title, "Ajuste os filtros para incluir dados no relatório.")
            }
            ReportError::TargetUnavailable { delivery } => {
                let title = match delivery {
                    Delivery::Download => "Erro ao abrir janela",
                    _ => "Erro ao abrir janela de impressão",
                };
                Notice::new(title, "Verifique se o bloqueador de pop-ups está desabilitado.")
            }
            ReportError::Render(_) => {
                Notice::new("Erro ao gerar relatório", "Não foi possível montar o documento.")
            }
        }
    }

    /// True for conditions the user can fix by changing the request.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ReportError::Render(_))
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::EmptyResult { quick, .. } => {
                write!(f, "No records to report (quick mode: {quick})")
            }
            ReportError::TargetUnavailable { .. } => write!(f, "Report output target unavailable"),
            ReportError::Render(e) => write!(f, "Report render error: {e}"),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<askama::Error> for ReportError {
    fn from(e: askama::Error) -> Self {
        ReportError::Render(e)
    }
}

/// Destination for a rendered report (a print window, a download buffer).
pub trait OutputTarget {
    /// Prepare a fresh document. Returns false when the target cannot be opened.
    fn open(&mut self, title: &str) -> bool;
    fn write_document(&mut self, html: &str);
}

/// In-memory target; can be made unavailable to mimic a blocked window.
#[derive(Debug, Default)]
pub struct BufferTarget {
    pub blocked: bool,
    pub title: Option<String>,
    pub html: String,
}

impl BufferTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocked() -> Self {
        Self { blocked: true, ..Self::default() }
    }
}

impl OutputTarget for BufferTarget {
    fn open(&mut self, title: &str) -> bool {
        if self.blocked {
            return false;
        }
        self.title = Some(title.to_string());
        self.html.clear();
        true
    }

    fn write_document(&mut self, html: &str) {
        self.html.push_str(html);
    }
}

/// Record types a report can be built from.
pub trait ReportRecord: Filterable + Clone {
    const KIND: ReportKind;

    fn columns() -> Vec<Column<Self>>;

    fn summary(records: &[Self]) -> Vec<SummaryItem>;
}

impl ReportRecord for Meeting {
    const KIND: ReportKind = ReportKind::Meetings;

    fn columns() -> Vec<Column<Self>> {
        columns::meeting_columns()
    }

    fn summary(records: &[Self]) -> Vec<SummaryItem> {
        summary::meetings(records)
    }
}

impl ReportRecord for AgendaItem {
    const KIND: ReportKind = ReportKind::AgendaItems;

    fn columns() -> Vec<Column<Self>> {
        columns::agenda_columns()
    }

    fn summary(records: &[Self]) -> Vec<SummaryItem> {
        summary::agenda_items(records)
    }
}

impl ReportRecord for ActionItem {
    const KIND: ReportKind = ReportKind::ActionItems;

    fn columns() -> Vec<Column<Self>> {
        columns::action_columns()
    }

    fn summary(records: &[Self]) -> Vec<SummaryItem> {
        summary::action_items(records)
    }
}

/// Filter, sort and project `records` into a document.
///
/// Refuses with `EmptyResult` when no record survives the filter.
pub fn build<T: ReportRecord>(
    records: &[T],
    mode: &ReportMode,
    delivery: Delivery,
    generated_at: NaiveDateTime,
) -> Result<ReportDocument, ReportError> {
    let all_columns = T::columns();
    let (rows, selected, layout, badges) = match mode {
        ReportMode::Quick => {
            let selected: Vec<&Column<T>> = all_columns.iter().filter(|c| c.default).collect();
            (records.to_vec(), selected, Layout::default(), Vec::new())
        }
        ReportMode::Custom(config) => {
            let spec = config.filter.to_spec(T::KIND);
            let mut rows = filters::filter(records, &spec);
            let sort = config.sort.clone().unwrap_or_else(|| T::KIND.default_sort());
            sort::sort_records(&mut rows, &all_columns, &sort);
            let selected: Vec<&Column<T>> = all_columns
                .iter()
                .filter(|c| match &config.fields {
                    Some(fields) => fields.contains(c.key),
                    None => c.default,
                })
                .collect();
            let f = &config.filter;
            let badges = render::badges(
                f.territory.as_deref().filter(|t| !t.is_empty()),
                f.date_from,
                f.date_to,
            );
            (rows, selected, config.layout, badges)
        }
    };

    if rows.is_empty() {
        log::warn!("Refusing empty {} report", T::KIND.key());
        return Err(ReportError::EmptyResult { quick: mode.is_quick(), delivery });
    }

    let (headers, cells) = render::project(&rows, &selected);
    Ok(ReportDocument {
        kind: T::KIND,
        title: T::KIND.title(),
        table_title: T::KIND.table_title(),
        generated_at: render::timestamp(generated_at),
        badges,
        layout,
        summary: T::summary(&rows),
        headers,
        rows: cells,
    })
}

/// Result of a successful report run.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub html: String,
    pub record_count: usize,
    /// `None` for previews.
    pub notice: Option<Notice>,
}

/// Build, render and deliver a report to `target`.
///
/// Previews skip the target entirely.
pub fn generate<T: ReportRecord>(
    records: &[T],
    mode: &ReportMode,
    delivery: Delivery,
    target: &mut dyn OutputTarget,
) -> Result<GeneratedReport, ReportError> {
    generate_at(records, mode, delivery, target, Local::now().naive_local())
}

pub fn generate_at<T: ReportRecord>(
    records: &[T],
    mode: &ReportMode,
    delivery: Delivery,
    target: &mut dyn OutputTarget,
    generated_at: NaiveDateTime,
) -> Result<GeneratedReport, ReportError> {
    let doc = build(records, mode, delivery, generated_at)?;
    let html = doc.render()?;
    let record_count = doc.record_count();

    if delivery == Delivery::Preview {
        return Ok(GeneratedReport { html, record_count, notice: None });
    }

    if !target.open(doc.title) {
        log::warn!("Output target unavailable for {} report", T::KIND.key());
        return Err(ReportError::TargetUnavailable { delivery });
    }
    target.write_document(&html);
    log::info!("Generated {} report with {record_count} records", T::KIND.key());

    Ok(GeneratedReport { html, record_count, notice: Some(success_notice(mode, delivery, record_count)) })
}

fn success_notice(mode: &ReportMode, delivery: Delivery, count: usize) -> Notice {
    match (mode, delivery) {
        (_, Delivery::Download) => {
            Notice::new("Pronto para salvar", "Use Ctrl+P ou Cmd+P e escolha 'Salvar como PDF'.")
        }
        (ReportMode::Quick, _) => Notice::new(
            "Relatório rápido gerado",
            format!("{count} registro(s) incluído(s) no relatório completo."),
        ),
        (ReportMode::Custom(_), _) => Notice::new(
            "Relatório gerado com sucesso",
            format!("{count} registro(s) incluído(s) no relatório."),
        ),
    }
}
