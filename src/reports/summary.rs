use crate::metrics::{self, MeetingMetrics, StatusCounts};
use crate::models::{ActionItem, AgendaItem, Meeting, Status};

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryItem {
    pub label: String,
    pub value: String,
    pub percentage: Option<u32>,
    /// Status class used to colour the value.
    pub tone: Option<&'static str>,
}

impl SummaryItem {
    fn total(label: &str, value: impl ToString) -> Self {
        Self { label: label.to_string(), value: value.to_string(), percentage: None, tone: None }
    }
}

fn status_items(counts: StatusCounts) -> impl Iterator<Item = SummaryItem> {
    let total = counts.total();
    Status::ALL.into_iter().map(move |status| SummaryItem {
        label: plural_label(status).to_string(),
        value: counts.get(status).to_string(),
        percentage: Some(metrics::percentage(counts.get(status), total)),
        tone: Some(status.css_class()),
    })
}

fn plural_label(status: Status) -> &'static str {
    match status {
        Status::Pending => "Pendentes",
        Status::InProgress => "Em Andamento",
        Status::Done => "Concluídos",
    }
}

pub fn meetings(records: &[Meeting]) -> Vec<SummaryItem> {
    let m = MeetingMetrics::compute(records);
    vec![
        SummaryItem::total("Total de Reuniões", m.total),
        SummaryItem::total("Total de Pautas", m.agenda_items),
        SummaryItem::total("Total de Apontamentos", m.actions),
        SummaryItem::total("Territórios Ativos", m.territories),
    ]
}

pub fn agenda_items(records: &[AgendaItem]) -> Vec<SummaryItem> {
    let counts = metrics::tally_all(records);
    let mut items = vec![
        SummaryItem::total("Total de Pautas", records.len()),
        SummaryItem::total("Total de Apontamentos", counts.total()),
    ];
    items.extend(status_items(counts));
    items
}

pub fn action_items(records: &[ActionItem]) -> Vec<SummaryItem> {
    let counts = metrics::tally_all(records);
    let mut items = vec![SummaryItem::total("Total de Apontamentos", records.len())];
    items.extend(status_items(counts));
    items.push(SummaryItem {
        label: "Taxa de Conclusão".to_string(),
        value: format!("{}%", counts.completion_rate()),
        percentage: None,
        tone: Some(Status::Done.css_class()),
    });
    items
}
