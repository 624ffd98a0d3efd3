//! Flattens nested backing-store rows into canonical records.
//!
//! Nothing in here fails: gaps in the join resolve to placeholder values.

use std::collections::HashMap;

use crate::models::agenda_item::territory_label;
use crate::models::meeting::{RawAction, RawMeeting};
use crate::models::{ActionItem, AgendaItem, Meeting, Status};

pub const NO_TERRITORY: &str = "Sem território";
pub const NO_AGENDA: &str = "Sem pauta";
pub const NO_RESPONSIBLE: &str = "Sem responsável";
pub const NO_FACILITATOR: &str = "Não informado";

/// Collision rule applied when two records share a dedup key.
pub trait Merge: Sized {
    fn merge(&mut self, other: Self);
}

/// Later meeting wins; on equal dates the first-seen copy stays.
impl Merge for ActionItem {
    fn merge(&mut self, other: Self) {
        if other.meeting_date > self.meeting_date {
            *self = other;
        }
    }
}

/// Counts add up, territories union, the most recent meeting date is kept.
/// Id and description stay those of the first-seen row.
impl Merge for AgendaItem {
    fn merge(&mut self, other: Self) {
        self.total_actions += other.total_actions;
        self.pending_count += other.pending_count;
        self.in_progress_count += other.in_progress_count;
        self.done_count += other.done_count;
        for t in other.territories {
            if !self.territories.contains(&t) {
                self.territories.push(t);
            }
        }
        if other.meeting_date > self.meeting_date {
            self.meeting_date = other.meeting_date;
        }
        self.territory = territory_label(&self.territories);
    }
}

/// Collapse records sharing `key`, keeping first-seen order of keys.
pub fn dedup<T, K>(records: Vec<T>, key: K) -> Vec<T>
where
    T: Merge,
    K: Fn(&T) -> String,
{
    let mut out: Vec<T> = Vec::with_capacity(records.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for record in records {
        let k = key(&record);
        match index.get(&k) {
            Some(&i) => out[i].merge(record),
            None => {
                index.insert(k, out.len());
                out.push(record);
            }
        }
    }
    out
}

/// Dedup key: the backing store's row id.
pub fn by_id(item: &ActionItem) -> String {
    item.id.clone()
}

/// Dedup key: trimmed, lowercased description.
pub fn by_normalized_description(item: &AgendaItem) -> String {
    item.description.trim().to_lowercase()
}

fn territory_of(meeting: &RawMeeting) -> String {
    non_empty(meeting.territory.as_deref()).unwrap_or(NO_TERRITORY).to_string()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

fn responsible_parties(action: &RawAction) -> String {
    let names: Vec<&str> = action
        .responsible
        .iter()
        .filter_map(|n| non_empty(n.as_deref()))
        .collect();
    if names.is_empty() {
        NO_RESPONSIBLE.to_string()
    } else {
        names.join(", ")
    }
}

fn raw_status(action: &RawAction) -> Status {
    Status::normalize(action.status.as_deref().unwrap_or(""))
}

/// One `Meeting` per raw meeting, in fetch order.
pub fn meetings(raw: &[RawMeeting]) -> Vec<Meeting> {
    raw.iter()
        .map(|m| Meeting {
            id: m.id.to_string(),
            territory: territory_of(m),
            date: m.date,
            time: non_empty(m.time.as_deref()).map(str::to_string),
            facilitator: non_empty(m.facilitator.as_deref())
                .unwrap_or(NO_FACILITATOR)
                .to_string(),
            total_agenda_items: m.agenda_items.len(),
            total_actions: m.agenda_items.iter().map(|a| a.actions.len()).sum(),
        })
        .collect()
}

/// Every action path in the tree, parents' territory and date carried down.
/// Duplicates are kept; see [`action_items`].
pub fn flatten_actions(raw: &[RawMeeting]) -> Vec<ActionItem> {
    let mut out = Vec::new();
    for meeting in raw {
        let territory = territory_of(meeting);
        for agenda in &meeting.agenda_items {
            let agenda_description = non_empty(agenda.description.as_deref())
                .unwrap_or(NO_AGENDA)
                .to_string();
            for action in &agenda.actions {
                out.push(ActionItem {
                    id: action.id.to_string(),
                    meeting_date: meeting.date,
                    agenda_item_description: agenda_description.clone(),
                    problem: action.problem.clone().unwrap_or_default(),
                    description: action.description.clone().unwrap_or_default(),
                    solution: action.solution.clone().unwrap_or_default(),
                    responsible_parties: responsible_parties(action),
                    territory: territory.clone(),
                    deadline: action.deadline,
                    status: raw_status(action),
                });
            }
        }
    }
    out
}

/// One agenda item per agenda row, counts computed from its actions.
pub fn flatten_agenda_items(raw: &[RawMeeting]) -> Vec<AgendaItem> {
    let mut out = Vec::new();
    for meeting in raw {
        let territory = territory_of(meeting);
        for agenda in &meeting.agenda_items {
            let mut item = AgendaItem {
                id: agenda.id.to_string(),
                description: non_empty(agenda.description.as_deref())
                    .unwrap_or(NO_AGENDA)
                    .to_string(),
                territory: territory.clone(),
                territories: vec![territory.clone()],
                meeting_date: meeting.date,
                total_actions: 0,
                pending_count: 0,
                in_progress_count: 0,
                done_count: 0,
            };
            for action in &agenda.actions {
                item.add_action(raw_status(action));
            }
            out.push(item);
        }
    }
    out
}

/// Action items deduplicated by id.
pub fn action_items(raw: &[RawMeeting]) -> Vec<ActionItem> {
    dedup(flatten_actions(raw), by_id)
}

/// Cross-meeting agenda rollup deduplicated by normalized description.
pub fn agenda_rollup(raw: &[RawMeeting]) -> Vec<AgendaItem> {
    dedup(flatten_agenda_items(raw), by_normalized_description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::meeting::RawAgendaItem;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn action(id: i64, status: &str) -> RawAction {
        RawAction { id, status: Some(status.into()), ..Default::default() }
    }

    fn meeting(id: i64, territory: &str, date: &str, agenda: Vec<RawAgendaItem>) -> RawMeeting {
        RawMeeting {
            id,
            territory: Some(territory.into()),
            date: d(date),
            agenda_items: agenda,
            ..Default::default()
        }
    }

    fn agenda(id: i64, desc: &str, actions: Vec<RawAction>) -> RawAgendaItem {
        RawAgendaItem { id, description: Some(desc.into()), actions }
    }

    #[test]
    fn placeholders_fill_missing_join_values() {
        let raw = vec![RawMeeting {
            id: 1,
            date: d("2025-01-10"),
            agenda_items: vec![RawAgendaItem {
                id: 5,
                description: None,
                actions: vec![RawAction {
                    id: 9,
                    responsible: vec![None, Some("  ".into())],
                    ..Default::default()
                }],
            }],
            ..Default::default()
        }];
        let items = flatten_actions(&raw);
        assert_eq!(items.len(), 1);
        let a = &items[0];
        assert_eq!(a.territory, NO_TERRITORY);
        assert_eq!(a.agenda_item_description, NO_AGENDA);
        assert_eq!(a.responsible_parties, NO_RESPONSIBLE);
        assert_eq!(a.solution, "");
        assert_eq!(a.deadline, None);
        assert_eq!(a.status, Status::Pending);

        let m = &meetings(&raw)[0];
        assert_eq!(m.facilitator, NO_FACILITATOR);
        assert_eq!(m.time, None);
    }

    #[test]
    fn responsible_names_joined_with_comma() {
        let mut a = action(1, "Em andamento");
        a.responsible = vec![Some("Ana".into()), None, Some("Bruno".into())];
        let raw = vec![meeting(1, "Norte", "2025-02-01", vec![agenda(1, "x", vec![a])])];
        let items = flatten_actions(&raw);
        assert_eq!(items[0].responsible_parties, "Ana, Bruno");
        assert_eq!(items[0].status, Status::InProgress);
    }

    #[test]
    fn meeting_counts_children() {
        let raw = vec![meeting(
            1,
            "Norte",
            "2025-02-01",
            vec![
                agenda(1, "a", vec![action(1, ""), action(2, "")]),
                agenda(2, "b", vec![action(3, "")]),
                agenda(3, "c", vec![]),
            ],
        )];
        let m = &meetings(&raw)[0];
        assert_eq!(m.total_agenda_items, 3);
        assert_eq!(m.total_actions, 3);
    }

    #[test]
    fn action_dedup_keeps_most_recent_meeting() {
        let raw = vec![
            meeting(1, "Norte", "2025-01-01", vec![agenda(1, "old", vec![action(7, "Pendente")])]),
            meeting(2, "Sul", "2025-03-01", vec![agenda(2, "new", vec![action(7, "Concluído")])]),
            meeting(3, "Leste", "2025-02-01", vec![agenda(3, "mid", vec![action(7, "Pendente")])]),
        ];
        let items = action_items(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].meeting_date, d("2025-03-01"));
        assert_eq!(items[0].territory, "Sul");
        assert_eq!(items[0].status, Status::Done);
    }

    #[test]
    fn action_dedup_tie_keeps_first_seen() {
        let raw = vec![
            meeting(1, "Norte", "2025-01-01", vec![agenda(1, "first", vec![action(7, "")])]),
            meeting(2, "Sul", "2025-01-01", vec![agenda(2, "second", vec![action(7, "")])]),
        ];
        let items = action_items(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].agenda_item_description, "first");
    }

    #[test]
    fn agenda_counts_sum_to_total() {
        let raw = vec![meeting(
            1,
            "Norte",
            "2025-01-01",
            vec![agenda(1, "a", vec![action(1, "Pendente"), action(2, "concluído"), action(3, "em andamento"), action(4, "??")])],
        )];
        let item = &flatten_agenda_items(&raw)[0];
        assert_eq!(item.total_actions, 4);
        assert_eq!(item.pending_count, 2);
        assert_eq!(item.in_progress_count, 1);
        assert_eq!(item.done_count, 1);
    }

    #[test]
    fn rollup_merges_by_normalized_description() {
        let raw = vec![
            meeting(1, "Norte", "2025-01-01", vec![agenda(1, " Saúde ", vec![action(1, "Pendente")])]),
            meeting(2, "Sul", "2025-04-01", vec![agenda(2, "saúde", vec![action(2, "Concluído")])]),
            meeting(3, "Norte", "2025-02-01", vec![agenda(3, "SAÚDE", vec![])]),
            meeting(4, "Sul", "2025-02-01", vec![agenda(4, "Educação", vec![])]),
        ];
        let rollup = agenda_rollup(&raw);
        assert_eq!(rollup.len(), 2);
        let health = &rollup[0];
        assert_eq!(health.description, " Saúde ");
        assert_eq!(health.id, "1");
        assert_eq!(health.total_actions, 2);
        assert_eq!(health.pending_count, 1);
        assert_eq!(health.done_count, 1);
        assert_eq!(health.meeting_date, d("2025-04-01"));
        assert_eq!(health.territories, vec!["Norte".to_string(), "Sul".to_string()]);
        assert_eq!(health.territory, "2 territórios");
        assert_eq!(rollup[1].territory, "Sul");
    }

    #[test]
    fn rollup_single_territory_keeps_name() {
        let raw = vec![
            meeting(1, "Norte", "2025-01-01", vec![agenda(1, "x", vec![])]),
            meeting(2, "Norte", "2025-02-01", vec![agenda(2, "X", vec![])]),
        ];
        let rollup = agenda_rollup(&raw);
        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].territory, "Norte");
    }

    #[test]
    fn empty_input_yields_empty_collections() {
        assert!(meetings(&[]).is_empty());
        assert!(action_items(&[]).is_empty());
        assert!(agenda_rollup(&[]).is_empty());
    }
}
