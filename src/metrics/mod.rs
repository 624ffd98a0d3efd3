//! Derived statistics for charts and KPI cards.
//!
//! Everything here is a pure function over a slice of canonical records and
//! returns zero-valued structures on empty input.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::models::{ActionItem, AgendaItem, Meeting, Status};

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// `round(part / total * 100)`, rounding halves up. Zero when `total` is zero.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (part, total) = (part as u64, total as u64);
    ((200 * part + total) / (2 * total)) as u32
}

pub fn completion_rate(done: usize, total: usize) -> u32 {
    percentage(done, total)
}

/// Per-status counters in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.done
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Pending => self.pending,
            Status::InProgress => self.in_progress,
            Status::Done => self.done,
        }
    }

    pub fn add(&mut self, other: StatusCounts) {
        self.pending += other.pending;
        self.in_progress += other.in_progress;
        self.done += other.done;
    }

    /// Pending plus in progress.
    pub fn open(&self) -> usize {
        self.pending + self.in_progress
    }

    pub fn completion_rate(&self) -> u32 {
        completion_rate(self.done, self.total())
    }
}

/// Records that contribute action counts to a status tally.
pub trait StatusTally {
    fn tally(&self) -> StatusCounts;
}

impl StatusTally for ActionItem {
    fn tally(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        match self.status {
            Status::Pending => counts.pending = 1,
            Status::InProgress => counts.in_progress = 1,
            Status::Done => counts.done = 1,
        }
        counts
    }
}

impl StatusTally for AgendaItem {
    fn tally(&self) -> StatusCounts {
        StatusCounts {
            pending: self.pending_count,
            in_progress: self.in_progress_count,
            done: self.done_count,
        }
    }
}

pub fn tally_all<T: StatusTally>(items: &[T]) -> StatusCounts {
    items.iter().fold(StatusCounts::default(), |mut acc, item| {
        acc.add(item.tally());
        acc
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub status: Status,
    pub label: &'static str,
    pub count: usize,
    pub percentage: u32,
}

/// Count per status, always three entries in display order.
pub fn status_distribution<T: StatusTally>(items: &[T]) -> Vec<StatusSlice> {
    let counts = tally_all(items);
    let total = counts.total();
    Status::ALL
        .into_iter()
        .map(|status| StatusSlice {
            status,
            label: status.label(),
            count: counts.get(status),
            percentage: percentage(counts.get(status), total),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerritoryBreakdown {
    pub territory: String,
    pub total: usize,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub completion_rate: u32,
}

impl TerritoryBreakdown {
    fn new(territory: String, counts: StatusCounts) -> Self {
        Self {
            territory,
            total: counts.total(),
            completion_rate: counts.completion_rate(),
            counts,
        }
    }
}

/// Actions grouped by territory, largest group first.
///
/// Groups with equal totals keep the order in which their territory first
/// appeared. Pass `top` to truncate.
pub fn territory_breakdown(items: &[ActionItem], top: Option<usize>) -> Vec<TerritoryBreakdown> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<&str, StatusCounts> = HashMap::new();
    for item in items {
        let entry = groups.entry(item.territory.as_str()).or_insert_with(|| {
            order.push(item.territory.clone());
            StatusCounts::default()
        });
        entry.add(item.tally());
    }

    let mut rows: Vec<TerritoryBreakdown> = order
        .into_iter()
        .map(|t| {
            let counts = groups.get(t.as_str()).copied().unwrap_or_default();
            TerritoryBreakdown::new(t, counts)
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    if let Some(k) = top {
        rows.truncate(k);
    }
    rows
}

/// One row per listed territory, in the given order, including zero rows.
pub fn territory_breakdown_for(items: &[ActionItem], territories: &[String]) -> Vec<TerritoryBreakdown> {
    territories
        .iter()
        .map(|t| {
            let counts = items
                .iter()
                .filter(|a| &a.territory == t)
                .fold(StatusCounts::default(), |mut acc, a| {
                    acc.add(a.tally());
                    acc
                });
            TerritoryBreakdown::new(t.clone(), counts)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaTerritoryRow {
    pub territory: String,
    pub agenda_items: usize,
    pub actions: usize,
    pub done: usize,
    pub completion_rate: u32,
}

/// Agenda items grouped by their display territory, most items first.
pub fn agenda_territory_breakdown(items: &[AgendaItem], top: Option<usize>) -> Vec<AgendaTerritoryRow> {
    let mut rows: Vec<AgendaTerritoryRow> = Vec::new();
    for item in items {
        let idx = match rows.iter().position(|r| r.territory == item.territory) {
            Some(i) => i,
            None => {
                rows.push(AgendaTerritoryRow {
                    territory: item.territory.clone(),
                    agenda_items: 0,
                    actions: 0,
                    done: 0,
                    completion_rate: 0,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        row.agenda_items += 1;
        row.actions += item.total_actions;
        row.done += item.done_count;
    }
    for row in &mut rows {
        row.completion_rate = completion_rate(row.done, row.actions);
    }
    rows.sort_by(|a, b| b.agenda_items.cmp(&a.agenda_items));
    if let Some(k) = top {
        rows.truncate(k);
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingTerritoryRow {
    pub territory: String,
    pub meetings: usize,
    pub agenda_items: usize,
    pub actions: usize,
}

/// Meetings per reference territory, zero rows included, most meetings first.
pub fn meeting_territory_breakdown(meetings: &[Meeting], territories: &[String]) -> Vec<MeetingTerritoryRow> {
    let mut rows: Vec<MeetingTerritoryRow> = territories
        .iter()
        .map(|t| {
            let mine = meetings.iter().filter(|m| &m.territory == t);
            let (count, agenda_items, actions) = mine.fold((0, 0, 0), |(n, p, a), m| {
                (n + 1, p + m.total_agenda_items, a + m.total_actions)
            });
            MeetingTerritoryRow {
                territory: t.clone(),
                meetings: count,
                agenda_items,
                actions,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.meetings.cmp(&a.meetings));
    rows
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    /// Short Portuguese month plus two-digit year, e.g. `"Fev/25"`.
    pub label: String,
    pub total: usize,
    pub done: usize,
    /// Pending or in progress.
    pub open: usize,
    pub completion_rate: u32,
}

pub fn month_label(year: i32, month: u32) -> String {
    let abbr = MONTH_ABBR
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!("{abbr}/{:02}", year.rem_euclid(100))
}

/// Actions bucketed by the month of their meeting date, oldest month first.
pub fn monthly_trend(items: &[ActionItem]) -> Vec<MonthBucket> {
    month_counts(items)
        .into_iter()
        .map(|((year, month), counts)| MonthBucket::new(year, month, counts))
        .collect()
}

/// The `months` calendar months ending with the month of `today`, oldest
/// first. Months without actions stay in the series as zero buckets.
pub fn monthly_window_on(items: &[ActionItem], today: NaiveDate, months: u32) -> Vec<MonthBucket> {
    let counts = month_counts(items);
    let end = today.year() * 12 + today.month0() as i32;
    (0..months as i32)
        .rev()
        .map(|back| {
            let index = end - back;
            let (year, month) = (index.div_euclid(12), index.rem_euclid(12) as u32 + 1);
            let bucket = counts.get(&(year, month)).copied().unwrap_or_default();
            MonthBucket::new(year, month, bucket)
        })
        .collect()
}

fn month_counts(items: &[ActionItem]) -> BTreeMap<(i32, u32), StatusCounts> {
    let mut buckets: BTreeMap<(i32, u32), StatusCounts> = BTreeMap::new();
    for item in items {
        let key = (item.meeting_date.year(), item.meeting_date.month());
        buckets.entry(key).or_default().add(item.tally());
    }
    buckets
}

impl MonthBucket {
    fn new(year: i32, month: u32, counts: StatusCounts) -> Self {
        Self {
            year,
            month,
            label: month_label(year, month),
            total: counts.total(),
            done: counts.done,
            open: counts.open(),
            completion_rate: counts.completion_rate(),
        }
    }
}

pub fn overdue_count_on(items: &[ActionItem], today: NaiveDate) -> usize {
    items.iter().filter(|a| a.is_overdue(today)).count()
}

/// Open actions split by deadline state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeadlineSplit {
    pub on_time: usize,
    pub overdue: usize,
    pub no_deadline: usize,
}

pub fn deadline_split_on(items: &[ActionItem], today: NaiveDate) -> DeadlineSplit {
    let mut split = DeadlineSplit::default();
    for item in items.iter().filter(|a| a.status != Status::Done) {
        match item.deadline {
            None => split.no_deadline += 1,
            Some(d) if d < today => split.overdue += 1,
            Some(_) => split.on_time += 1,
        }
    }
    split
}

pub fn unique_responsible_count(items: &[ActionItem]) -> usize {
    items
        .iter()
        .flat_map(|a| a.responsible_names())
        .collect::<BTreeSet<_>>()
        .len()
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.collect::<BTreeSet<_>>().len()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionMetrics {
    pub total: usize,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub overdue: usize,
    pub unique_responsible: usize,
    pub completion_rate: u32,
    pub deadlines: DeadlineSplit,
}

impl ActionMetrics {
    pub fn compute(items: &[ActionItem]) -> Self {
        Self::compute_on(items, today())
    }

    pub fn compute_on(items: &[ActionItem], today: NaiveDate) -> Self {
        let counts = tally_all(items);
        Self {
            total: items.len(),
            counts,
            overdue: overdue_count_on(items, today),
            unique_responsible: unique_responsible_count(items),
            completion_rate: counts.completion_rate(),
            deadlines: deadline_split_on(items, today),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgendaMetrics {
    pub total_items: usize,
    pub total_actions: usize,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub items_with_pending: usize,
    pub completion_rate: u32,
    pub territories: usize,
}

impl AgendaMetrics {
    pub fn compute(items: &[AgendaItem]) -> Self {
        let counts = tally_all(items);
        Self {
            total_items: items.len(),
            total_actions: items.iter().map(|i| i.total_actions).sum(),
            counts,
            items_with_pending: items.iter().filter(|i| i.pending_count > 0).count(),
            completion_rate: counts.completion_rate(),
            territories: distinct(items.iter().flat_map(|i| i.territories.iter().map(String::as_str))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeetingMetrics {
    pub total: usize,
    pub agenda_items: usize,
    pub actions: usize,
    pub territories: usize,
}

impl MeetingMetrics {
    pub fn compute(meetings: &[Meeting]) -> Self {
        Self {
            total: meetings.len(),
            agenda_items: meetings.iter().map(|m| m.total_agenda_items).sum(),
            actions: meetings.iter().map(|m| m.total_actions).sum(),
            territories: distinct(meetings.iter().map(|m| m.territory.as_str())),
        }
    }
}

/// The `n` agenda items with the most actions.
pub fn top_agenda_items(items: &[AgendaItem], n: usize) -> Vec<AgendaItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.total_actions.cmp(&a.total_actions));
    sorted.truncate(n);
    sorted
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
