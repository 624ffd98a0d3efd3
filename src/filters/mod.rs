//! Conjunctive record filtering shared by the three views.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{ActionItem, AgendaItem, Meeting, Status};

pub mod state;

pub use state::FilterState;

/// Shared filter criteria. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub territories: BTreeSet<String>,
    #[serde(default)]
    pub statuses: BTreeSet<Status>,
    #[serde(default, deserialize_with = "optional_date")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub search: String,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        !self.has_active_filters()
    }

    pub fn has_active_filters(&self) -> bool {
        !self.territories.is_empty()
            || !self.statuses.is_empty()
            || self.date_from.is_some()
            || self.date_to.is_some()
            || !self.search.is_empty()
    }

    /// Number of active filter kinds; the date range counts once.
    pub fn active_filters_count(&self) -> usize {
        [
            !self.territories.is_empty(),
            !self.statuses.is_empty(),
            self.date_from.is_some() || self.date_to.is_some(),
            !self.search.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

/// Accepts `null`, a missing field or `""` as "no date".
pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// What the filter engine needs to know about a record.
pub trait Filterable {
    /// True when any territory the record belongs to is in `territories`.
    fn in_territories(&self, territories: &BTreeSet<String>) -> bool;

    /// `None` when the record type carries no status at all.
    fn has_status(&self, status: Status) -> Option<bool>;

    /// Date compared against the filter's date range.
    fn relevant_date(&self) -> NaiveDate;

    /// Text fields matched by the free-text search.
    fn search_fields(&self) -> Vec<&str>;
}

impl Filterable for ActionItem {
    fn in_territories(&self, territories: &BTreeSet<String>) -> bool {
        territories.contains(&self.territory)
    }

    fn has_status(&self, status: Status) -> Option<bool> {
        Some(self.status == status)
    }

    fn relevant_date(&self) -> NaiveDate {
        self.meeting_date
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.agenda_item_description.as_str(),
            self.problem.as_str(),
            self.responsible_parties.as_str(),
        ]
    }
}

/// An agenda item "has" a status when at least one of its actions has it.
impl Filterable for AgendaItem {
    fn in_territories(&self, territories: &BTreeSet<String>) -> bool {
        self.territories.iter().any(|t| territories.contains(t))
    }

    fn has_status(&self, status: Status) -> Option<bool> {
        Some(self.count_for(status) > 0)
    }

    fn relevant_date(&self) -> NaiveDate {
        self.meeting_date
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.description.as_str()]
    }
}

impl Filterable for Meeting {
    fn in_territories(&self, territories: &BTreeSet<String>) -> bool {
        territories.contains(&self.territory)
    }

    fn has_status(&self, _status: Status) -> Option<bool> {
        None
    }

    fn relevant_date(&self) -> NaiveDate {
        self.date
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.facilitator.as_str(), self.territory.as_str()]
    }
}

/// True iff `record` satisfies every non-empty criterion of `spec`.
pub fn matches<T: Filterable>(record: &T, spec: &FilterSpec) -> bool {
    if !spec.territories.is_empty() && !record.in_territories(&spec.territories) {
        return false;
    }
    if !spec.statuses.is_empty()
        && !spec.statuses.iter().any(|s| record.has_status(*s) == Some(true))
    {
        return false;
    }
    let date = record.relevant_date();
    if spec.date_from.is_some_and(|from| date < from) {
        return false;
    }
    if spec.date_to.is_some_and(|to| date > to) {
        return false;
    }
    if !spec.search.is_empty() {
        let needle = spec.search.to_lowercase();
        if !record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        {
            return false;
        }
    }
    true
}

pub fn filter<T: Filterable + Clone>(records: &[T], spec: &FilterSpec) -> Vec<T> {
    records.iter().filter(|r| matches(*r, spec)).cloned().collect()
}

/// Single-valued KPI drill-down layered on top of the shared spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActiveMetric(Option<Status>);

impl ActiveMetric {
    pub fn get(&self) -> Option<Status> {
        self.0
    }

    /// Select `status`, or clear it when it is already selected.
    pub fn toggle(&mut self, status: Status) {
        self.0 = if self.0 == Some(status) { None } else { Some(status) };
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Shared spec AND the active metric, for action items.
pub fn filter_actions(items: &[ActionItem], spec: &FilterSpec, metric: ActiveMetric) -> Vec<ActionItem> {
    items
        .iter()
        .filter(|a| matches(*a, spec))
        .filter(|a| metric.get().is_none_or(|s| a.status == s))
        .cloned()
        .collect()
}

/// Partial update of a `FilterSpec`. Absent fields are left untouched;
/// an empty date string clears the bound.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterPatch {
    pub territories: Option<BTreeSet<String>>,
    pub statuses: Option<BTreeSet<Status>>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}

impl FilterPatch {
    pub fn apply(self, spec: &mut FilterSpec) -> Result<(), String> {
        if let Some(t) = self.territories {
            spec.territories = t;
        }
        if let Some(s) = self.statuses {
            spec.statuses = s;
        }
        if let Some(from) = self.date_from {
            spec.date_from = parse_bound(&from)?;
        }
        if let Some(to) = self.date_to {
            spec.date_to = parse_bound(&to)?;
        }
        if let Some(search) = self.search {
            spec.search = search;
        }
        Ok(())
    }
}

fn parse_bound(s: &str) -> Result<Option<NaiveDate>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| format!("invalid date '{s}': {e}"))
}
