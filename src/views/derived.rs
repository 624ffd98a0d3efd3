//! View models recomputed from the loaded data and the current filters.

use chrono::NaiveDate;
use serde::Serialize;

use super::{ActionsData, MeetingsData};
use crate::filters::{self, ActiveMetric, FilterSpec};
use crate::metrics::{
    self, ActionMetrics, AgendaMetrics, AgendaTerritoryRow, MeetingMetrics, MeetingTerritoryRow,
    MonthBucket, StatusSlice, TerritoryBreakdown,
};
use crate::models::territory;
use crate::models::{ActionItem, AgendaItem, Meeting, Status};

const ACTION_TERRITORY_TOP: usize = 8;
const AGENDA_TERRITORY_TOP: usize = 5;
const TOP_AGENDA_ITEMS: usize = 10;
const RECENT_MONTHS: u32 = 6;

#[derive(Debug, Serialize)]
pub struct ActionsView {
    pub items: Vec<ActionItem>,
    pub active_metric: Option<Status>,
    pub active_filters: usize,
    pub metrics: ActionMetrics,
    pub status_distribution: Vec<StatusSlice>,
    pub by_territory: Vec<TerritoryBreakdown>,
    /// Every selected territory (or every known one), zero rows included.
    pub territory_overview: Vec<TerritoryBreakdown>,
    pub monthly: Vec<MonthBucket>,
    /// The last six calendar months up to `today`, empty months as zeros.
    pub recent_trend: Vec<MonthBucket>,
}

/// KPIs and charts follow the shared filters; the item list also honours
/// the KPI drill-down.
pub fn actions(data: &ActionsData, spec: &FilterSpec, metric: ActiveMetric, today: NaiveDate) -> ActionsView {
    let filtered = filters::filter(&data.items, spec);
    let overview_territories: Vec<String> = if spec.territories.is_empty() {
        territory::names(&data.territories)
    } else {
        spec.territories.iter().cloned().collect()
    };
    ActionsView {
        items: filters::filter_actions(&data.items, spec, metric),
        active_metric: metric.get(),
        active_filters: spec.active_filters_count(),
        metrics: ActionMetrics::compute_on(&filtered, today),
        status_distribution: metrics::status_distribution(&filtered),
        by_territory: metrics::territory_breakdown(&filtered, Some(ACTION_TERRITORY_TOP)),
        territory_overview: metrics::territory_breakdown_for(&filtered, &overview_territories),
        monthly: metrics::monthly_trend(&filtered),
        recent_trend: metrics::monthly_window_on(&filtered, today, RECENT_MONTHS),
    }
}

#[derive(Debug, Serialize)]
pub struct AgendaView {
    pub items: Vec<AgendaItem>,
    pub active_filters: usize,
    pub metrics: AgendaMetrics,
    pub status_distribution: Vec<StatusSlice>,
    pub top_items: Vec<AgendaItem>,
    pub by_territory: Vec<AgendaTerritoryRow>,
}

pub fn agenda(items: &[AgendaItem], spec: &FilterSpec) -> AgendaView {
    let filtered = filters::filter(items, spec);
    AgendaView {
        active_filters: spec.active_filters_count(),
        metrics: AgendaMetrics::compute(&filtered),
        status_distribution: metrics::status_distribution(&filtered),
        top_items: metrics::top_agenda_items(&filtered, TOP_AGENDA_ITEMS),
        by_territory: metrics::agenda_territory_breakdown(&filtered, Some(AGENDA_TERRITORY_TOP)),
        items: filtered,
    }
}

#[derive(Debug, Serialize)]
pub struct MeetingsView {
    pub meetings: Vec<Meeting>,
    pub active_filters: usize,
    pub metrics: MeetingMetrics,
    pub by_territory: Vec<MeetingTerritoryRow>,
}

pub fn meetings(data: &MeetingsData, spec: &FilterSpec) -> MeetingsView {
    let filtered = filters::filter(&data.meetings, spec);
    MeetingsView {
        active_filters: spec.active_filters_count(),
        metrics: MeetingMetrics::compute(&filtered),
        by_territory: metrics::meeting_territory_breakdown(&filtered, &territory::names(&data.territories)),
        meetings: filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Territory;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn action(id: &str, territory: &str, status: Status) -> ActionItem {
        ActionItem {
            id: id.into(),
            meeting_date: d("2025-01-10"),
            agenda_item_description: "Pauta".into(),
            problem: String::new(),
            description: String::new(),
            solution: String::new(),
            responsible_parties: "Ana".into(),
            territory: territory.into(),
            deadline: None,
            status,
        }
    }

    fn data() -> ActionsData {
        ActionsData {
            territories: vec![
                Territory { id: "1".into(), name: "Leste".into() },
                Territory { id: "2".into(), name: "Norte".into() },
            ],
            items: vec![
                action("1", "Norte", Status::Done),
                action("2", "Norte", Status::Pending),
            ],
        }
    }

    #[test]
    fn drill_down_narrows_items_but_not_kpis() {
        let mut metric = ActiveMetric::default();
        metric.toggle(Status::Done);
        let view = actions(&data(), &FilterSpec::default(), metric, d("2025-06-01"));
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.metrics.total, 2);
        assert_eq!(view.metrics.completion_rate, 50);
        assert_eq!(view.active_metric, Some(Status::Done));
    }

    #[test]
    fn overview_backfills_reference_territories() {
        let view = actions(&data(), &FilterSpec::default(), ActiveMetric::default(), d("2025-06-01"));
        let names: Vec<_> = view.territory_overview.iter().map(|r| (r.territory.as_str(), r.total)).collect();
        assert_eq!(names, vec![("Leste", 0), ("Norte", 2)]);
    }

    #[test]
    fn overview_uses_selected_territories_when_filtering() {
        let spec = FilterSpec { territories: ["Sul".to_string()].into(), ..Default::default() };
        let view = actions(&data(), &spec, ActiveMetric::default(), d("2025-06-01"));
        assert!(view.items.is_empty());
        assert_eq!(view.territory_overview.len(), 1);
        assert_eq!(view.territory_overview[0].territory, "Sul");
        assert_eq!(view.active_filters, 1);
    }
}
