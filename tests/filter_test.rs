mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use painel::filters::{self, ActiveMetric, FilterPatch, FilterSpec, FilterState};
use painel::models::Status;
use painel::normalizer;

fn spec_for(territories: &[&str]) -> FilterSpec {
    FilterSpec {
        territories: territories.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn test_empty_spec_is_identity() {
    let raw = common::raw_tree();
    let actions = normalizer::action_items(&raw);
    let agenda = normalizer::agenda_rollup(&raw);
    let meetings = normalizer::meetings(&raw);
    let spec = FilterSpec::default();

    assert_eq!(filters::filter(&actions, &spec), actions);
    assert_eq!(filters::filter(&agenda, &spec), agenda);
    assert_eq!(filters::filter(&meetings, &spec), meetings);
}

#[test]
fn test_filters_combine_conjunctively() {
    let actions = normalizer::action_items(&common::raw_tree());
    let spec = FilterSpec {
        territories: ["Norte".to_string()].into(),
        statuses: [Status::Done].into(),
        ..Default::default()
    };
    let ids: Vec<String> = filters::filter(&actions, &spec).into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["101"]);
}

#[test]
fn test_date_range_is_inclusive() {
    let actions = normalizer::action_items(&common::raw_tree());
    let spec = FilterSpec {
        date_from: Some(common::date("2025-02-05")),
        date_to: Some(common::date("2025-03-10")),
        ..Default::default()
    };
    assert_eq!(filters::filter(&actions, &spec).len(), 4);

    let spec = FilterSpec { date_to: Some(common::date("2025-02-04")), ..Default::default() };
    let ids: Vec<String> = filters::filter(&actions, &spec).into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["104"]);
}

#[test]
fn test_search_is_case_insensitive() {
    let actions = normalizer::action_items(&common::raw_tree());
    let spec = FilterSpec { search: "ANA LIMA".into(), ..Default::default() };
    let ids: Vec<String> = filters::filter(&actions, &spec).into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["100", "101"]);

    let spec = FilterSpec { search: "postes".into(), ..Default::default() };
    assert_eq!(filters::filter(&actions, &spec).len(), 1);
}

#[test]
fn test_agenda_item_matches_any_contributing_territory() {
    let agenda = normalizer::agenda_rollup(&common::raw_tree());

    let sul = filters::filter(&agenda, &spec_for(&["Sul"]));
    let names: Vec<&str> = sul.iter().map(|a| a.description.as_str()).collect();
    assert_eq!(names, vec!["Saneamento básico", "Educação"]);

    // the display label is not a territory
    assert!(filters::filter(&agenda, &spec_for(&["2 territórios"])).is_empty());
}

#[test]
fn test_agenda_status_means_at_least_one_action() {
    let agenda = normalizer::agenda_rollup(&common::raw_tree());
    let spec = FilterSpec { statuses: [Status::InProgress].into(), ..Default::default() };
    let names: Vec<String> = filters::filter(&agenda, &spec).into_iter().map(|a| a.description).collect();
    assert_eq!(names, vec!["Iluminação pública", "Saúde"]);
}

#[test]
fn test_status_filter_excludes_meetings() {
    let meetings = normalizer::meetings(&common::raw_tree());
    let spec = FilterSpec { statuses: [Status::Pending].into(), ..Default::default() };
    assert!(filters::filter(&meetings, &spec).is_empty());
}

#[test]
fn test_active_metric_layers_on_spec() {
    let actions = normalizer::action_items(&common::raw_tree());
    let mut metric = ActiveMetric::default();
    metric.toggle(Status::InProgress);

    let narrowed = filters::filter_actions(&actions, &spec_for(&["Centro"]), metric);
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].id, "104");

    metric.toggle(Status::InProgress);
    assert_eq!(metric.get(), None);
    assert_eq!(filters::filter_actions(&actions, &FilterSpec::default(), metric).len(), 5);
}

#[test]
fn test_filter_state_notifies_subscribers() {
    let state = FilterState::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    state.subscribe(move |spec| {
        if spec.territories.contains("Norte") {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    state.toggle_territory("Norte");
    state.set_search("agua");
    state.set_date_range(Some(common::date("2025-01-01")), None);

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(state.revision(), 3);
    assert_eq!(state.snapshot().active_filters_count(), 3);

    state.clear();
    assert!(state.snapshot().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(state.revision(), 4);
}

#[test]
fn test_patch_leaves_absent_fields_alone() {
    let mut spec = spec_for(&["Sul"]);
    spec.search = "água".into();

    let patch: FilterPatch = serde_json::from_str(r#"{"date_from": "2025-01-01"}"#).unwrap();
    patch.apply(&mut spec).unwrap();
    assert_eq!(spec.territories.len(), 1);
    assert_eq!(spec.search, "água");
    assert_eq!(spec.date_from, Some(common::date("2025-01-01")));

    let patch: FilterPatch = serde_json::from_str(r#"{"date_from": ""}"#).unwrap();
    patch.apply(&mut spec).unwrap();
    assert_eq!(spec.date_from, None);

    let patch: FilterPatch = serde_json::from_str(r#"{"date_to": "31/01/2025"}"#).unwrap();
    assert!(patch.apply(&mut spec).is_err());
}
