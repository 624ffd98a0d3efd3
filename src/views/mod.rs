//! Per-view fetch state and the shared application state.
//!
//! Each view moves `Loading → Ready | Errored`; a refetch re-enters `Loading`
//! from either end state. Only one fetch per view is in flight at a time.

use std::sync::RwLock;

use serde::Serialize;
use sqlx::PgPool;

use crate::filters::{ActiveMetric, FilterState};
use crate::models::meeting::{self, RawMeeting};
use crate::models::territory::{self, Territory};
use crate::models::{ActionItem, AgendaItem, Meeting};
use crate::normalizer;

pub mod derived;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Errored(String),
}

#[derive(Debug)]
pub struct View<T> {
    state: LoadState<T>,
    in_flight: bool,
}

impl<T> Default for View<T> {
    fn default() -> Self {
        Self { state: LoadState::Loading, in_flight: false }
    }
}

impl<T> View<T> {
    pub fn ready(data: T) -> Self {
        Self { state: LoadState::Ready(data), in_flight: false }
    }

    /// Enter `Loading`. Returns false, changing nothing, if a fetch is already running.
    pub fn begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        self.state = LoadState::Loading;
        true
    }

    pub fn complete(&mut self, result: Result<T, String>) {
        self.in_flight = false;
        self.state = match result {
            Ok(data) => LoadState::Ready(data),
            Err(message) => LoadState::Errored(message),
        };
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

/// JSON envelope for a view: `{"state": "loading" | "ready" | "errored", ...}`.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Envelope<T> {
    Loading,
    Ready { data: T },
    Errored { error: String },
}

impl<T> View<T> {
    /// Map the ready data through `f`, keeping the state tag.
    pub fn envelope<U>(&self, f: impl FnOnce(&T) -> U) -> Envelope<U> {
        match &self.state {
            LoadState::Loading => Envelope::Loading,
            LoadState::Ready(data) => Envelope::Ready { data: f(data) },
            LoadState::Errored(e) => Envelope::Errored { error: e.clone() },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionsData {
    pub territories: Vec<Territory>,
    pub items: Vec<ActionItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingsData {
    pub territories: Vec<Territory>,
    pub meetings: Vec<Meeting>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Actions,
    Agenda,
    Meetings,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Actions, ViewKind::Agenda, ViewKind::Meetings];

    pub fn key(self) -> &'static str {
        match self {
            ViewKind::Actions => "action-items",
            ViewKind::Agenda => "agenda-items",
            ViewKind::Meetings => "meetings",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }
}

pub async fn load_actions(pool: &PgPool) -> Result<ActionsData, sqlx::Error> {
    let territories = territory::find_all(pool).await?;
    let raw = meeting::fetch_tree(pool).await?;
    let items = normalizer::action_items(&raw);
    log::info!("Loaded {} action items from {} meetings", items.len(), raw.len());
    Ok(ActionsData { territories, items })
}

pub async fn load_agenda(pool: &PgPool) -> Result<Vec<AgendaItem>, sqlx::Error> {
    let raw = meeting::fetch_tree(pool).await?;
    let items = normalizer::agenda_rollup(&raw);
    log::info!("Loaded {} agenda items from {} meetings", items.len(), raw.len());
    Ok(items)
}

pub async fn load_meetings(pool: &PgPool) -> Result<MeetingsData, sqlx::Error> {
    let territories = territory::find_all(pool).await?;
    let raw = meeting::fetch_tree(pool).await?;
    log::info!("Loaded {} meetings, {} territories", raw.len(), territories.len());
    Ok(MeetingsData { territories, meetings: normalizer::meetings(&raw) })
}

/// Everything the HTTP layer shares: the three views, the filter
/// container, the KPI drill-down, and the pool the views load from.
pub struct AppState {
    pub filters: FilterState,
    pub metric: RwLock<ActiveMetric>,
    pub actions: RwLock<View<ActionsData>>,
    pub agenda: RwLock<View<Vec<AgendaItem>>>,
    pub meetings: RwLock<View<MeetingsData>>,
    pool: Option<PgPool>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self::build(Some(pool))
    }

    /// No backing store: views stay `Loading` and every fetch errors.
    pub fn detached() -> Self {
        Self::build(None)
    }

    /// State whose views are already `Ready` from an in-memory meeting tree.
    pub fn from_snapshot(raw: &[RawMeeting], territories: Vec<Territory>) -> Self {
        let state = Self::detached();
        write(&state.actions).complete(Ok(ActionsData {
            territories: territories.clone(),
            items: normalizer::action_items(raw),
        }));
        write(&state.agenda).complete(Ok(normalizer::agenda_rollup(raw)));
        write(&state.meetings).complete(Ok(MeetingsData {
            territories,
            meetings: normalizer::meetings(raw),
        }));
        state
    }

    fn build(pool: Option<PgPool>) -> Self {
        let filters = FilterState::new();
        filters.subscribe(|spec| {
            log::debug!("Filter spec changed, {} active filter(s)", spec.active_filters_count());
        });
        Self {
            filters,
            metric: RwLock::new(ActiveMetric::default()),
            actions: RwLock::new(View::default()),
            agenda: RwLock::new(View::default()),
            meetings: RwLock::new(View::default()),
            pool,
        }
    }

    /// Fetch one view again. Returns false when a fetch for it was already running.
    pub async fn refetch(&self, kind: ViewKind) -> bool {
        match kind {
            ViewKind::Actions => run_fetch(&self.actions, kind, self.pool.as_ref(), load_actions).await,
            ViewKind::Agenda => run_fetch(&self.agenda, kind, self.pool.as_ref(), load_agenda).await,
            ViewKind::Meetings => run_fetch(&self.meetings, kind, self.pool.as_ref(), load_meetings).await,
        }
    }

    /// Fetch all three views concurrently.
    pub async fn refetch_all(&self) {
        tokio::join!(
            self.refetch(ViewKind::Actions),
            self.refetch(ViewKind::Agenda),
            self.refetch(ViewKind::Meetings),
        );
    }
}

async fn run_fetch<'a, T, F, Fut>(
    view: &RwLock<View<T>>,
    kind: ViewKind,
    pool: Option<&'a PgPool>,
    load: F,
) -> bool
where
    F: FnOnce(&'a PgPool) -> Fut,
    Fut: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    if !write(view).begin() {
        log::warn!("Fetch for {} already in flight, skipping", kind.key());
        return false;
    }
    let result = match pool {
        Some(pool) => load(pool).await.map_err(|e| {
            log::error!("Fetch for {} failed: {e}", kind.key());
            format!("Erro ao carregar dados: {e}")
        }),
        None => Err("Nenhuma fonte de dados configurada".to_string()),
    };
    write(view).complete(result);
    true
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_starts_loading() {
        let view: View<u8> = View::default();
        assert_eq!(view.state(), &LoadState::Loading);
        assert!(view.data().is_none());
    }

    #[test]
    fn begin_rejects_overlapping_fetch() {
        let mut view: View<u8> = View::ready(1);
        assert!(!view.is_in_flight());
        assert!(view.begin());
        assert!(view.is_in_flight());
        assert_eq!(view.state(), &LoadState::Loading);
        assert!(!view.begin());
        view.complete(Err("boom".into()));
        assert!(!view.is_in_flight());
        assert_eq!(view.state(), &LoadState::Errored("boom".into()));
        assert!(view.begin());
        view.complete(Ok(2));
        assert_eq!(view.data(), Some(&2));
    }

    #[test]
    fn envelope_tags_state() {
        let view: View<u8> = View::ready(7);
        let json = serde_json::to_value(view.envelope(|n| *n * 2)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "ready", "data": 14}));
        let mut view: View<u8> = View::default();
        view.begin();
        view.complete(Err("x".into()));
        let json = serde_json::to_value(view.envelope(|n| *n)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "errored", "error": "x"}));
    }

    #[test]
    fn view_keys_roundtrip() {
        for kind in ViewKind::ALL {
            assert_eq!(ViewKind::from_key(kind.key()), Some(kind));
        }
    }

    #[actix_rt::test]
    async fn detached_refetch_errors_without_panicking() {
        let state = AppState::detached();
        assert!(state.refetch(ViewKind::Meetings).await);
        assert!(matches!(read(&state.meetings).state(), LoadState::Errored(_)));
        assert!(matches!(read(&state.actions).state(), LoadState::Loading));
    }
}
