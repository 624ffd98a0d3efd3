use std::sync::{Arc, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;

use super::FilterSpec;
use crate::models::Status;

type Listener = Arc<dyn Fn(&FilterSpec) + Send + Sync>;

/// Process-wide filter spec, handed to every view that derives from it.
///
/// Each write bumps the revision and then runs every subscribed listener with
/// the new spec. Starts empty; nothing is persisted.
#[derive(Default)]
pub struct FilterState {
    spec: RwLock<FilterSpec>,
    revision: AtomicU64,
    listeners: RwLock<Vec<Listener>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> FilterSpec {
        self.spec.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of writes since creation.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Register a listener run after every change.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&FilterSpec) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(listener));
    }

    /// Replace the whole spec.
    pub fn replace(&self, spec: FilterSpec) {
        self.update(|current| *current = spec);
    }

    /// Mutate the spec in place, then notify listeners.
    ///
    /// Listeners run with no lock held, so they may read, write or
    /// subscribe to this state.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut FilterSpec),
    {
        let snapshot = {
            let mut guard = self.spec.write().unwrap_or_else(|e| e.into_inner());
            f(&mut guard);
            guard.clone()
        };
        self.revision.fetch_add(1, Ordering::SeqCst);
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner()).clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    pub fn clear(&self) {
        self.replace(FilterSpec::default());
    }

    pub fn toggle_territory(&self, territory: &str) {
        self.update(|spec| {
            if !spec.territories.remove(territory) {
                spec.territories.insert(territory.to_string());
            }
        });
    }

    pub fn toggle_status(&self, status: Status) {
        self.update(|spec| {
            if !spec.statuses.remove(&status) {
                spec.statuses.insert(status);
            }
        });
    }

    pub fn set_date_range(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.update(|spec| {
            spec.date_from = from;
            spec.date_to = to;
        });
    }

    pub fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        self.update(|spec| spec.search = search);
    }
}
