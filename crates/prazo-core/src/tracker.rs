//! Command surface consumed by the presentation layer.
//!
//! A [`Tracker`] owns the task store, the metrics snapshot attached to it and
//! the active filter. Every command applies its mutation (which recomputes
//! metrics through the store listener) and hands back a fresh
//! [`TrackerView`].

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::clock::{SharedClock, SystemClock};
use crate::metrics::{Metrics, MetricsEngine, MetricsHandle, ProgressPoint, Statistics};
use crate::store::TaskStore;
use crate::task::{FilterMode, Task, TaskDraft, TaskId};

/// Read-only snapshot returned by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerView {
    pub filter: FilterMode,
    pub statistics: Statistics,
    pub progress: Vec<ProgressPoint>,
    pub tasks: Vec<Task>,
    /// Id of the task open for editing, if any
    pub editing: Option<TaskId>,
}

#[derive(Debug)]
pub struct Tracker {
    store: TaskStore,
    metrics: MetricsHandle,
    filter: FilterMode,
}

/// Tracker shared between the command loop and the overdue monitor.
pub type SharedTracker = Arc<Mutex<Tracker>>;

impl Tracker {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: SharedClock) -> Self {
        let engine = MetricsEngine::new(clock.clone());
        Self::with_engine(clock, engine)
    }

    pub fn with_engine(clock: SharedClock, engine: MetricsEngine) -> Self {
        let mut store = TaskStore::with_clock(clock);
        let metrics = engine.attach(&mut store);
        Self {
            store,
            metrics,
            filter: FilterMode::All,
        }
    }

    pub fn into_shared(self) -> SharedTracker {
        Arc::new(Mutex::new(self))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> DateTime<Local> {
        self.store.clock().now()
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.get()
    }

    pub fn view(&self) -> TrackerView {
        let Metrics {
            statistics,
            progress,
        } = self.metrics.get();
        TrackerView {
            filter: self.filter,
            statistics,
            progress,
            tasks: self.store.filter(self.filter).into_iter().cloned().collect(),
            editing: self.store.editing(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn add(&mut self, draft: &TaskDraft) -> TrackerView {
        self.store.add(draft);
        self.view()
    }

    pub fn remove(&mut self, id: TaskId) -> TrackerView {
        self.store.remove(id);
        self.view()
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> TrackerView {
        self.store.toggle_complete(id);
        self.view()
    }

    pub fn update(&mut self, task: Task) -> TrackerView {
        self.store.update(task);
        self.view()
    }

    pub fn begin_edit(&mut self, id: TaskId) -> Option<Task> {
        self.store.begin_edit(id)
    }

    pub fn cancel_edit(&mut self) -> TrackerView {
        self.store.cancel_edit();
        self.view()
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) -> TrackerView {
        self.filter = mode;
        self.view()
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock a shared tracker, recovering the state if a holder panicked.
pub fn lock(tracker: &SharedTracker) -> MutexGuard<'_, Tracker> {
    tracker.lock().unwrap_or_else(|e| e.into_inner())
}
