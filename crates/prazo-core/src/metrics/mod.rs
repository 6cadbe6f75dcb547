//! Derived metrics over the task collection.
//!
//! [`MetricsEngine::compute_at`] is a pure function of the tasks and the
//! current instant; it keeps no memory between runs. [`MetricsEngine::attach`]
//! wires it to a [`TaskStore`] so a fresh snapshot is produced after every
//! mutation.

mod locale;

pub use locale::{DayNameFormatter, PtBrWeekdays};

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::{SharedClock, SystemClock};
use crate::store::TaskStore;
use crate::task::Task;

/// Number of days in the trailing completion histogram (today included).
pub const WINDOW_DAYS: u64 = 7;

/// Summary figures shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// 0..=100, rounded
    pub completed_tasks_percentage: u8,
    /// Mean grade over completed tasks, two decimals
    pub average_grade: f64,
    /// Exam dates are not tracked; always 0
    pub days_until_next_exam: u32,
    /// Pending tasks strictly past their deadline instant
    pub overdue_activities: usize,
}

/// One bar of the weekly histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPoint {
    /// Short weekday label
    pub name: String,
    /// Tasks completed on that day
    pub tarefas: usize,
}

/// Everything the engine derives in one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub statistics: Statistics,
    pub progress: Vec<ProgressPoint>,
}

/// Latest metrics snapshot, refreshed by the store's change listener.
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    latest: Arc<Mutex<Metrics>>,
}

impl MetricsHandle {
    pub fn get(&self) -> Metrics {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn replace(&self, metrics: Metrics) {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = metrics;
    }
}

#[derive(Clone)]
pub struct MetricsEngine {
    clock: SharedClock,
    labels: Arc<dyn DayNameFormatter>,
}

impl MetricsEngine {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            labels: Arc::new(PtBrWeekdays),
        }
    }

    pub fn with_labels(mut self, labels: Arc<dyn DayNameFormatter>) -> Self {
        self.labels = labels;
        self
    }

    /// Compute metrics at the engine clock's current instant.
    pub fn compute(&self, tasks: &[Task]) -> Metrics {
        self.compute_at(tasks, self.clock.now())
    }

    pub fn compute_at(&self, tasks: &[Task], now: DateTime<Local>) -> Metrics {
        Metrics {
            statistics: statistics(tasks, now),
            progress: self.progress(tasks, now.date_naive()),
        }
    }

    /// Register a recompute listener on `store` and return the handle that
    /// holds the latest result. The first snapshot is computed immediately.
    pub fn attach(&self, store: &mut TaskStore) -> MetricsHandle {
        let handle = MetricsHandle {
            latest: Arc::new(Mutex::new(self.compute(store.tasks()))),
        };
        let engine = self.clone();
        let sink = handle.clone();
        store.subscribe(Box::new(move |tasks| sink.replace(engine.compute(tasks))));
        handle
    }

    /// Completion counts for the seven days ending at `today`, oldest first.
    pub fn progress(&self, tasks: &[Task], today: NaiveDate) -> Vec<ProgressPoint> {
        let start = today
            .checked_sub_days(Days::new(WINDOW_DAYS - 1))
            .unwrap_or(today);

        start
            .iter_days()
            .take(WINDOW_DAYS as usize)
            .map(|day| ProgressPoint {
                name: self.labels.short_weekday(day),
                tarefas: tasks
                    .iter()
                    .filter(|t| t.completion_day() == Some(day))
                    .count(),
            })
            .collect()
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for MetricsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsEngine").finish_non_exhaustive()
    }
}

/// Summary statistics at `now`.
pub fn statistics(tasks: &[Task], now: DateTime<Local>) -> Statistics {
    let now = now.naive_local();
    let total = tasks.len();
    let completed: Vec<&Task> = tasks.iter().filter(|t| t.completed).collect();

    let completed_tasks_percentage = if total > 0 {
        (completed.len() as f64 / total as f64 * 100.0).round() as u8
    } else {
        0
    };

    let overdue_activities = tasks.iter().filter(|t| t.is_overdue(now)).count();

    let average_grade = if completed.is_empty() {
        0.0
    } else {
        let sum: f64 = completed.iter().map(|t| t.grade.unwrap_or(0.0)).sum();
        round2(sum / completed.len() as f64)
    };

    Statistics {
        completed_tasks_percentage,
        average_grade,
        days_until_next_exam: 0,
        overdue_activities,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
