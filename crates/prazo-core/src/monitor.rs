//! Periodic overdue check.
//!
//! While active, the monitor wakes on a fixed period, reads the tracker's
//! current task list and raises one notification per pending task whose
//! deadline has been reached. It polls rather than tracking transitions, so
//! a task that stays overdue is reported again on every tick until it is
//! completed or removed.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::notify::{Notifier, OverdueNotification};
use crate::task::Task;
use crate::tracker::{self, SharedTracker};

/// Default period between checks.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
pub struct OverdueMonitor {
    period: Duration,
}

impl OverdueMonitor {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Notifications for every pending task due at or before `now`, in
    /// collection order.
    pub fn scan(tasks: &[Task], now: NaiveDateTime) -> Vec<OverdueNotification> {
        tasks
            .iter()
            .filter(|t| t.is_due(now))
            .map(OverdueNotification::for_task)
            .collect()
    }

    /// Run one check against the tracker's current state.
    ///
    /// The tracker lock is held only while scanning; notifications are
    /// delivered after it is released. Returns how many were raised.
    pub fn tick(&self, shared: &SharedTracker, notifier: &dyn Notifier) -> usize {
        let due = {
            let guard = tracker::lock(shared);
            Self::scan(guard.tasks(), guard.now().naive_local())
        };
        let raised = due.len();
        for notification in due {
            notifier.notify(notification);
        }
        if raised > 0 {
            debug!(raised, "overdue check raised notifications");
        }
        raised
    }

    /// Start checking on a background task. The first check happens one
    /// full period after activation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self, shared: SharedTracker, notifier: Arc<dyn Notifier>) -> MonitorHandle {
        let period = self.period;
        info!(period_secs = period.as_secs(), "overdue monitor started");
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                self.tick(&shared, notifier.as_ref());
            }
        });
        MonitorHandle { task: Some(task) }
    }
}

impl Default for OverdueMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

/// Owns the running check. Stopping (or dropping) cancels it; no tick runs
/// afterwards.
#[derive(Debug)]
pub struct MonitorHandle {
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the periodic check. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("overdue monitor stopped");
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
