//! Notification sink.
//!
//! The core decides *when* a deadline warning is raised; how it is shown
//! (toast, terminal line, desktop notification) belongs to the [`Notifier`].

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

use crate::task::{Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

/// Raised for a pending task whose deadline has been reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueNotification {
    pub task_id: TaskId,
    pub title: String,
    pub severity: Severity,
}

impl OverdueNotification {
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id,
            title: task.title.clone(),
            severity: Severity::Warning,
        }
    }

    pub fn heading(&self) -> &'static str {
        "Prazo Ultrapassado"
    }

    pub fn message(&self) -> String {
        format!("A tarefa \"{}\" ultrapassou o prazo!", self.title)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: OverdueNotification);
}

/// Forwards notifications to a channel consumed by the presentation layer.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<OverdueNotification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OverdueNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: OverdueNotification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}

/// Writes each notification to the log at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: OverdueNotification) {
        warn!(task_id = notification.task_id, "{}: {}", notification.heading(), notification.message());
    }
}
