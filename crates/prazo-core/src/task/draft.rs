//! Raw creation form for a task.

use serde::{Deserialize, Serialize};

use super::{parse_date, parse_time_of_day, Task, TaskId};

/// Field values as typed into the "new task" form.
///
/// Date and time stay as strings here; [`TaskDraft::build`] decides whether
/// the form is complete enough to become a [`Task`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub deadline: String,
    pub deadline_time: String,
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TaskDraft {
    pub fn new(
        title: impl Into<String>,
        deadline: impl Into<String>,
        deadline_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            deadline: deadline.into(),
            deadline_time: deadline_time.into(),
            grade: None,
            notes: None,
        }
    }

    pub fn with_grade(mut self, grade: f64) -> Self {
        self.grade = Some(grade);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Turn the form into a pending task with the given id.
    ///
    /// Returns `None` when title, date or time is blank, or when the date or
    /// time does not parse.
    pub fn build(&self, id: TaskId) -> Option<Task> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        let deadline = parse_date(&self.deadline)?;
        let deadline_time = parse_time_of_day(&self.deadline_time)?;
        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Some(Task {
            id,
            title: title.to_string(),
            deadline,
            deadline_time,
            completed: false,
            completed_at: None,
            grade: self.grade,
            notes,
        })
    }
}
