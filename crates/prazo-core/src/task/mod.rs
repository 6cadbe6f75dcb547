//! Task model.
//!
//! A task is a titled deadline (date + time of day) that can be marked
//! complete, optionally carrying a grade and free-form notes.
//!
//! ## Invariant
//!
//! `completed_at` is present if and only if `completed` is true. The store
//! is the only place that flips completion, and it keeps both in step.

mod draft;
mod filter;

pub use draft::TaskDraft;
pub use filter::FilterMode;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Task identifier. Assigned from the creation timestamp (ms), strictly
/// increasing within one store.
pub type TaskId = i64;

/// One unit of work with a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Display title (never empty for stored tasks)
    pub title: String,
    /// Due date
    pub deadline: NaiveDate,
    /// Due time of day, paired with `deadline`
    #[serde(with = "hhmm")]
    pub deadline_time: NaiveTime,
    /// Whether the task is completed
    #[serde(default)]
    pub completed: bool,
    /// When the task was last marked complete (null if pending)
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
    /// Optional score; only counted for completed tasks
    #[serde(default)]
    pub grade: Option<f64>,
    /// Optional free text
    #[serde(default)]
    pub notes: Option<String>,
}

impl Task {
    /// Deadline date and time of day as one local wall-clock instant.
    pub fn deadline_instant(&self) -> NaiveDateTime {
        self.deadline.and_time(self.deadline_time)
    }

    /// Incomplete and strictly past its deadline instant.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.deadline_instant() < now
    }

    /// Incomplete and due at or before `now`.
    ///
    /// The notification check is inclusive of the deadline minute itself,
    /// unlike [`Task::is_overdue`].
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.deadline_instant() <= now
    }

    /// Calendar day a completed task is bucketed under.
    ///
    /// Uses the recorded completion instant, falling back to the deadline
    /// date for tasks that are completed but carry no instant. Pending tasks
    /// have no completion day.
    pub fn completion_day(&self) -> Option<NaiveDate> {
        if !self.completed {
            return None;
        }
        Some(
            self.completed_at
                .map(|at| at.date_naive())
                .unwrap_or(self.deadline),
        )
    }

    /// Flip completion, stamping or clearing `completed_at`.
    pub(crate) fn toggle(&mut self, now: DateTime<Local>) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
    }
}

/// Parse a `HH:MM` or `HH:MM:SS` time of day.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Serde adapter keeping times of day in the `HH:MM` form used by forms.
/// Seconds are written only when present.
mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        let format = if time.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
        s.serialize_str(&time.format(format).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time_of_day(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid time of day: {raw}")))
    }
}
