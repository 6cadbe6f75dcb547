use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Task;
use crate::error::ValidationError;

/// Which slice of the task list a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Everything, in insertion order
    #[default]
    All,
    /// `completed == true`
    Completed,
    /// `completed == false`
    Pending,
    /// Pending and strictly past the deadline instant
    Overdue,
}

impl FilterMode {
    pub fn matches(&self, task: &Task, now: NaiveDateTime) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Completed => task.completed,
            FilterMode::Pending => !task.completed,
            FilterMode::Overdue => task.is_overdue(now),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::All => write!(f, "all"),
            FilterMode::Completed => write!(f, "completed"),
            FilterMode::Pending => write!(f, "pending"),
            FilterMode::Overdue => write!(f, "overdue"),
        }
    }
}

impl FromStr for FilterMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "completed" => Ok(FilterMode::Completed),
            "pending" => Ok(FilterMode::Pending),
            "overdue" => Ok(FilterMode::Overdue),
            other => Err(ValidationError::invalid(
                "filter",
                format!("expected all, completed, pending or overdue, got '{other}'"),
            )),
        }
    }
}
