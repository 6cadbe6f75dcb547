//! Wall-clock source.
//!
//! Everything that asks "what time is it" goes through a [`Clock`] so that
//! overdue detection and the weekly window can be pinned in tests.

use chrono::{DateTime, Local, TimeZone};
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: Arc<Mutex<DateTime<Local>>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            at: Arc::new(Mutex::new(at)),
        }
    }

    /// Build a clock from local wall-clock components.
    ///
    /// Returns `None` when the components do not name a single local instant
    /// (invalid date, or a DST gap/overlap).
    pub fn at_local(year: i32, month: u32, day: u32, hour: u32, min: u32) -> Option<Self> {
        Local
            .with_ymd_and_hms(year, month, day, hour, min, 0)
            .single()
            .map(Self::new)
    }

    pub fn set(&self, at: DateTime<Local>) {
        *self.at.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut at = self.at.lock().unwrap_or_else(|e| e.into_inner());
        *at += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.at.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Shared handle used by the store, engine and monitor.
pub type SharedClock = Arc<dyn Clock>;
