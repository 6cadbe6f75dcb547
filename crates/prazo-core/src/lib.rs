//! # Prazo Core Library
//!
//! Task state model and derived-metrics engine for a personal deadline
//! tracker. The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **TaskStore**: ordered in-memory task collection. Every mutation
//!   notifies registered listeners synchronously.
//! - **MetricsEngine**: pure recompute of summary statistics and the 7-day
//!   completion histogram, attached to the store as a listener.
//! - **OverdueMonitor**: periodic re-check of deadlines that raises a
//!   notification for every pending task that is due.
//!
//! ## Key Components
//!
//! - [`Tracker`]: command surface returning a [`TrackerView`] per command
//! - [`OverdueMonitor`] / [`MonitorHandle`]: cancellable periodic check
//! - [`Notifier`]: sink for [`OverdueNotification`]s
//! - [`Config`]: application configuration management

pub mod clock;
pub mod config;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod notify;
pub mod store;
pub mod task;
pub mod tracker;

pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use config::Config;
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use metrics::{
    DayNameFormatter, Metrics, MetricsEngine, MetricsHandle, ProgressPoint, PtBrWeekdays,
    Statistics,
};
pub use monitor::{MonitorHandle, OverdueMonitor};
pub use notify::{ChannelNotifier, LogNotifier, Notifier, OverdueNotification, Severity};
pub use store::{ChangeListener, TaskStore};
pub use task::{FilterMode, Task, TaskDraft, TaskId};
pub use tracker::{SharedTracker, Tracker, TrackerView};
