//! Ordered, in-memory task collection.
//!
//! Every mutating operation notifies the registered change listeners exactly
//! once, synchronously, after the change is applied. Operations naming an
//! unknown id still notify (the collection is re-read either way); a rejected
//! draft does not, since nothing reached the collection.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::clock::{SharedClock, SystemClock};
use crate::task::{FilterMode, Task, TaskDraft, TaskId};

/// Callback fired after every mutation with the full, current collection.
pub type ChangeListener = Box<dyn FnMut(&[Task]) + Send>;

pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: TaskId,
    editing: Option<TaskId>,
    listeners: Vec<ChangeListener>,
    clock: SharedClock,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: SharedClock) -> Self {
        Self {
            tasks: Vec::new(),
            last_id: 0,
            editing: None,
            listeners: Vec::new(),
            clock,
        }
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Register a listener to be called after each mutation.
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Id of the task currently open for editing, if any.
    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    /// Tasks matching `mode` at the clock's current instant, in insertion order.
    pub fn filter(&self, mode: FilterMode) -> Vec<&Task> {
        let now = self.clock.now().naive_local();
        self.filter_at(mode, now)
    }

    pub fn filter_at(&self, mode: FilterMode, now: chrono::NaiveDateTime) -> Vec<&Task> {
        self.tasks.iter().filter(|t| mode.matches(t, now)).collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a task built from `draft`.
    ///
    /// Returns the new id, or `None` (and leaves the store untouched) when
    /// the draft is incomplete.
    pub fn add(&mut self, draft: &TaskDraft) -> Option<TaskId> {
        let id = self.next_id();
        let Some(task) = draft.build(id) else {
            debug!(title = %draft.title, "rejected incomplete task draft");
            return None;
        };
        self.last_id = id;
        self.tasks.push(task);
        self.notify();
        Some(id)
    }

    /// Delete the task with `id`. Returns whether a task was removed.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if !removed {
            debug!(id, "remove: no such task");
        }
        if removed && self.editing == Some(id) {
            self.editing = None;
        }
        self.notify();
        removed
    }

    /// Flip completion of the task with `id`. Returns whether a task matched.
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        let now = self.clock.now();
        let found = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.toggle(now);
                true
            }
            None => {
                debug!(id, "toggle: no such task");
                false
            }
        };
        self.notify();
        found
    }

    /// Replace the stored task sharing `task.id` wholesale and close any
    /// edit session. Returns whether a task matched.
    pub fn update(&mut self, mut task: Task) -> bool {
        if !task.completed {
            task.completed_at = None;
        }
        let found = match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => {
                debug!(id = task.id, "update: no such task");
                false
            }
        };
        self.editing = None;
        self.notify();
        found
    }

    /// Open an edit session on `id`, returning a copy to edit.
    ///
    /// Not a mutation: listeners are not notified.
    pub fn begin_edit(&mut self, id: TaskId) -> Option<Task> {
        let task = self.get(id)?.clone();
        self.editing = Some(id);
        Some(task)
    }

    /// Close the edit session without saving.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.notify();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn next_id(&self) -> TaskId {
        let stamp = self.clock.now().timestamp_millis();
        stamp.max(self.last_id + 1)
    }

    fn notify(&mut self) {
        for listener in self.listeners.iter_mut() {
            listener(&self.tasks);
        }
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("editing", &self.editing)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store_at(y: i32, m: u32, d: u32) -> (TaskStore, FixedClock) {
        let clock = FixedClock::at_local(y, m, d, 12, 0).unwrap();
        (TaskStore::with_clock(Arc::new(clock.clone())), clock)
    }

    fn counted(store: &mut TaskStore) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        store.subscribe(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        count
    }

    #[test]
    fn add_appends_pending_task_with_fresh_ids() {
        let (mut store, _) = store_at(2024, 1, 5);
        let a = store.add(&TaskDraft::new("A", "2024-01-10", "10:00")).unwrap();
        let b = store.add(&TaskDraft::new("B", "2024-01-11", "10:00")).unwrap();
        assert!(b > a);
        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].title, "A");
        assert!(!store.tasks()[1].completed);
        assert!(store.tasks()[1].completed_at.is_none());
    }

    #[test]
    fn ids_follow_the_clock_and_stay_monotonic() {
        let (mut store, clock) = store_at(2024, 1, 5);
        let first = store.add(&TaskDraft::new("A", "2024-01-10", "10:00")).unwrap();
        assert_eq!(first, clock.now().timestamp_millis());

        clock.advance(Duration::milliseconds(-500));
        let second = store.add(&TaskDraft::new("B", "2024-01-10", "10:00")).unwrap();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn rejected_draft_changes_nothing_and_does_not_notify() {
        let (mut store, _) = store_at(2024, 1, 5);
        let fired = counted(&mut store);
        assert!(store.add(&TaskDraft::new("", "2024-01-10", "10:00")).is_none());
        assert!(store.add(&TaskDraft::new("A", "2024-01-10", "")).is_none());
        assert!(store.is_empty());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn every_mutation_notifies_exactly_once() {
        let (mut store, _) = store_at(2024, 1, 5);
        let fired = counted(&mut store);

        let id = store.add(&TaskDraft::new("A", "2024-01-10", "10:00")).unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        store.toggle_complete(id);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        let task = store.begin_edit(id).unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        store.update(task);
        assert_eq!(fired.load(Ordering::SeqCst), 3);
        store.begin_edit(id);
        store.cancel_edit();
        assert_eq!(fired.load(Ordering::SeqCst), 4);
        store.remove(id);
        assert_eq!(fired.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn unknown_ids_are_no_ops_that_still_notify() {
        let (mut store, _) = store_at(2024, 1, 5);
        let id = store.add(&TaskDraft::new("A", "2024-01-10", "10:00")).unwrap();
        let fired = counted(&mut store);
        let snapshot = store.tasks().to_vec();

        assert!(!store.remove(id + 100));
        assert!(!store.toggle_complete(id + 100));
        let mut ghost = snapshot[0].clone();
        ghost.id = id + 100;
        assert!(!store.update(ghost));

        assert_eq!(store.tasks(), snapshot.as_slice());
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn toggle_stamps_and_clears_completed_at() {
        let (mut store, clock) = store_at(2024, 1, 5);
        let id = store.add(&TaskDraft::new("A", "2024-01-10", "10:00")).unwrap();

        store.toggle_complete(id);
        let task = store.get(id).unwrap();
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(clock.now()));

        store.toggle_complete(id);
        let task = store.get(id).unwrap();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn update_overwrites_whole_task_and_ends_edit() {
        let (mut store, _) = store_at(2024, 1, 5);
        let id = store
            .add(&TaskDraft::new("A", "2024-01-10", "10:00").with_notes("keep?"))
            .unwrap();
        let mut edited = store.begin_edit(id).unwrap();
        assert_eq!(store.editing(), Some(id));

        edited.title = "A2".to_string();
        edited.notes = None;
        edited.deadline = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(store.update(edited.clone()));

        assert_eq!(store.get(id), Some(&edited));
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn update_drops_stale_completion_instant_on_pending_task() {
        let (mut store, clock) = store_at(2024, 1, 5);
        let id = store.add(&TaskDraft::new("A", "2024-01-10", "10:00")).unwrap();
        let mut edited = store.get(id).unwrap().clone();
        edited.completed_at = Some(clock.now());
        store.update(edited);
        assert!(store.get(id).unwrap().completed_at.is_none());
    }

    #[test]
    fn cancel_edit_closes_session_without_changes() {
        let (mut store, _) = store_at(2024, 1, 5);
        let id = store.add(&TaskDraft::new("A", "2024-01-10", "10:00")).unwrap();
        let before = store.tasks().to_vec();
        store.begin_edit(id);
        store.cancel_edit();
        assert_eq!(store.editing(), None);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn begin_edit_on_unknown_id_opens_nothing() {
        let (mut store, _) = store_at(2024, 1, 5);
        assert!(store.begin_edit(7).is_none());
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn filter_views_preserve_order() {
        let (mut store, _) = store_at(2024, 1, 15);
        let past = store.add(&TaskDraft::new("past", "2024-01-10", "10:00")).unwrap();
        let done = store.add(&TaskDraft::new("done", "2024-01-01", "10:00")).unwrap();
        store.add(&TaskDraft::new("future", "2024-02-10", "10:00")).unwrap();
        store.toggle_complete(done);

        let titles = |mode| {
            store
                .filter(mode)
                .into_iter()
                .map(|t| t.title.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(titles(FilterMode::All), ["past", "done", "future"]);
        assert_eq!(titles(FilterMode::Completed), ["done"]);
        assert_eq!(titles(FilterMode::Pending), ["past", "future"]);
        assert_eq!(titles(FilterMode::Overdue), ["past"]);
        assert!(store.get(past).is_some());
    }

    #[test]
    fn moving_deadline_into_the_past_makes_task_overdue() {
        let (mut store, _) = store_at(2024, 1, 15);
        let id = store.add(&TaskDraft::new("A", "2024-03-01", "10:00")).unwrap();
        assert!(store.filter(FilterMode::Overdue).is_empty());

        let mut edited = store.get(id).unwrap().clone();
        edited.deadline = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        store.update(edited);

        let overdue = store.filter(FilterMode::Overdue);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, id);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u32),
        Toggle(usize),
        Remove(usize),
        Tick(i64),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..60).prop_map(Op::Add),
            (0usize..8).prop_map(Op::Toggle),
            (0usize..8).prop_map(Op::Remove),
            (1i64..48).prop_map(Op::Tick),
        ]
    }

    proptest! {
        #[test]
        fn completion_flag_and_instant_stay_in_step(ops in prop::collection::vec(arb_op(), 0..40)) {
            let (mut store, clock) = store_at(2024, 1, 15);
            for op in ops {
                match op {
                    Op::Add(offset) => {
                        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(offset as u64);
                        store.add(&TaskDraft::new("t", day.format("%Y-%m-%d").to_string(), "12:00"));
                    }
                    Op::Toggle(i) => {
                        if let Some(id) = store.tasks().get(i).map(|t| t.id) {
                            store.toggle_complete(id);
                        }
                    }
                    Op::Remove(i) => {
                        if let Some(id) = store.tasks().get(i).map(|t| t.id) {
                            store.remove(id);
                        }
                    }
                    Op::Tick(hours) => clock.advance(Duration::hours(hours)),
                }
                for task in store.tasks() {
                    prop_assert_eq!(task.completed, task.completed_at.is_some());
                }
                prop_assert!(store.filter(FilterMode::Overdue).iter().all(|t| !t.completed));
            }
        }

        #[test]
        fn toggling_twice_restores_pending_state(offset in 0u32..60) {
            let (mut store, _) = store_at(2024, 1, 15);
            let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(offset as u64);
            let id = store
                .add(&TaskDraft::new("t", day.format("%Y-%m-%d").to_string(), "12:00").with_grade(5.0))
                .unwrap();
            let before = store.get(id).cloned();
            store.toggle_complete(id);
            store.toggle_complete(id);
            prop_assert_eq!(store.get(id).cloned(), before);
        }
    }
}
