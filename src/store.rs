//! The task store: owns tasks and categories, persists every mutation and
//! tells subscribers what changed.
//!
//! Persistence failures never reach callers. They are logged and the
//! in-memory state stays authoritative until the next successful write.

use chrono::Local;
use log::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use crate::models::{default_categories, Category, Task, TaskId};
use crate::notify::{NotificationRequest, NotificationService};
use crate::stats::{self, StatusCounts, WindowMode};
use crate::storage::{self, KeyValueStore};

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// State was (re)loaded or reset wholesale.
    Loaded,
    TaskAdded(TaskId),
    TaskUpdated(TaskId),
    TaskDeleted(TaskId),
    TaskCompleted(TaskId),
}

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

pub struct TaskStore {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    storage: Box<dyn KeyValueStore>,
    notifier: Box<dyn NotificationService>,
    clock: Box<dyn Clock>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl TaskStore {
    /// Opens a store backed by `storage`, using wall-clock time.
    pub fn open(
        storage: Box<dyn KeyValueStore>,
        notifier: Box<dyn NotificationService>,
    ) -> Self {
        Self::with_clock(storage, notifier, Box::new(SystemClock))
    }

    /// Opens a store with an explicit time source.
    ///
    /// Missing or unreadable tasks start empty; missing or unreadable
    /// categories start with the seeded defaults.
    pub fn with_clock(
        storage: Box<dyn KeyValueStore>,
        notifier: Box<dyn NotificationService>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut store = TaskStore {
            tasks: Vec::new(),
            categories: Vec::new(),
            storage,
            notifier,
            clock,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        store.load();
        store
    }

    fn load(&mut self) {
        self.tasks = match storage::load_tasks(self.storage.as_ref()) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("event=load_failed key={} error={}", storage::TASKS_KEY, e);
                Vec::new()
            }
        };

        let seeded = match storage::load_categories(self.storage.as_ref()) {
            Ok(Some(categories)) => {
                self.categories = categories;
                false
            }
            Ok(None) => {
                self.categories = default_categories();
                true
            }
            Err(e) => {
                warn!("event=load_failed key={} error={}", storage::CATEGORIES_KEY, e);
                self.categories = default_categories();
                true
            }
        };
        if seeded {
            // Persist the seeds so their ids stay stable across runs.
            self.persist_categories();
        }

        info!(
            "event=store_loaded tasks={} categories={} seeded={}",
            self.tasks.len(),
            self.categories.len(),
            seeded
        );
        self.emit(StoreEvent::Loaded);
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Case-insensitive lookup by category name.
    pub fn category_named(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Tasks not yet completed, in insertion order.
    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.is_completed)
    }

    /// Read access to the backing key-value store.
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    /// Registers `listener` for every subsequent change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Appends `task` and persists. Ids are not checked for duplicates.
    pub fn add_task(&mut self, mut task: Task) {
        task.normalize_completion(self.clock.now());
        let id = task.id;
        self.tasks.push(task);
        self.persist();
        debug!("event=task_added id={}", id);
        self.emit(StoreEvent::TaskAdded(id));
    }

    /// Replaces the task with the same id wholesale.
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] without touching state when no task has that id.
    pub fn update_task(&mut self, mut task: Task) -> StoreResult<()> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == task.id)
            .ok_or(StoreError::TaskNotFound(task.id))?;
        task.normalize_completion(self.clock.now());
        let id = task.id;
        self.tasks[idx] = task;
        self.persist();
        debug!("event=task_updated id={}", id);
        self.emit(StoreEvent::TaskUpdated(id));
        Ok(())
    }

    /// Removes every task with `id`, cancels its pending alert and persists.
    ///
    /// Returns how many tasks were removed. Subscribers hear about it only
    /// when something was actually removed.
    pub fn delete_task(&mut self, id: TaskId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = before - self.tasks.len();
        self.notifier.cancel(id);
        self.persist();
        debug!("event=task_deleted id={} removed={}", id, removed);
        if removed > 0 {
            self.emit(StoreEvent::TaskDeleted(id));
        }
        removed
    }

    /// Marks the task done as of now and cancels its pending alert.
    ///
    /// Completing an already completed task refreshes its completion date.
    ///
    /// # Errors
    /// Returns [`StoreError::TaskNotFound`] without touching state when no task has that id.
    pub fn complete_task(&mut self, id: TaskId) -> StoreResult<()> {
        let now = self.clock.now();
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))?;
        task.is_completed = true;
        task.completed_date = Some(now);
        self.notifier.cancel(id);
        self.persist();
        debug!("event=task_completed id={}", id);
        self.emit(StoreEvent::TaskCompleted(id));
        Ok(())
    }

    /// Asks the notification service to alert at the task's deadline.
    ///
    /// Completed tasks are skipped. Failures are logged, never returned.
    pub fn schedule_notification(&mut self, task: &Task) {
        if task.is_completed {
            debug!("event=notification_skipped id={} reason=completed", task.id);
            return;
        }
        let request = NotificationRequest::for_task(task);
        if let Err(e) = self.notifier.schedule(request) {
            error!("event=notification_failed id={} error={}", task.id, e);
        }
    }

    /// Tasks completed inside the trailing window ending now.
    pub fn completed_tasks_count(&self, mode: WindowMode) -> usize {
        stats::completed_tasks_count(&self.tasks, mode, &self.clock.now())
    }

    /// Completions per active day, using the local calendar.
    pub fn average_daily_tasks(&self) -> f64 {
        stats::average_daily_tasks(&self.tasks, &Local)
    }

    /// Consecutive local calendar days, ending today, with a completion.
    pub fn completion_streak(&self) -> u32 {
        stats::completion_streak(&self.tasks, &self.clock.now().with_timezone(&Local))
    }

    /// Counts completed, active and overdue tasks as of now.
    pub fn status_breakdown(&self) -> StatusCounts {
        stats::status_breakdown(&self.tasks, &self.clock.now())
    }

    /// Completions on each of the last `days` local calendar days, today first.
    pub fn daily_completions(&self, days: usize) -> Vec<usize> {
        stats::daily_completions(&self.tasks, &self.clock.now().with_timezone(&Local), days)
    }

    /// Wipes persisted state and restores the seeded categories.
    ///
    /// # Errors
    /// Returns the storage error when the persisted entries cannot be removed.
    /// Tasks and their pending alerts are left untouched in that case.
    pub fn reset(&mut self) -> StoreResult<()> {
        storage::delete_database(self.storage.as_mut())?;
        for t in &self.tasks {
            self.notifier.cancel(t.id);
        }
        self.tasks.clear();
        self.categories = default_categories();
        self.persist_categories();
        info!("event=store_reset");
        self.emit(StoreEvent::Loaded);
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = storage::save_tasks(self.storage.as_mut(), &self.tasks) {
            error!("event=save_failed key={} error={}", storage::TASKS_KEY, e);
        }
        self.persist_categories();
    }

    fn persist_categories(&mut self) {
        if let Err(e) = storage::save_categories(self.storage.as_mut(), &self.categories) {
            error!("event=save_failed key={} error={}", storage::CATEGORIES_KEY, e);
        }
    }
}
