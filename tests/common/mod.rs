#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use taskorbit::{
    FixedClock, MemoryStore, NotificationRequest, NotificationService, NotifyError, Priority,
    Task, TaskId, TaskStore,
};

/// What the store asked the notification service to do.
#[derive(Debug, Default)]
pub struct NotifierLog {
    pub scheduled: Vec<NotificationRequest>,
    pub cancelled: Vec<TaskId>,
}

/// Notification service that records calls and can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub log: Rc<RefCell<NotifierLog>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

impl NotificationService for RecordingNotifier {
    fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::PermissionDenied);
        }
        self.log.borrow_mut().scheduled.push(request);
        Ok(())
    }

    fn cancel(&mut self, id: TaskId) {
        self.log.borrow_mut().cancelled.push(id);
    }
}

/// Today at local noon, so whole-day offsets never cross a calendar boundary.
pub fn local_noon_today() -> DateTime<Utc> {
    let noon = Local::now()
        .date_naive()
        .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    Local.from_local_datetime(&noon).earliest().unwrap().with_timezone(&Utc)
}

/// In-memory store pinned to `now`, plus a handle on its notifier.
pub fn memory_store_at(now: DateTime<Utc>) -> (TaskStore, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let store = TaskStore::with_clock(
        Box::new(MemoryStore::new()),
        Box::new(notifier.clone()),
        Box::new(FixedClock(now)),
    );
    (store, notifier)
}

pub fn task(title: &str) -> Task {
    Task::new(title, "", Utc::now() + Duration::days(1), Priority::Medium)
}

/// A completed task whose completion happened at `at`.
pub fn completed_at(title: &str, at: DateTime<Utc>) -> Task {
    let mut t = task(title);
    t.is_completed = true;
    t.completed_date = Some(at);
    t
}
