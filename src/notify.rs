use chrono::{DateTime, Utc};
use log::info;
use thiserror::Error;

use crate::models::{Task, TaskId};

/// Body used when a task has no description.
pub const FALLBACK_BODY: &str = "Your task is due now.";

/// A one-shot local alert, keyed by the task it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub id: TaskId,
    pub title: String,
    pub body: String,
    /// Instant the alert fires. Never repeats.
    pub trigger: DateTime<Utc>,
}

impl NotificationRequest {
    /// Builds the alert for `task`'s deadline.
    pub fn for_task(task: &Task) -> Self {
        let body = if task.description.trim().is_empty() {
            FALLBACK_BODY.to_string()
        } else {
            task.description.clone()
        };
        Self {
            id: task.id,
            title: task.title.clone(),
            body,
            trigger: task.deadline,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification permission denied")]
    PermissionDenied,
    #[error("notification service unavailable: {0}")]
    Unavailable(String),
}

/// Delivers local alerts. Implemented outside this crate by the host platform.
pub trait NotificationService {
    /// Schedules `request`, replacing any pending alert with the same id.
    fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotifyError>;
    /// Drops the pending alert for `id`, if any.
    fn cancel(&mut self, id: TaskId);
}

/// Writes requests to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationService for LogNotifier {
    fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotifyError> {
        info!(
            "event=notification_scheduled id={} trigger={}",
            request.id,
            request.trigger.to_rfc3339()
        );
        Ok(())
    }

    fn cancel(&mut self, id: TaskId) {
        info!("event=notification_cancelled id={}", id);
    }
}
