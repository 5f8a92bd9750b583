//! # Taskorbit
//!
//! Data core of a cosmic-themed to-do app: tasks orbit as spheres in the UI,
//! while this crate owns the list of tasks and categories, persists them as
//! JSON, computes completion statistics and asks the host platform to
//! schedule deadline alerts.
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use taskorbit::{JsonFileStore, LogNotifier, Priority, Task, TaskStore};
//!
//! let mut store = TaskStore::open(
//!     Box::new(JsonFileStore::new("/tmp/taskorbit")),
//!     Box::new(LogNotifier),
//! );
//! let task = Task::new("Water plants", "", Utc::now() + Duration::hours(2), Priority::Low);
//! store.schedule_notification(&task);
//! store.add_task(task);
//! ```

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod stats;
pub mod storage;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use logging::{default_log_level, init_logging};
pub use models::{default_categories, Category, CategoryId, Priority, Task, TaskId};
pub use notify::{LogNotifier, NotificationRequest, NotificationService, NotifyError};
pub use stats::{StatusCounts, WindowMode};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use store::{StoreEvent, SubscriptionId, TaskStore};
