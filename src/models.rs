use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a task. Never reused within a store.
pub type TaskId = Uuid;

/// Identifier of a category.
pub type CategoryId = Uuid;

/// How important a task is. Drives orbit placement in the UI.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "unknown priority '{}'. Supported: low, medium, high.",
                other
            )),
        }
    }
}

/// A labeled grouping of tasks with a gradient color scheme.
///
/// Two categories are equal when their ids are equal, regardless of name or colors.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Category {
    /// Unique identifier, assigned at creation.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Gradient stops as hex strings (e.g. `#4A90E2`). Opaque to the store.
    #[serde(default)]
    pub color: Vec<String>,
}

impl Category {
    /// Creates a category with a freshly generated id.
    pub fn new(name: impl Into<String>, color: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color,
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Categories a fresh store starts with.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("Work", vec!["#4A90E2".into(), "#7B4DFF".into()]),
        Category::new("Personal", vec!["#FF6FD8".into(), "#FF9A44".into()]),
        Category::new("Health", vec!["#2BD9A8".into(), "#1FA2FF".into()]),
    ]
}

/// Represents a single to-do item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier for the task. Immutable after creation.
    pub id: TaskId,
    /// Short title shown on the task sphere.
    pub title: String,
    /// Free-form details.
    #[serde(default)]
    pub description: String,
    /// When the task is due.
    pub deadline: DateTime<Utc>,
    pub priority: Priority,
    /// Whether the task has been completed.
    #[serde(default)]
    pub is_completed: bool,
    /// Set exactly when `is_completed` is true.
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    /// Snapshot of the category at assignment time, not a live reference.
    #[serde(default)]
    pub category: Option<Category>,
    /// Plain labels, in display order.
    #[serde(default)]
    pub subtasks: Vec<String>,
}

impl Task {
    /// Creates an open task with a generated id, no category and no subtasks.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            deadline,
            priority,
            is_completed: false,
            completed_date: None,
            category: None,
            subtasks: Vec::new(),
        }
    }

    /// Embeds a copy of `category`. Later edits to the original are not reflected.
    pub fn with_category(mut self, category: &Category) -> Self {
        self.category = Some(category.clone());
        self
    }

    pub fn with_subtasks<I, S>(mut self, subtasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtasks = subtasks.into_iter().map(Into::into).collect();
        self
    }

    /// Restores the completion invariant: `completed_date` is `Some` iff `is_completed`.
    pub(crate) fn normalize_completion(&mut self, now: DateTime<Utc>) {
        if self.is_completed {
            if self.completed_date.is_none() {
                self.completed_date = Some(now);
            }
        } else {
            self.completed_date = None;
        }
    }
}
