// Data models for the task list

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Category given to tasks created or loaded without one
pub const DEFAULT_CATEGORY: &str = "General";

/// A single unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub priority: String,
    /// `YYYY-MM-DD`, compared as plain text
    pub deadline: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_category", deserialize_with = "deserialize_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let category = String::deserialize(deserializer)?;
    Ok(category_or_default(category))
}

fn category_or_default(category: String) -> String {
    if category.is_empty() { default_category() } else { category }
}

impl Task {
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// Sort rank of this task's priority (see [`priority_rank`])
    pub fn priority_rank(&self) -> u8 {
        priority_rank(&self.priority)
    }
}

impl From<NewTask> for Task {
    fn from(new: NewTask) -> Self {
        Task {
            name: new.name,
            priority: new.priority,
            deadline: new.deadline,
            completed: false,
            category: category_or_default(new.category.unwrap_or_default()),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Priority: {}, Deadline: {}, Category: {})",
            self.name, self.priority, self.deadline, self.category
        )
    }
}

/// Rank used when sorting by priority: high=1, medium=2, low=3, anything else 4
pub fn priority_rank(priority: &str) -> u8 {
    match priority.to_lowercase().as_str() {
        "high" => 1,
        "medium" => 2,
        "low" => 3,
        _ => 4,
    }
}

/// Fields for a task about to be added.
///
/// `category` is optional; `None` or an empty string becomes
/// [`DEFAULT_CATEGORY`]. New tasks always start out pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub priority: String,
    pub deadline: String,
    pub category: Option<String>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, priority: impl Into<String>, deadline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: priority.into(),
            deadline: deadline.into(),
            category: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Replacement values for an existing task.
///
/// A field that is `None` or empty leaves the task's value as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub name: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
}

impl TaskEdit {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Apply the supplied fields to `task`, returning true if anything changed
    pub(crate) fn apply(&self, task: &mut Task) -> bool {
        let mut changed = false;
        for (value, field) in [
            (&self.name, &mut task.name),
            (&self.priority, &mut task.priority),
            (&self.deadline, &mut task.deadline),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                changed |= *field != value;
                *field = value.to_string();
            }
        }
        changed
    }
}

/// Ordering applied by [`TaskStore::sort`](crate::TaskStore::sort)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Deadline,
    Priority,
    Name,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Deadline => "deadline",
            SortKey::Priority => "priority",
            SortKey::Name => "name",
        }
    }
}

impl FromStr for SortKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deadline" => Ok(SortKey::Deadline),
            "priority" => Ok(SortKey::Priority),
            "name" => Ok(SortKey::Name),
            other => Err(StoreError::InvalidOption(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
