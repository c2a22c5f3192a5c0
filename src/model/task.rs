use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable task identifier. `0` means "not yet assigned".
pub type TaskId = u64;

/// Stored in place of an empty due date
pub const NO_DUE_DATE: &str = "No due date";

/// Format of `Task::created_at`
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities, highest first
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Parse a priority name, case-insensitive. Accepts `h`/`m`/`l` shorthands.
    pub fn parse_priority(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Some(Priority::High),
            "medium" | "m" => Some(Priority::Medium),
            "low" | "l" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_due_date() -> String {
    NO_DUE_DATE.to_string()
}

/// A single to-do item as persisted in the data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable ID, assigned by the store (absent in files from older versions)
    #[serde(default)]
    pub id: TaskId,
    /// Trimmed, non-empty task name
    pub name: String,
    pub priority: Priority,
    /// Free-form due date, or `NO_DUE_DATE`
    #[serde(default = "default_due_date")]
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
    /// Creation timestamp in `CREATED_AT_FORMAT`, never changed after creation
    pub created_at: String,
}

impl Task {
    /// Create a pending task with no ID assigned yet
    pub fn new(name: String, priority: Priority, due_date: String, created_at: String) -> Self {
        Task {
            id: 0,
            name,
            priority,
            due_date,
            completed: false,
            created_at,
        }
    }
}
