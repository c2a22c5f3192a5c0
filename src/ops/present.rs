//! Display text and status buckets for tasks.
//!
//! Everything here is a pure function of a `Task`; the CLI and TUI decide
//! how to draw the results.

use crate::model::task::{Priority, Task};

/// Mark shown inside the brackets of a completed task
pub const CHECK_MARK: char = '\u{2713}';

/// Derived bucket used to pick a visual treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    Done,
    UrgentPending,
    NormalPending,
    LowPending,
}

impl StatusCategory {
    /// Short name used in JSON output and theme keys
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCategory::Done => "done",
            StatusCategory::UrgentPending => "urgent",
            StatusCategory::NormalPending => "normal",
            StatusCategory::LowPending => "low",
        }
    }
}

/// `[<mark>] <name> (<priority>) - Due: <due_date>`
pub fn render_line(task: &Task) -> String {
    let mark = if task.completed { CHECK_MARK } else { ' ' };
    format!(
        "[{}] {} ({}) - Due: {}",
        mark, task.name, task.priority, task.due_date
    )
}

/// Completion wins over priority
pub fn status_category(task: &Task) -> StatusCategory {
    if task.completed {
        return StatusCategory::Done;
    }
    match task.priority {
        Priority::High => StatusCategory::UrgentPending,
        Priority::Medium => StatusCategory::NormalPending,
        Priority::Low => StatusCategory::LowPending,
    }
}

/// "completed" or "incomplete", for toggle feedback
pub fn status_label(task: &Task) -> &'static str {
    if task.completed { "completed" } else { "incomplete" }
}

/// Full detail block for a single task
pub fn format_details(task: &Task) -> Vec<String> {
    vec![
        "Task Details:".to_string(),
        "\u{2501}".repeat(20),
        format!("Name: {}", task.name),
        format!("Priority: {}", task.priority),
        format!("Due Date: {}", task.due_date),
        format!(
            "Status: {}",
            if task.completed { "Completed" } else { "Pending" }
        ),
        format!("Created: {}", task.created_at),
    ]
}
