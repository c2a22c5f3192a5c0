use std::collections::HashSet;

use chrono::{Local, NaiveDateTime};

use crate::model::task::{CREATED_AT_FORMAT, NO_DUE_DATE, Priority, Task, TaskId};

/// Placeholder value a priority picker shows before the user chooses one
pub const PRIORITY_SENTINEL: &str = "Select Priority";

/// Error type for task validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task name cannot be empty")]
    EmptyName,
    #[error("please select a priority level")]
    PriorityUnset,
    #[error("invalid priority '{0}' (expected high, medium or low)")]
    InvalidPriority(String),
}

/// Raw user input for a new task, before validation
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub priority: Option<Priority>,
    pub due_date: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Parse priority text from a form field or CLI flag.
/// Blank text and the picker placeholder mean "not chosen".
pub fn parse_priority(text: &str) -> Result<Priority, TaskError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == PRIORITY_SENTINEL {
        return Err(TaskError::PriorityUnset);
    }
    Priority::parse_priority(trimmed).ok_or_else(|| TaskError::InvalidPriority(trimmed.to_string()))
}

/// Validate `input` and build a pending task stamped with `now`.
/// The returned task has no ID; the store assigns one on append.
pub fn create_task(input: NewTask, now: NaiveDateTime) -> Result<Task, TaskError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(TaskError::EmptyName);
    }
    let priority = input.priority.ok_or(TaskError::PriorityUnset)?;

    Ok(Task::new(
        name.to_string(),
        priority,
        normalize_due_date(&input.due_date),
        now.format(CREATED_AT_FORMAT).to_string(),
    ))
}

/// `create_task` stamped with the current local time
pub fn create_task_now(input: NewTask) -> Result<Task, TaskError> {
    create_task(input, Local::now().naive_local())
}

/// Trim a due date, substituting the placeholder for blank input
pub fn normalize_due_date(due_date: &str) -> String {
    let trimmed = due_date.trim();
    if trimmed.is_empty() {
        NO_DUE_DATE.to_string()
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// IDs
// ---------------------------------------------------------------------------

/// Next free ID: one past the largest in use. None once `TaskId::MAX` is taken.
pub fn next_id(tasks: &[Task]) -> Option<TaskId> {
    tasks.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)
}

/// Give every task without an ID, or with an ID already taken by an earlier
/// task, a fresh one. Returns whether anything changed, or None if the ID
/// space ran out.
pub fn assign_missing_ids(tasks: &mut [Task]) -> Option<bool> {
    let mut next = next_id(tasks);
    let mut seen = HashSet::new();
    let mut changed = false;
    for task in tasks.iter_mut() {
        if task.id == 0 || !seen.insert(task.id) {
            let id = next?;
            task.id = id;
            seen.insert(id);
            next = id.checked_add(1);
            changed = true;
        }
    }
    Some(changed)
}

/// Position of the task with `id`
pub fn find_index(tasks: &[Task], id: TaskId) -> Option<usize> {
    tasks.iter().position(|t| t.id == id)
}

pub fn find_task(tasks: &[Task], id: TaskId) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}

/// Flip completion state
pub fn toggle_completed(task: &mut Task) {
    task.completed = !task.completed;
}
