use serde::Serialize;

use crate::model::task::{Task, TaskId};
use crate::ops::present::{format_details, render_line, status_category, status_label};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    /// Status category name (done, urgent, normal, low)
    pub status: &'static str,
    /// The display line as shown by `list`
    pub line: String,
}

#[derive(Serialize)]
pub struct ClearJson {
    pub cleared: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson<'_> {
    TaskJson {
        task,
        status: status_category(task).as_str(),
        line: render_line(task),
    }
}

pub fn tasks_to_json(tasks: &[Task]) -> Vec<TaskJson<'_>> {
    tasks.iter().map(task_to_json).collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One line per task, IDs right-aligned: `  3  [ ] Buy milk (High) - Due: ...`
pub fn format_task_list(tasks: &[Task]) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["no tasks".to_string()];
    }
    let width = tasks
        .iter()
        .map(|t| t.id.to_string().len())
        .max()
        .unwrap_or(1);
    tasks
        .iter()
        .map(|t| format!("{:>width$}  {}", t.id, render_line(t), width = width))
        .collect()
}

/// Detail block with the task ID on top
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![format!("#{}", task.id)];
    lines.extend(format_details(task));
    lines
}

pub fn format_toggled(task: &Task) -> String {
    format!("{} marked as {}", task.id, status_label(task))
}

pub fn format_deleted(task: &Task) -> String {
    format!("deleted {} '{}'", task.id, task.name)
}

/// Parse a task ID argument, accepting an optional leading `#`
pub fn parse_task_id(s: &str) -> Result<TaskId, String> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    match digits.parse::<TaskId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("invalid task id '{}'", s)),
    }
}
