use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::io::lock::{DEFAULT_LOCK_TIMEOUT, FileLock, LockError};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::task::{Task, TaskId};
use crate::ops::task_ops;

/// Default data file, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "tasks.json";

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no task at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("no task ids left in {path}")]
    IdOverflow { path: PathBuf },
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// The JSON file holding the task list.
///
/// Every mutation locks the file, reads the whole list, changes it in memory
/// and writes the whole list back. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
    lock_timeout: Duration,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // -----------------------------------------------------------------------
    // Whole-list access
    // -----------------------------------------------------------------------

    /// Read the task list, creating an empty data file on first run.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            let _lock = self.lock()?;
            if !self.path.exists() {
                self.write_tasks(&[])?;
                return Ok(Vec::new());
            }
        }
        self.read_tasks()
    }

    /// Replace the whole persisted list.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        self.write_tasks(tasks)
    }

    /// Delete every task. Returns how many there were.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let _lock = self.lock()?;
        // The current content is only needed for the recovery log, so a
        // malformed file doesn't block clearing it. It must still be readable.
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        let raw = String::from_utf8_lossy(&bytes).into_owned();
        let parsed = serde_json::from_slice::<Vec<Task>>(&bytes);
        let count = parsed.as_ref().map_or(0, Vec::len);
        if count > 0 {
            recovery::log_task_deletion(
                &self.path,
                format!("list cleared ({} tasks)", count),
                "all",
                raw,
            );
        } else if parsed.is_err() && !raw.trim().is_empty() {
            recovery::log_task_deletion(&self.path, "unreadable list cleared".into(), "all", raw);
        }
        self.write_tasks(&[])?;
        Ok(count)
    }

    /// Drop recovery log entries older than `before` (or all of them).
    /// Returns how many were removed.
    pub fn prune_recovery(
        &self,
        before: Option<DateTime<Utc>>,
        all: bool,
    ) -> Result<usize, StoreError> {
        let _lock = self.lock()?;
        recovery::prune_recovery(&self.path, before, all).map_err(|e| StoreError::WriteError {
            path: recovery::recovery_log_path(&self.path),
            source: e,
        })
    }

    // -----------------------------------------------------------------------
    // Single-task mutations
    // -----------------------------------------------------------------------

    /// Add `task` at the end. A missing or taken ID is replaced with a fresh
    /// one; returns the task as stored.
    pub fn append(&self, mut task: Task) -> Result<Task, StoreError> {
        self.mutate(|tasks| {
            if task.id == 0 || task_ops::find_index(tasks, task.id).is_some() {
                task.id = task_ops::next_id(tasks).ok_or_else(|| StoreError::IdOverflow {
                    path: self.path.clone(),
                })?;
            }
            tasks.push(task.clone());
            Ok(task)
        })
    }

    /// Remove the task at `index` and return it.
    pub fn remove_at(&self, index: usize) -> Result<Task, StoreError> {
        self.mutate(|tasks| {
            check_index(tasks, index)?;
            let removed = tasks.remove(index);
            self.log_deleted(std::slice::from_ref(&removed));
            Ok(removed)
        })
    }

    /// Flip completion of the task at `index`; returns the updated task.
    pub fn toggle_completed_at(&self, index: usize) -> Result<Task, StoreError> {
        self.mutate(|tasks| {
            check_index(tasks, index)?;
            task_ops::toggle_completed(&mut tasks[index]);
            Ok(tasks[index].clone())
        })
    }

    pub fn get(&self, id: TaskId) -> Result<Task, StoreError> {
        let tasks = self.load()?;
        task_ops::find_task(&tasks, id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Remove the task with `id` and return it.
    pub fn remove(&self, id: TaskId) -> Result<Task, StoreError> {
        let mut removed = self.remove_many(&[id])?;
        Ok(removed.remove(0))
    }

    /// Flip completion of the task with `id`; returns the updated task.
    pub fn toggle_completed(&self, id: TaskId) -> Result<Task, StoreError> {
        let mut toggled = self.toggle_many(&[id])?;
        Ok(toggled.remove(0))
    }

    // -----------------------------------------------------------------------
    // Batch mutations (all-or-nothing)
    // -----------------------------------------------------------------------

    /// Remove every task in `ids`. Fails without changing anything if any ID
    /// is unknown. Repeated IDs count once. Returns removed tasks in request order.
    pub fn remove_many(&self, ids: &[TaskId]) -> Result<Vec<Task>, StoreError> {
        let ids = dedup_ids(ids);
        self.mutate(|tasks| {
            let positions = resolve_ids(tasks, &ids)?;
            let removed: Vec<Task> = positions.iter().map(|&i| tasks[i].clone()).collect();
            tasks.retain(|t| !ids.contains(&t.id));
            self.log_deleted(&removed);
            Ok(removed)
        })
    }

    /// Flip completion of every task in `ids`, all-or-nothing like
    /// `remove_many`. Returns updated tasks in request order.
    pub fn toggle_many(&self, ids: &[TaskId]) -> Result<Vec<Task>, StoreError> {
        let ids = dedup_ids(ids);
        self.mutate(|tasks| {
            let positions = resolve_ids(tasks, &ids)?;
            Ok(positions
                .into_iter()
                .map(|i| {
                    task_ops::toggle_completed(&mut tasks[i]);
                    tasks[i].clone()
                })
                .collect())
        })
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn lock(&self) -> Result<FileLock, LockError> {
        FileLock::acquire(&self.path, self.lock_timeout)
    }

    /// Lock, read, apply `f`, write. Nothing is written when `f` fails.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Vec<Task>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _lock = self.lock()?;
        let mut tasks = self.read_tasks()?;
        let result = f(&mut tasks)?;
        self.write_tasks(&tasks)?;
        Ok(result)
    }

    /// Read and parse the data file. A missing file reads as empty.
    fn read_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        let mut tasks: Vec<Task> =
            serde_json::from_str(&content).map_err(|e| StoreError::ParseError {
                path: self.path.clone(),
                source: e,
            })?;
        task_ops::assign_missing_ids(&mut tasks).ok_or_else(|| StoreError::IdOverflow {
            path: self.path.clone(),
        })?;
        Ok(tasks)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let mut content = serde_json::to_string_pretty(tasks)?;
        content.push('\n');
        if let Err(e) = recovery::atomic_write(&self.path, content.as_bytes()) {
            recovery::log_recovery(
                &self.path,
                RecoveryEntry {
                    timestamp: Utc::now(),
                    category: RecoveryCategory::Write,
                    description: "task list write failed".to_string(),
                    fields: vec![
                        ("Target".to_string(), self.path.display().to_string()),
                        ("Error".to_string(), e.to_string()),
                    ],
                    body: content,
                },
            );
            return Err(StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            });
        }
        Ok(())
    }

    fn log_deleted(&self, removed: &[Task]) {
        let ids = removed
            .iter()
            .map(|t| t.id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let description = match removed {
            [one] => format!("task {} deleted", one.id),
            _ => format!("{} tasks deleted", removed.len()),
        };
        let body = serde_json::to_string_pretty(removed).unwrap_or_default();
        recovery::log_task_deletion(&self.path, description, &ids, body);
    }
}

fn check_index(tasks: &[Task], index: usize) -> Result<(), StoreError> {
    if index >= tasks.len() {
        return Err(StoreError::IndexOutOfRange {
            index,
            len: tasks.len(),
        });
    }
    Ok(())
}

fn dedup_ids(ids: &[TaskId]) -> Vec<TaskId> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Positions of `ids`, in request order; the first unknown ID is an error
fn resolve_ids(tasks: &[Task], ids: &[TaskId]) -> Result<Vec<usize>, StoreError> {
    ids.iter()
        .map(|&id| task_ops::find_index(tasks, id).ok_or(StoreError::NotFound(id)))
        .collect()
}
