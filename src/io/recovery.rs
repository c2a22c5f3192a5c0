use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Past this size, old entries are trimmed before appending.
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Entries younger than this survive trimming and default pruning.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- todo recovery log: append-only copies of task data
     Deleted tasks and writes that failed end up here as JSON.
     If something went missing, check here.
     View with: todo recovery
     Prune old entries: todo recovery prune
     Safe to delete if empty or stale. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// Saving the data file failed; body holds the content that was lost
    Write,
    /// Tasks were deleted on purpose; body holds them
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Hidden sibling of the data file: `tasks.json` → `.tasks<suffix>`
pub fn sidecar_path(data_file: &Path, suffix: &str) -> PathBuf {
    let stem = data_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tasks");
    let dir = data_file.parent().unwrap_or(Path::new(""));
    dir.join(format!(".{}{}", stem, suffix))
}

/// Return the path to the recovery log for a data file.
pub fn recovery_log_path(data_file: &Path) -> PathBuf {
    sidecar_path(data_file, ".recovery.log")
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push_str("\n```json\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push_str("\n---\n");
        out
    }

    /// Serialize to JSON value for `todo recovery --json`.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }

    /// Human-readable form for the CLI.
    pub fn to_display_markdown(&self) -> String {
        self.to_markdown()
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log. Errors are swallowed and printed to stderr.
pub fn log_recovery(data_file: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_file, entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(data_file: &Path, entry: RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(data_file);
    let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
    if let Err(e) = trim_if_larger_than(&path, MAX_LOG_SIZE, &cutoff) {
        eprintln!("warning: could not trim recovery log: {}", e);
    }
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Log deleted tasks. `body` is their JSON.
pub fn log_task_deletion(data_file: &Path, description: String, ids: &str, body: String) {
    log_recovery(
        data_file,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Delete,
            description,
            fields: vec![("Tasks".to_string(), ids.to_string())],
            body,
        },
    );
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Drop entries older than `cutoff` once the log passes `max_size` bytes.
/// Callers hold the data file lock.
fn trim_if_larger_than(path: &Path, max_size: u64, cutoff: &DateTime<Utc>) -> io::Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > max_size => {}
        _ => return Ok(()),
    }
    let content = std::fs::read_to_string(path)?;
    let trimmed = prune_entries_before(&content, cutoff);
    if trimmed.len() < content.len() {
        atomic_write(path, trimmed.as_bytes())?;
    }
    Ok(())
}

/// Remove entries older than `before` (default: `PRUNE_AGE_DAYS` ago), or
/// every entry when `all` is set. Returns the number removed.
/// Callers hold the data file lock.
pub fn prune_recovery(
    data_file: &Path,
    before: Option<DateTime<Utc>>,
    all: bool,
) -> io::Result<usize> {
    let path = recovery_log_path(data_file);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    let original = parse_entries(&content).len();

    if all {
        atomic_write(&path, FILE_HEADER.as_bytes())?;
        return Ok(original);
    }

    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));
    let trimmed = prune_entries_before(&content, &cutoff);
    let kept = parse_entries(&trimmed).len();
    atomic_write(&path, trimmed.as_bytes())?;
    Ok(original.saturating_sub(kept))
}

/// Keep the file header and every entry stamped at or after `cutoff`.
/// Text before the first entry counts as header.
fn prune_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let mut out = String::new();
    let mut entry = String::new();
    let mut keep: Option<bool> = None;

    for line in content.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            if keep == Some(true) {
                out.push_str(&entry);
            }
            entry.clear();
            keep = Some(parse_entry_header(header).is_some_and(|(ts, _, _)| ts >= *cutoff));
        }
        match keep {
            None => {
                out.push_str(line);
                out.push('\n');
            }
            Some(_) => {
                entry.push_str(line);
                entry.push('\n');
            }
        }
    }
    if keep == Some(true) {
        out.push_str(&entry);
    }
    out
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read recovery entries, most recent first.
pub fn read_recovery_entries(data_file: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let path = recovery_log_path(data_file);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);

    // Keep the newest `n` (entries are parsed oldest-first)
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }

    entries.reverse();
    entries
}

/// Parse all entries from the log content string.
fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(header) = line.strip_prefix("## ") else {
            continue;
        };
        let Some((timestamp, category, description)) = parse_entry_header(header) else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body = String::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body,
        });
    }

    entries
}

/// Parse an entry header: `<timestamp> <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let (category_str, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}
