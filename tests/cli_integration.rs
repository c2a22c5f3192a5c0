//! Integration tests for the `todo` CLI.
//!
//! Each test creates a temp directory, runs `todo` as a subprocess against a
//! data file inside it, and verifies stdout and/or file contents.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Get the path to the built `todo` binary.
fn todo_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("todo");
    path
}

/// Base command: isolated config dir, cwd at `dir`.
fn todo_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(todo_bin());
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .stdin(Stdio::null());
    cmd
}

/// Run `todo <args>` in `dir` and return the output.
fn run(dir: &Path, args: &[&str]) -> Output {
    todo_cmd(dir).args(args).output().unwrap()
}

/// Run and expect success, returning stdout.
fn run_ok(dir: &Path, args: &[&str]) -> String {
    let out = run(dir, args);
    assert!(
        out.status.success(),
        "todo {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

/// Run and expect failure, returning stderr.
fn run_err(dir: &Path, args: &[&str]) -> String {
    let out = run(dir, args);
    assert!(!out.status.success(), "todo {:?} unexpectedly succeeded", args);
    String::from_utf8(out.stderr).unwrap()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn seed(dir: &Path) {
    run_ok(dir, &["add", "Buy milk", "-p", "high", "-d", "2025-01-01"]);
    run_ok(dir, &["add", "Walk dog", "-p", "low"]);
    run_ok(dir, &["add", "File taxes", "-p", "Medium", "-d", "2025-04-15"]);
}

// ---------------------------------------------------------------------------
// add / list / show
// ---------------------------------------------------------------------------

#[test]
fn add_creates_data_file() {
    let tmp = TempDir::new().unwrap();
    let out = run_ok(tmp.path(), &["add", "  Buy milk  ", "-p", "h"]);
    assert_eq!(out, "added 1\n");

    let data = read_json(&tmp.path().join("tasks.json"));
    let tasks = data.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Buy milk");
    assert_eq!(tasks[0]["priority"], "High");
    assert_eq!(tasks[0]["due_date"], "No due date");
    assert_eq!(tasks[0]["completed"], false);
    assert_eq!(tasks[0]["id"], 1);
}

#[test]
fn list_empty() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(run_ok(tmp.path(), &["list"]), "no tasks\n");
    // Listing creates an empty list on disk
    assert_eq!(read_json(&tmp.path().join("tasks.json")), serde_json::json!([]));
}

#[test]
fn list_in_insertion_order() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());
    let out = run_ok(tmp.path(), &["list"]);
    assert_eq!(
        out,
        "\
1  [ ] Buy milk (High) - Due: 2025-01-01
2  [ ] Walk dog (Low) - Due: No due date
3  [ ] File taxes (Medium) - Due: 2025-04-15
"
    );
}

#[test]
fn show_task_details() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());
    let out = run_ok(tmp.path(), &["show", "#2"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "#2");
    assert_eq!(lines[1], "Task Details:");
    assert_eq!(lines[3], "Name: Walk dog");
    assert_eq!(lines[4], "Priority: Low");
    assert_eq!(lines[5], "Due Date: No due date");
    assert_eq!(lines[6], "Status: Pending");
    assert!(lines[7].starts_with("Created: "));
}

#[test]
fn show_unknown_id_fails() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());
    let err = run_err(tmp.path(), &["show", "9"]);
    assert!(err.contains("task not found: 9"), "stderr: {err}");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn add_rejects_blank_name() {
    let tmp = TempDir::new().unwrap();
    let err = run_err(tmp.path(), &["add", "   ", "-p", "low"]);
    assert!(err.contains("task name cannot be empty"), "stderr: {err}");
    assert!(!tmp.path().join("tasks.json").exists());
}

#[test]
fn add_requires_priority() {
    let tmp = TempDir::new().unwrap();
    let err = run_err(tmp.path(), &["add", "Buy milk"]);
    assert!(err.contains("please select a priority level"), "stderr: {err}");

    let err = run_err(tmp.path(), &["add", "Buy milk", "-p", "urgent"]);
    assert!(err.contains("invalid priority 'urgent'"), "stderr: {err}");
}

#[test]
fn malformed_file_is_an_error_not_data_loss() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tasks.json");
    fs::write(&path, "{ not json").unwrap();

    let err = run_err(tmp.path(), &["list"]);
    assert!(err.contains("could not parse"), "stderr: {err}");
    run_err(tmp.path(), &["add", "x", "-p", "low"]);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}

// ---------------------------------------------------------------------------
// toggle / rm / clear
// ---------------------------------------------------------------------------

#[test]
fn toggle_flips_back_and_forth() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());

    let out = run_ok(tmp.path(), &["toggle", "1", "3"]);
    assert_eq!(out, "1 marked as completed\n3 marked as completed\n");
    let out = run_ok(tmp.path(), &["list"]);
    assert!(out.contains("1  [\u{2713}] Buy milk"));

    let out = run_ok(tmp.path(), &["toggle", "1"]);
    assert_eq!(out, "1 marked as incomplete\n");
}

#[test]
fn toggle_with_unknown_id_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());
    let before = fs::read_to_string(tmp.path().join("tasks.json")).unwrap();

    run_err(tmp.path(), &["toggle", "1", "42"]);
    let after = fs::read_to_string(tmp.path().join("tasks.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn rm_with_yes() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());

    let out = run_ok(tmp.path(), &["rm", "2", "--yes"]);
    assert_eq!(out, "deleted 2 'Walk dog'\n");

    // IDs are stable across deletes
    let out = run_ok(tmp.path(), &["list"]);
    assert_eq!(
        out,
        "\
1  [ ] Buy milk (High) - Due: 2025-01-01
3  [ ] File taxes (Medium) - Due: 2025-04-15
"
    );
    // A new task never reuses a live ID
    assert_eq!(run_ok(tmp.path(), &["add", "New", "-p", "low"]), "added 4\n");
}

#[test]
fn rm_declined_at_prompt() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());

    let mut child = todo_cmd(tmp.path())
        .args(["rm", "1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"n\n").unwrap();
    let out = child.wait_with_output().unwrap();

    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "cancelled\n");
    assert!(String::from_utf8(out.stderr).unwrap().contains("Delete 1 task(s)?"));
    assert_eq!(read_json(&tmp.path().join("tasks.json")).as_array().unwrap().len(), 3);
}

#[test]
fn rm_unknown_id_fails_before_prompt() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());
    // stdin is null, so reaching the prompt would read EOF and cancel
    let err = run_err(tmp.path(), &["rm", "7"]);
    assert!(err.contains("task not found: 7"), "stderr: {err}");
}

#[test]
fn clear_with_yes() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());

    assert_eq!(run_ok(tmp.path(), &["clear", "--yes"]), "cleared 3 tasks\n");
    assert_eq!(read_json(&tmp.path().join("tasks.json")), serde_json::json!([]));
    assert_eq!(run_ok(tmp.path(), &["clear", "--yes"]), "no tasks to clear\n");
}

#[test]
fn clear_replaces_malformed_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tasks.json");
    fs::write(&path, "{ not json").unwrap();

    let out = todo_cmd(tmp.path()).args(["clear", "--yes"]).output().unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "cleared unreadable task list (old content kept in recovery log)\n"
    );
    assert!(String::from_utf8_lossy(&out.stderr).contains("could not parse"));
    assert_eq!(read_json(&path), serde_json::json!([]));

    let log = run_ok(tmp.path(), &["recovery"]);
    assert!(log.contains("unreadable list cleared"), "log: {log}");
    assert!(log.contains("{ not json"), "log: {log}");
}

#[test]
fn id_zero_is_rejected_by_parser() {
    let tmp = TempDir::new().unwrap();
    let err = run_err(tmp.path(), &["toggle", "0"]);
    assert!(err.contains("invalid value"), "stderr: {err}");
}

// ---------------------------------------------------------------------------
// --json
// ---------------------------------------------------------------------------

#[test]
fn json_add_and_list() {
    let tmp = TempDir::new().unwrap();
    let out = run_ok(tmp.path(), &["--json", "add", "Buy milk", "-p", "high"]);
    let task: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(task["id"], 1);
    assert_eq!(task["status"], "urgent");
    assert_eq!(task["line"], "[ ] Buy milk (High) - Due: No due date");

    run_ok(tmp.path(), &["toggle", "1"]);
    let out = run_ok(tmp.path(), &["list", "--json"]);
    let list: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(list[0]["status"], "done");
    assert_eq!(list[0]["completed"], true);
}

#[test]
fn json_clear_reports_count() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());
    let out = run_ok(tmp.path(), &["clear", "--yes", "--json"]);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["cleared"], 3);
}

// ---------------------------------------------------------------------------
// Data file selection
// ---------------------------------------------------------------------------

#[test]
fn file_flag_overrides_default() {
    let tmp = TempDir::new().unwrap();
    run_ok(tmp.path(), &["-f", "work.json", "add", "Ship it", "-p", "m"]);
    assert!(tmp.path().join("work.json").exists());
    assert!(!tmp.path().join("tasks.json").exists());
    assert_eq!(run_ok(tmp.path(), &["list"]), "no tasks\n");
}

#[test]
fn config_file_sets_data_file() {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("config/todo");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[store]\nfile = \"from-config.json\"\n",
    )
    .unwrap();

    run_ok(tmp.path(), &["add", "a", "-p", "low"]);
    assert!(tmp.path().join("from-config.json").exists());

    // Explicit --config wins over the XDG location
    let other = tmp.path().join("other.toml");
    fs::write(&other, "[store]\nfile = \"other.json\"\n").unwrap();
    run_ok(tmp.path(), &["--config", "other.toml", "add", "b", "-p", "low"]);
    assert!(tmp.path().join("other.json").exists());
}

#[test]
fn bad_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("bad.toml");
    fs::write(&config, "[store\n").unwrap();
    let err = run_err(tmp.path(), &["--config", "bad.toml", "list"]);
    assert!(err.contains("could not parse"), "stderr: {err}");
}

// ---------------------------------------------------------------------------
// recovery
// ---------------------------------------------------------------------------

#[test]
fn recovery_log_records_deletes() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(run_ok(tmp.path(), &["recovery"]), "recovery log is empty\n");

    seed(tmp.path());
    run_ok(tmp.path(), &["rm", "1", "--yes"]);
    run_ok(tmp.path(), &["clear", "--yes"]);

    let out = run_ok(tmp.path(), &["recovery"]);
    let clear_at = out.find("list cleared (2 tasks)").unwrap();
    let rm_at = out.find("task 1 deleted").unwrap();
    // Newest first
    assert!(clear_at < rm_at);
    assert!(out.contains("Buy milk"));

    let out = run_ok(tmp.path(), &["recovery", "--limit", "1", "--json"]);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 1);
}

#[test]
fn recovery_path_is_absolute() {
    let tmp = TempDir::new().unwrap();
    let out = run_ok(tmp.path(), &["recovery", "path"]);
    let path = PathBuf::from(out.trim());
    assert!(path.is_absolute());
    assert_eq!(path.file_name().unwrap(), ".tasks.recovery.log");
}

#[test]
fn recovery_prune_all_empties_log() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());
    run_ok(tmp.path(), &["rm", "1", "2", "--yes"]);

    // Entries are fresh, so the default 30-day cutoff keeps them
    assert_eq!(run_ok(tmp.path(), &["recovery", "prune"]), "pruned 0 entries\n");
    assert!(run_ok(tmp.path(), &["recovery"]).contains("Buy milk"));

    let out = run_ok(tmp.path(), &["recovery", "prune", "--all", "--json"]);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(v["pruned"].as_u64().unwrap() >= 1);
    assert_eq!(run_ok(tmp.path(), &["recovery"]), "recovery log is empty\n");
}

#[test]
fn recovery_prune_rejects_bad_date() {
    let tmp = TempDir::new().unwrap();
    let err = run_err(tmp.path(), &["recovery", "prune", "--before", "yesterday"]);
    assert!(err.contains("invalid --before value 'yesterday'"), "stderr: {err}");
}
