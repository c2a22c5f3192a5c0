use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cli::output::parse_task_id;
use crate::model::task::TaskId;

#[derive(Parser)]
#[command(name = "todo", about = concat!("[✓] todo v", env!("CARGO_PKG_VERSION"), " - a to-do list in one JSON file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task list file (default: store.file from config, else ./tasks.json)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/todo/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the end of the list
    Add(AddArgs),
    /// List all tasks
    List,
    /// Show task details
    Show(ShowArgs),
    /// Mark tasks complete/incomplete
    Toggle(ToggleArgs),
    /// Delete tasks
    Rm(DeleteArgs),
    /// Delete all tasks
    Clear(ClearArgs),
    /// View the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct AddArgs {
    /// Task name
    pub name: String,
    /// Priority: high, medium or low
    #[arg(short, long)]
    pub priority: Option<String>,
    /// Due date (free text, e.g. 2025-06-01)
    #[arg(short, long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID
    #[arg(value_parser = parse_task_id)]
    pub id: TaskId,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Task IDs to toggle
    #[arg(required = true, value_parser = parse_task_id)]
    pub ids: Vec<TaskId>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task IDs to delete
    #[arg(required = true, value_parser = parse_task_id)]
    pub ids: Vec<TaskId>,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this date or timestamp (default: 30 days ago)
    #[arg(long, conflicts_with = "all")]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
