use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::recovery;
use crate::io::store::{StoreError, TaskStore};
use crate::model::config::Config;
use crate::ops::task_ops::{self, NewTask};

/// Everything a command needs: the resolved config and the task store
pub struct Context {
    pub config: Config,
    pub store: TaskStore,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Load config and locate the data file from the global flags.
pub fn open_context(
    file: Option<&Path>,
    config: Option<&Path>,
) -> Result<Context, Box<dyn std::error::Error>> {
    let config_path = config.map_or_else(config_io::config_path, Path::to_path_buf);
    let config = config_io::read_config_from(&config_path)?;
    let cwd = std::env::current_dir()?;
    let data_file = config_io::resolve_data_file(file, &config, &cwd);
    Ok(Context {
        store: TaskStore::new(data_file),
        config,
    })
}

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let ctx = open_context(cli.file.as_deref(), cli.config.as_deref())?;

    match cli.command {
        None => crate::tui::run(ctx),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List => cmd_list(&ctx, json),
            Commands::Show(args) => cmd_show(&ctx, args, json),
            Commands::Recovery(args) => cmd_recovery(&ctx, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&ctx, args, json),
            Commands::Toggle(args) => cmd_toggle(&ctx, args, json),
            Commands::Rm(args) => cmd_rm(&ctx, args, json),
            Commands::Clear(args) => cmd_clear(&ctx, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Ask a y/n question on stderr. Anything but `y` (including EOF) is no.
fn confirm(prompt: &str) -> std::io::Result<bool> {
    eprint!("{} [y/n] ", prompt);
    std::io::stderr().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// `--before` takes an RFC 3339 timestamp or a plain date (midnight UTC).
fn parse_before(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid --before value '{}' (expected YYYY-MM-DD or RFC 3339)", s))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = ctx.store.load()?;
    if json {
        return print_json(&tasks_to_json(&tasks));
    }
    for line in format_task_list(&tasks) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let task = ctx.store.get(args.id)?;
    if json {
        return print_json(&task_to_json(&task));
    }
    for line in format_task_detail(&task) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_recovery(
    ctx: &Context,
    args: RecoveryCmd,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data_file = ctx.store.path();
    match args.action {
        Some(RecoveryAction::Path) => {
            let path: PathBuf = recovery::recovery_log_path(data_file);
            println!("{}", std::path::absolute(&path)?.display());
            return Ok(());
        }
        Some(RecoveryAction::Prune(prune)) => {
            let before = prune.before.as_deref().map(parse_before).transpose()?;
            let removed = ctx.store.prune_recovery(before, prune.all)?;
            if json {
                return print_json(&serde_json::json!({ "pruned": removed }));
            }
            println!("pruned {} entries", removed);
            return Ok(());
        }
        None => {}
    }

    let entries = recovery::read_recovery_entries(data_file, Some(args.limit.unwrap_or(10)));
    if json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        return print_json(&values);
    }
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for entry in &entries {
        print!("{}", entry.to_display_markdown());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let priority = match args.priority.as_deref() {
        Some(text) => Some(task_ops::parse_priority(text)?),
        None => None,
    };
    let task = task_ops::create_task_now(NewTask {
        name: args.name,
        priority,
        due_date: args.due.unwrap_or_default(),
    })?;
    let stored = ctx.store.append(task)?;
    if json {
        return print_json(&task_to_json(&stored));
    }
    println!("added {}", stored.id);
    Ok(())
}

fn cmd_toggle(ctx: &Context, args: ToggleArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let toggled = ctx.store.toggle_many(&args.ids)?;
    if json {
        return print_json(&tasks_to_json(&toggled));
    }
    for task in &toggled {
        println!("{}", format_toggled(task));
    }
    Ok(())
}

fn cmd_rm(ctx: &Context, args: DeleteArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Resolve up front so a typo fails before the prompt
    let tasks = ctx.store.load()?;
    for &id in &args.ids {
        if task_ops::find_task(&tasks, id).is_none() {
            return Err(format!("task not found: {}", id).into());
        }
    }

    if !args.yes && !confirm(&format!("Delete {} task(s)?", args.ids.len()))? {
        println!("cancelled");
        return Ok(());
    }

    let removed = ctx.store.remove_many(&args.ids)?;
    if json {
        return print_json(&tasks_to_json(&removed));
    }
    for task in &removed {
        println!("{}", format_deleted(task));
    }
    Ok(())
}

fn cmd_clear(ctx: &Context, args: ClearArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // An unparseable file can still be cleared; its content goes to the recovery log
    let (prompt, unreadable) = match ctx.store.load() {
        Ok(tasks) if tasks.is_empty() => {
            if json {
                return print_json(&ClearJson { cleared: 0 });
            }
            println!("no tasks to clear");
            return Ok(());
        }
        Ok(tasks) => (format!("Delete ALL {} tasks?", tasks.len()), false),
        Err(e @ StoreError::ParseError { .. }) => {
            eprintln!("warning: {}", e);
            ("Task list is unreadable. Replace it with an empty list?".to_string(), true)
        }
        Err(e) => return Err(e.into()),
    };

    if !args.yes && !confirm(&prompt)? {
        println!("cancelled");
        return Ok(());
    }

    let cleared = ctx.store.clear()?;
    if json {
        return print_json(&ClearJson { cleared });
    }
    if unreadable {
        println!("cleared unreadable task list (old content kept in recovery log)");
    } else {
        println!("cleared {} tasks", cleared);
    }
    Ok(())
}
