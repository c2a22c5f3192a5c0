use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::cli::handlers::Context;
use crate::io::store::{StoreError, TaskStore};
use crate::io::watcher::DataFileWatcher;
use crate::model::task::{Priority, Task, TaskId};
use crate::ops::present::status_label;
use crate::ops::task_ops::{self, NewTask};

use super::input;
use super::render;
use super::text::TextInput;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Add-task form is open
    Add,
    /// Waiting for y/n on `App::confirm`
    Confirm,
    /// Details popup for `App::detail_id`
    Details,
    Help,
}

/// Action awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete { id: TaskId, name: String },
    ClearAll { count: usize },
    /// The data file could not be parsed; clearing replaces it
    ClearUnreadable,
}

/// Field focus in the add form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Priority,
    DueDate,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Priority,
            FormField::Priority => FormField::DueDate,
            FormField::DueDate => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::DueDate,
            FormField::Priority => FormField::Name,
            FormField::DueDate => FormField::Priority,
        }
    }
}

/// State of the add-task form
#[derive(Debug, Clone)]
pub struct AddForm {
    pub name: TextInput,
    /// None until the user picks one
    pub priority: Option<Priority>,
    pub due_date: TextInput,
    pub field: FormField,
}

impl Default for AddForm {
    fn default() -> Self {
        AddForm {
            name: TextInput::default(),
            priority: None,
            due_date: TextInput::default(),
            field: FormField::Name,
        }
    }
}

impl AddForm {
    /// Step through unset → High → Medium → Low (wrapping, unset skipped once chosen)
    pub fn cycle_priority(&mut self, forward: bool) {
        let all = Priority::ALL;
        let idx = self.priority.and_then(|p| all.iter().position(|&q| q == p));
        let next = match (idx, forward) {
            (None, true) => 0,
            (None, false) => all.len() - 1,
            (Some(i), true) => (i + 1) % all.len(),
            (Some(i), false) => (i + all.len() - 1) % all.len(),
        };
        self.priority = Some(all[next]);
    }

    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            name: self.name.as_str().to_string(),
            priority: self.priority,
            due_date: self.due_date.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// One-shot feedback shown in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
}

/// Main application state
pub struct App {
    pub store: TaskStore,
    /// Last list read from the store, in file order
    pub tasks: Vec<Task>,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub confirm_delete: bool,
    /// Cursor index into `tasks`
    pub cursor: usize,
    /// First visible row of the list
    pub scroll_offset: usize,
    pub add_form: Option<AddForm>,
    pub confirm: Option<ConfirmAction>,
    pub detail_id: Option<TaskId>,
    pub status: Option<StatusMessage>,
}

impl App {
    pub fn new(ctx: Context) -> Self {
        App {
            store: ctx.store,
            tasks: Vec::new(),
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&ctx.config.ui),
            show_key_hints: ctx.config.ui.show_key_hints,
            confirm_delete: ctx.config.ui.confirm_delete,
            cursor: 0,
            scroll_offset: 0,
            add_form: None,
            confirm: None,
            detail_id: None,
            status: None,
        }
    }

    // -----------------------------------------------------------------------
    // Store sync
    // -----------------------------------------------------------------------

    /// Re-read the list from disk, keeping the cursor on the same task if it
    /// still exists.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let selected = self.selected().map(|t| t.id);
        self.tasks = self.store.load()?;
        if let Some(idx) = selected.and_then(|id| task_ops::find_index(&self.tasks, id)) {
            self.cursor = idx;
        }
        self.clamp_cursor();
        if let Some(id) = self.detail_id
            && task_ops::find_task(&self.tasks, id).is_none()
        {
            self.detail_id = None;
            if self.mode == Mode::Details {
                self.mode = Mode::Navigate;
            }
        }
        Ok(())
    }

    /// First read at startup. An unparseable file opens an empty view with a
    /// hint instead of failing, so it can still be cleared.
    pub fn load_initial(&mut self) -> Result<(), StoreError> {
        match self.reload() {
            Err(e @ StoreError::ParseError { .. }) => {
                self.set_error(format!("{} (press C to replace it)", e));
                Ok(())
            }
            other => other,
        }
    }

    /// Reload after an outside edit; errors go to the status row.
    pub fn reload_external(&mut self) {
        if let Err(e) = self.reload() {
            self.set_error(e.to_string());
        }
    }

    /// Report the outcome of a store call, then re-read the list.
    fn after_mutation(&mut self, result: Result<String, StoreError>) {
        match result {
            Ok(msg) => {
                self.set_info(msg);
                self.reload_external();
            }
            Err(e) => {
                // The store may have changed underneath us (stale selection)
                match self.reload() {
                    Ok(()) => self.set_error(e.to_string()),
                    Err(re) => self.set_error(format!("{}; reload failed: {}", e, re)),
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn selected(&self) -> Option<&Task> {
        self.tasks.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.tasks.is_empty() {
            return;
        }
        let max = self.tasks.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    pub fn cursor_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_bottom(&mut self) {
        self.cursor = self.tasks.len().saturating_sub(1);
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.tasks.len().saturating_sub(1));
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: MessageKind::Info,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: MessageKind::Error,
        });
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn open_add_form(&mut self) {
        self.add_form = Some(AddForm::default());
        self.mode = Mode::Add;
    }

    pub fn cancel_add_form(&mut self) {
        self.add_form = None;
        self.mode = Mode::Navigate;
    }

    /// Validate and store the form. On a validation error the form stays
    /// open with focus on the offending field.
    pub fn submit_add_form(&mut self) {
        let Some(form) = self.add_form.as_mut() else {
            return;
        };
        let task = match task_ops::create_task_now(form.to_new_task()) {
            Ok(t) => t,
            Err(e) => {
                form.field = match e {
                    task_ops::TaskError::EmptyName => FormField::Name,
                    _ => FormField::Priority,
                };
                self.set_error(capitalize(&e.to_string()));
                return;
            }
        };

        self.add_form = None;
        self.mode = Mode::Navigate;
        match self.store.append(task) {
            Ok(stored) => {
                self.set_info("Task added successfully!");
                self.reload_external();
                if let Some(idx) = task_ops::find_index(&self.tasks, stored.id) {
                    self.cursor = idx;
                }
            }
            Err(e) => self.after_mutation(Err(e)),
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected().map(|t| t.id) else {
            self.set_error("Please select a task to mark.");
            return;
        };
        let result = self
            .store
            .toggle_completed(id)
            .map(|t| format!("Task marked as {}!", status_label(&t)));
        self.after_mutation(result);
    }

    /// Delete the selected task, asking first unless disabled in config.
    pub fn request_delete(&mut self) {
        let Some(task) = self.selected() else {
            self.set_error("Please select a task to delete.");
            return;
        };
        let (id, name) = (task.id, task.name.clone());
        if self.confirm_delete {
            self.confirm = Some(ConfirmAction::Delete { id, name });
            self.mode = Mode::Confirm;
        } else {
            self.delete_task(id);
        }
    }

    pub fn request_clear(&mut self) {
        if self.tasks.is_empty() {
            match self.store.load() {
                Err(StoreError::ParseError { .. }) => {
                    self.confirm = Some(ConfirmAction::ClearUnreadable);
                    self.mode = Mode::Confirm;
                }
                Err(e) => self.set_error(e.to_string()),
                Ok(tasks) if tasks.is_empty() => self.set_info("No tasks to clear."),
                // Written by someone else since the last reload
                Ok(tasks) => {
                    self.confirm = Some(ConfirmAction::ClearAll { count: tasks.len() });
                    self.mode = Mode::Confirm;
                    self.reload_external();
                }
            }
            return;
        }
        self.confirm = Some(ConfirmAction::ClearAll {
            count: self.tasks.len(),
        });
        self.mode = Mode::Confirm;
    }

    /// Run the pending confirm action
    pub fn accept_confirm(&mut self) {
        self.mode = Mode::Navigate;
        match self.confirm.take() {
            Some(ConfirmAction::Delete { id, .. }) => self.delete_task(id),
            Some(ConfirmAction::ClearAll { .. } | ConfirmAction::ClearUnreadable) => {
                let result = self.store.clear().map(|_| "All tasks cleared!".to_string());
                self.after_mutation(result);
            }
            None => {}
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
        self.mode = Mode::Navigate;
    }

    fn delete_task(&mut self, id: TaskId) {
        let result = self
            .store
            .remove(id)
            .map(|t| format!("Task '{}' deleted successfully!", t.name));
        self.after_mutation(result);
    }

    pub fn show_details(&mut self) {
        if let Some(id) = self.selected().map(|t| t.id) {
            self.detail_id = Some(id);
            self.mode = Mode::Details;
        }
    }

    pub fn close_popup(&mut self) {
        self.detail_id = None;
        self.mode = Mode::Navigate;
    }

    pub fn detail_task(&self) -> Option<&Task> {
        self.detail_id
            .and_then(|id| task_ops::find_task(&self.tasks, id))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>() + ".",
        None => String::new(),
    }
}

/// Run the TUI application
pub fn run(ctx: Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(ctx);
    // Fail before touching the terminal if the list can't be read
    app.load_initial()?;

    let watcher = match DataFileWatcher::start(app.store.path()) {
        Ok(w) => Some(w),
        Err(e) => {
            eprintln!("warning: not watching for outside changes: {}", e);
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&DataFileWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if watcher.is_some_and(|w| w.poll()) {
            app.reload_external();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
