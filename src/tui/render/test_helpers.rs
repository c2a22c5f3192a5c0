use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::cli::handlers::Context;
use crate::io::store::TaskStore;
use crate::model::config::Config;
use crate::model::task::{Priority, Task};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory backend, keeping styles for inspection.
pub fn render_to_backend<F>(w: u16, h: u16, f: F) -> TestBackend
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();
    terminal.backend().clone()
}

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = render_to_backend(w, h, f);
    let buf = backend.buffer();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an empty data file inside `dir`.
pub fn app_in(dir: &TempDir) -> App {
    let ctx = Context {
        config: Config::default(),
        store: TaskStore::new(dir.path().join("tasks.json")),
    };
    let mut app = App::new(ctx);
    app.reload().unwrap();
    app
}

/// Three tasks covering each color: pending High, pending Low, completed Medium.
pub fn app_with_tasks(dir: &TempDir) -> App {
    let store = TaskStore::new(dir.path().join("tasks.json"));
    let created = "2025-01-01 09:00:00";
    for (name, priority, due) in [
        ("Buy milk", Priority::High, "2025-01-01"),
        ("Walk dog", Priority::Low, "No due date"),
        ("File taxes", Priority::Medium, "2025-04-15"),
    ] {
        store
            .append(Task::new(name.into(), priority, due.into(), created.into()))
            .unwrap();
    }
    store.toggle_completed_at(2).unwrap();
    app_in(dir)
}
