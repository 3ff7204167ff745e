use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::board::LocalBoard;
use crate::model::UiConfig;
use crate::ops::task_ops::Command;
use crate::remote::{MemoryAuth, MemoryStore, SyncedTaskList};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
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

    let buf = terminal.backend().buffer().clone();
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

/// An App over a local board holding `texts`, in order
pub fn local_app(texts: &[&str]) -> App {
    let mut app = App::new(Box::new(LocalBoard::new()), &UiConfig::default());
    for text in texts {
        app.board.dispatch(Command::Add(text.to_string()));
    }
    app
}

/// An App over a synced board with nobody signed in
pub fn signed_out_app() -> App {
    let list = SyncedTaskList::new(MemoryStore::new(), MemoryAuth::new());
    App::new(Box::new(list), &UiConfig::default())
}
