use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::board::TaskBoard;
use crate::model::UiConfig;
use crate::model::post::{Post, sample_posts};
use crate::model::task::{Task, TaskId};
use crate::ops::like_ops::LikeSet;

use super::input;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Tasks,
    Feed,
}

impl View {
    pub fn next(self) -> View {
        match self {
            View::Tasks => View::Feed,
            View::Feed => View::Tasks,
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the input line
    Add,
    /// Editing the text of the task in edit mode
    Edit,
    /// Typing a user name
    SignIn,
}

/// Main application state
pub struct App {
    pub board: Box<dyn TaskBoard>,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Cursor for the task view
    pub cursor: usize,
    /// Scroll offset for the task view
    pub scroll_offset: usize,
    /// Cursor for the feed view
    pub feed_cursor: usize,
    pub posts: Vec<Post>,
    pub likes: LikeSet,
    /// Shared line editor for Add, Edit and SignIn
    pub edit_buffer: String,
    /// Byte offset into edit_buffer
    pub edit_cursor: usize,
    pub show_help: bool,
    /// One-line message shown in the status row until the next key
    pub status_message: Option<String>,
}

impl App {
    pub fn new(board: Box<dyn TaskBoard>, ui: &UiConfig) -> Self {
        let mut app = App {
            board,
            view: View::Tasks,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(ui),
            show_key_hints: ui.show_key_hints,
            cursor: 0,
            scroll_offset: 0,
            feed_cursor: 0,
            posts: sample_posts(),
            likes: LikeSet::new(),
            edit_buffer: String::new(),
            edit_cursor: 0,
            show_help: false,
            status_message: None,
        };
        if app.board.needs_sign_in() {
            app.begin_input(Mode::SignIn, "");
        }
        app
    }

    pub fn tasks(&self) -> &[Task] {
        self.board.tasks()
    }

    /// The task currently in edit mode, if any
    pub fn editing_task(&self) -> Option<&Task> {
        self.tasks().iter().find(|t| t.editing)
    }

    pub fn cursor_task_id(&self) -> Option<TaskId> {
        self.tasks().get(self.cursor).map(|t| t.id.clone())
    }

    /// Keep the cursor on a real row after the list shrinks
    pub fn clamp_cursor(&mut self) {
        let len = self.tasks().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Move the task cursor onto `id` if it is present
    pub fn move_cursor_to(&mut self, id: &TaskId) {
        if let Some(pos) = self.tasks().iter().position(|t| &t.id == id) {
            self.cursor = pos;
        }
    }

    /// Enter an input mode with the line editor pre-filled
    pub fn begin_input(&mut self, mode: Mode, text: &str) {
        self.mode = mode;
        self.edit_buffer = text.to_string();
        self.edit_cursor = self.edit_buffer.len();
    }

    /// Leave any input mode and clear the line editor
    pub fn end_input(&mut self) {
        self.mode = Mode::Navigate;
        self.edit_buffer.clear();
        self.edit_cursor = 0;
    }

    /// Called once per event loop iteration: pull in outside changes and
    /// keep the UI consistent with them.
    pub fn tick(&mut self) {
        if !self.board.refresh() {
            return;
        }
        debug!(count = self.tasks().len(), "board refreshed");
        self.clamp_cursor();
        if self.mode == Mode::Edit && self.editing_task().is_none() {
            self.end_input();
            self.status_message = Some("Edit cancelled: the list changed".into());
        }
    }
}

/// Run the TUI application on top of `board`
pub fn run(board: Box<dyn TaskBoard>, ui: &UiConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(board, ui);
    info!(board = %app.board.label(), "starting tui");

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

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("tui exited");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::LocalBoard;
    use crate::ops::task_ops::Command;
    use crate::remote::{AuthService, DocumentStore, MemoryAuth, MemoryStore, SyncedTaskList};

    #[test]
    fn local_board_starts_in_navigate() {
        let app = App::new(Box::new(LocalBoard::new()), &UiConfig::default());
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.view, View::Tasks);
        assert_eq!(app.posts.len(), 3);
    }

    #[test]
    fn signed_out_board_starts_with_sign_in_prompt() {
        let list = SyncedTaskList::new(MemoryStore::new(), MemoryAuth::new());
        let app = App::new(Box::new(list), &UiConfig::default());
        assert_eq!(app.mode, Mode::SignIn);
    }

    #[test]
    fn tick_leaves_edit_mode_when_snapshot_arrives() {
        let store = MemoryStore::new();
        let mut auth = MemoryAuth::new();
        let ana = auth.sign_in("ana").unwrap();
        store.create(&ana, "Walk dog").unwrap();
        let mut list = SyncedTaskList::new(store.clone(), auth);
        list.refresh();

        let mut app = App::new(Box::new(list), &UiConfig::default());
        let id = app.cursor_task_id().unwrap();
        app.board.dispatch(Command::StartEdit(id));
        app.begin_input(Mode::Edit, "Walk dog");

        store.create(&ana, "Buy milk").unwrap();
        app.tick();
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.status_message.is_some());
        assert_eq!(app.tasks().len(), 2);
    }

    #[test]
    fn tick_clamps_cursor_after_outside_delete() {
        let store = MemoryStore::new();
        let mut auth = MemoryAuth::new();
        let ana = auth.sign_in("ana").unwrap();
        let first = store.create(&ana, "one").unwrap();
        store.create(&ana, "two").unwrap();
        let list = SyncedTaskList::new(store.clone(), auth);

        let mut app = App::new(Box::new(list), &UiConfig::default());
        app.tick();
        assert_eq!(app.tasks().len(), 2);
        app.cursor = 1;
        store.delete(&ana, &first).unwrap();
        app.tick();
        assert_eq!(app.cursor, 0);
    }
}
