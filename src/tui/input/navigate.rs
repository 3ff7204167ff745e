use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::ops::task_ops::Command;
use crate::tui::app::{App, Mode, View};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay swallows everything except its own close keys
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab | KeyCode::BackTab => app.view = app.view.next(),
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char('g') | KeyCode::Home => jump(app, false),
        KeyCode::Char('G') | KeyCode::End => jump(app, true),
        KeyCode::Char('s') => sign_in_prompt(app),
        KeyCode::Char('o') => sign_out(app),
        _ => match app.view {
            View::Tasks => handle_task_key(app, key),
            View::Feed => handle_feed_key(app, key),
        },
    }
}

fn handle_task_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('a') => {
            if app.board.needs_sign_in() {
                app.status_message = Some("Sign in first (press s)".into());
            } else {
                app.begin_input(Mode::Add, "");
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => start_edit(app),
        KeyCode::Char('d') => delete(app),
        _ => {}
    }
}

fn handle_feed_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('l')
        && let Some(post) = app.posts.get(app.feed_cursor)
    {
        let id = post.id;
        let liked = app.likes.toggle(id);
        debug!(post = id, liked, "toggled like");
    }
}

fn move_cursor(app: &mut App, delta: i32) {
    let (cursor, len) = match app.view {
        View::Tasks => (&mut app.cursor, app.board.tasks().len()),
        View::Feed => (&mut app.feed_cursor, app.posts.len()),
    };
    if len == 0 {
        *cursor = 0;
        return;
    }
    let next = (*cursor as i64 + delta as i64).clamp(0, len as i64 - 1);
    *cursor = next as usize;
}

fn jump(app: &mut App, to_bottom: bool) {
    let (cursor, len) = match app.view {
        View::Tasks => (&mut app.cursor, app.board.tasks().len()),
        View::Feed => (&mut app.feed_cursor, app.posts.len()),
    };
    *cursor = if to_bottom { len.saturating_sub(1) } else { 0 };
}

fn start_edit(app: &mut App) {
    let Some(id) = app.cursor_task_id() else {
        return;
    };
    app.board.dispatch(Command::StartEdit(id.clone()));
    let text = match app.editing_task() {
        Some(task) if task.id == id => task.text.clone(),
        _ => {
            app.status_message = Some("Sign in first (press s)".into());
            return;
        }
    };
    app.begin_input(Mode::Edit, &text);
}

fn delete(app: &mut App) {
    let Some(id) = app.cursor_task_id() else {
        return;
    };
    app.board.dispatch(Command::Delete(id));
    app.clamp_cursor();
}

fn sign_in_prompt(app: &mut App) {
    if app.board.needs_sign_in() {
        app.begin_input(Mode::SignIn, "");
    }
}

fn sign_out(app: &mut App) {
    let Some(user) = app.board.user() else {
        app.status_message = Some(format!("Not signed in ({})", app.board.label()));
        return;
    };
    app.board.sign_out();
    app.cursor = 0;
    app.scroll_offset = 0;
    app.begin_input(Mode::SignIn, "");
    app.status_message = Some(format!("Signed out {}", user));
}
