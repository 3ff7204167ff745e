use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::ops::task_ops::{Command, clean_text};
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Keys for the single-line editor shared by Add, Edit and SignIn
pub(super) fn handle_line_input(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Enter) => confirm_input(app),
        (_, KeyCode::Esc) => cancel_input(app),
        // Home / Ctrl+A: jump to start of line
        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_cursor = 0;
        }
        // End / Ctrl+E: jump to end of line
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_cursor = app.edit_buffer.len();
        }
        // Kill to start of line
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_buffer.drain(..app.edit_cursor);
            app.edit_cursor = 0;
        }
        (_, KeyCode::Home) => app.edit_cursor = 0,
        (_, KeyCode::End) => app.edit_cursor = app.edit_buffer.len(),
        // Word movement (Alt+arrow, or readline Alt+B / Alt+F)
        (m, KeyCode::Left | KeyCode::Char('b')) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
        }
        (m, KeyCode::Right | KeyCode::Char('f')) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_right(&app.edit_buffer, app.edit_cursor);
        }
        (_, KeyCode::Left) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = next;
            }
        }
        // Word backspace (Alt or Ctrl)
        (m, KeyCode::Backspace)
            if m.contains(KeyModifiers::ALT) || m.contains(KeyModifiers::CONTROL) =>
        {
            let start = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
            app.edit_buffer.drain(start..app.edit_cursor);
            app.edit_cursor = start;
        }
        (_, KeyCode::Backspace) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(prev..app.edit_cursor);
                app.edit_cursor = prev;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(app.edit_cursor..next);
            }
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.edit_buffer.insert(app.edit_cursor, c);
            app.edit_cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn confirm_input(app: &mut App) {
    match app.mode {
        Mode::Add => confirm_add(app),
        Mode::Edit => confirm_edit(app),
        Mode::SignIn => confirm_sign_in(app),
        Mode::Navigate => {}
    }
}

fn cancel_input(app: &mut App) {
    match app.mode {
        Mode::Edit => {
            if let Some(id) = app.editing_task().map(|t| t.id.clone()) {
                app.board.dispatch(Command::CancelEdit(id));
            }
        }
        Mode::SignIn if app.board.needs_sign_in() => {
            app.status_message = Some("Not signed in (press s to sign in)".into());
        }
        _ => {}
    }
    app.end_input();
}

fn confirm_add(app: &mut App) {
    if clean_text(&app.edit_buffer).is_none() {
        app.status_message = Some("Nothing to add".into());
        app.end_input();
        return;
    }
    let text = std::mem::take(&mut app.edit_buffer);
    app.board.dispatch(Command::Add(text));
    app.end_input();
}

fn confirm_edit(app: &mut App) {
    let Some(id) = app.editing_task().map(|t| t.id.clone()) else {
        app.end_input();
        return;
    };
    if clean_text(&app.edit_buffer).is_none() {
        app.status_message = Some("Task text cannot be empty (Esc to cancel)".into());
        return;
    }
    app.board.dispatch(Command::SaveEdit(id.clone(), app.edit_buffer.clone()));
    if app.editing_task().is_some() {
        // The board kept edit mode, so the save did not go through
        app.status_message = Some("Could not save the task (see log)".into());
        return;
    }
    app.end_input();
    app.move_cursor_to(&id);
}

fn confirm_sign_in(app: &mut App) {
    let name = app.edit_buffer.trim().to_string();
    match app.board.sign_in(&name) {
        Ok(Some(user)) => {
            info!(user = %user, "signed in from tui");
            app.end_input();
            app.cursor = 0;
            app.scroll_offset = 0;
            app.status_message = Some(format!("Signed in as {}", user));
        }
        Ok(None) => app.end_input(),
        Err(e) => app.status_message = Some(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    use crate::tui::app::{App, Mode};
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::{press, type_str};
    use crate::tui::render::test_helpers::{local_app, signed_out_app};

    fn editing_app(text: &str) -> App {
        let mut app = local_app(&[]);
        app.begin_input(Mode::Add, text);
        app
    }

    #[test]
    fn cursor_movement_and_insert() {
        let mut app = editing_app("wlk");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Right);
        type_str(&mut app, "a");
        assert_eq!(app.edit_buffer, "walk");
        press(&mut app, KeyCode::End);
        assert_eq!(app.edit_cursor, 4);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut app = editing_app("tea 🧘‍♀️");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.edit_buffer, "tea ");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.edit_buffer, "ea ");
    }

    #[test]
    fn ctrl_u_kills_to_start() {
        let mut app = editing_app("buy oat milk");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert_eq!(app.edit_buffer, "lk");
        assert_eq!(app.edit_cursor, 0);
    }

    #[test]
    fn blank_add_changes_nothing() {
        let mut app = editing_app("   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.tasks().is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Nothing to add"));
    }

    #[test]
    fn blank_save_keeps_edit_mode() {
        let mut app = local_app(&["Walk dog"]);
        press(&mut app, KeyCode::Char('e'));
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Edit);
        assert!(app.editing_task().is_some());
        assert_eq!(app.tasks()[0].text, "Walk dog");
    }

    #[test]
    fn invalid_sign_in_name_stays_in_prompt() {
        let mut app = signed_out_app();
        type_str(&mut app, "no/slash");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::SignIn);
        assert!(app.status_message.is_some());
    }
}
