use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::{Task, count_label};
use crate::tui::app::{App, Mode};
use crate::util::unicode;

use super::input_spans;

/// Rows reserved below the list: a blank line and the total
const FOOTER_ROWS: u16 = 2;

/// Render the task list for the current board
pub fn render_task_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    if app.tasks().is_empty() && app.mode != Mode::Add {
        render_empty(frame, app, area);
        return;
    }

    let list_height = area.height.saturating_sub(FOOTER_ROWS) as usize;
    let adding = app.mode == Mode::Add && list_height > 0;
    let task_rows = list_height - usize::from(adding);
    adjust_scroll(app, task_rows);
    if adding {
        // Show the tail so the last task sits just above the input line
        app.scroll_offset = app.tasks().len().saturating_sub(task_rows);
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, task) in app
        .tasks()
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(task_rows)
    {
        lines.push(task_line(app, task, i == app.cursor, width));
    }

    // New-task input line goes where local adds land: the end of the list
    if adding {
        let mut spans = vec![Span::styled(
            " + ",
            Style::default().fg(app.theme.green).bg(bg),
        )];
        spans.extend(input_spans(
            &app.edit_buffer,
            app.edit_cursor,
            width.saturating_sub(3),
            Style::default().fg(app.theme.text_bright).bg(bg),
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
        lines.push(Line::from(spans));
    }

    while lines.len() < list_height {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {}", count_label(app.tasks().len())),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn task_line<'a>(app: &App, task: &Task, is_cursor: bool, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };
    let bg_style = Style::default().bg(row_bg);
    let border = if is_cursor { "\u{258E}" } else { " " }; // ▎
    let mut spans = vec![
        Span::styled(border, Style::default().fg(theme.selection_border).bg(row_bg)),
        Span::styled(" ", bg_style),
    ];

    if task.editing && app.mode == Mode::Edit {
        spans.extend(input_spans(
            &app.edit_buffer,
            app.edit_cursor,
            width.saturating_sub(2),
            Style::default().fg(theme.text_bright).bg(row_bg),
            Style::default().fg(theme.highlight).bg(row_bg),
        ));
    } else {
        let mut style = Style::default().fg(theme.text).bg(row_bg);
        if is_cursor {
            style = style.fg(theme.text_bright).add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(
            unicode::truncate_to_width(&task.text, width.saturating_sub(2)),
            style,
        ));
    }

    // Fill the rest of the row so the selection background spans it
    let used: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), bg_style));
    }
    Line::from(spans)
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let hint = if app.board.needs_sign_in() {
        " Sign in to see your tasks (press s)"
    } else {
        " Press a to add one"
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " No tasks yet",
            Style::default().fg(app.theme.text).bg(bg),
        )),
        Line::from(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg))),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Keep the cursor row inside the visible window
fn adjust_scroll(app: &mut App, height: usize) {
    if height == 0 {
        app.scroll_offset = 0;
        return;
    }
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }
    let max_offset = app.tasks().len().saturating_sub(height);
    app.scroll_offset = app.scroll_offset.min(max_offset);
}
