use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, View};
use crate::util::unicode;

use super::input_spans;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let (mut spans, hint): (Vec<Span>, &str) = match app.mode {
        Mode::SignIn => {
            let prompt = "Sign in as: ";
            let mut spans = vec![Span::styled(
                prompt,
                Style::default().fg(app.theme.highlight).bg(bg),
            )];
            spans.extend(input_spans(
                &app.edit_buffer,
                app.edit_cursor,
                width.saturating_sub(prompt.len() + 24),
                Style::default().fg(app.theme.text_bright).bg(bg),
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
            (spans, "Enter sign in  Esc cancel")
        }
        Mode::Add => (Vec::new(), "Enter add  Esc cancel"),
        Mode::Edit => (Vec::new(), "Enter save  Esc cancel"),
        Mode::Navigate => {
            let hint = if !app.show_key_hints {
                ""
            } else if app.view == View::Feed {
                "l like  Tab tasks  ? help  q quit"
            } else {
                "a add  e edit  d delete  Tab feed  ? help"
            };
            (Vec::new(), hint)
        }
    };

    // A pending message replaces the left side in every mode but SignIn
    if let Some(ref message) = app.status_message {
        let style = Style::default().fg(app.theme.yellow).bg(bg);
        if app.mode == Mode::SignIn {
            spans.push(Span::styled(format!("  {}", message), style));
        } else {
            spans = vec![Span::styled(message.clone(), style)];
        }
    }

    let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    let hint_width = unicode::display_width(hint);
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
