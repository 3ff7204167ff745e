pub mod feed_view;
pub mod help_overlay;
pub mod status_row;
pub mod tab_bar;
pub mod task_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;

use super::app::{App, View};
use crate::util::unicode;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match app.view {
        View::Tasks => task_view::render_task_view(frame, app, chunks[1]),
        View::Feed => feed_view::render_feed_view(frame, app, chunks[1]),
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Spans for an input line with a block cursor at byte offset `cursor`.
/// Text is clipped from the left so the cursor stays within `width`.
pub(super) fn input_spans<'a>(
    text: &str,
    cursor: usize,
    width: usize,
    text_style: Style,
    cursor_style: Style,
) -> Vec<Span<'a>> {
    let cursor = cursor.min(text.len());
    let (before, after) = text.split_at(cursor);

    // Keep one cell for the cursor itself
    let room = width.saturating_sub(1);
    let mut start = 0;
    while unicode::display_width(&before[start..]) > room {
        match unicode::next_grapheme_boundary(before, start) {
            Some(next) => start = next,
            None => break,
        }
    }
    let before = &before[start..];
    let after_room = room.saturating_sub(unicode::display_width(before));

    vec![
        Span::styled(before.to_string(), text_style),
        Span::styled("\u{258C}", cursor_style), // ▌ cursor
        Span::styled(unicode::truncate_to_width(after, after_room), text_style),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn input_cursor_in_middle() {
        let spans = input_spans("walk dog", 4, 40, Style::default(), Style::default());
        assert_eq!(joined(&spans), "walk\u{258C} dog");
    }

    #[test]
    fn long_input_keeps_cursor_visible() {
        let text = "a very long task description that will not fit";
        let spans = input_spans(text, text.len(), 10, Style::default(), Style::default());
        let shown = joined(&spans);
        assert!(shown.ends_with("not fit\u{258C}"));
        assert!(unicode::display_width(&shown) <= 10);
    }
}
