use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::post::Post;
use crate::tui::app::App;
use crate::util::unicode;

/// Columns taken by the selection border and indent on every card line
const CARD_INDENT: usize = 4;

/// Render the sample feed as a column of cards
pub fn render_feed_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let text_width = width.saturating_sub(CARD_INDENT).max(1);

    let cards: Vec<Vec<Line>> = app
        .posts
        .iter()
        .enumerate()
        .map(|(i, post)| post_card(app, post, i == app.feed_cursor, text_width))
        .collect();

    // Drop cards from the top until the selected one fits
    let height = area.height as usize;
    let mut first = 0;
    while first < app.feed_cursor
        && cards[first..=app.feed_cursor]
            .iter()
            .map(|c| c.len())
            .sum::<usize>()
            > height
    {
        first += 1;
    }

    let lines: Vec<Line> = cards.into_iter().skip(first).flatten().collect();
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn post_card<'a>(app: &App, post: &Post, selected: bool, text_width: usize) -> Vec<Line<'a>> {
    let theme = &app.theme;
    let bg = theme.background;
    let border = if selected {
        Span::styled(" \u{258E}  ", Style::default().fg(theme.selection_border).bg(bg))
    } else {
        Span::styled("    ", Style::default().bg(bg))
    };

    let mut lines = Vec::new();

    // Header: avatar initials, name and handle
    lines.push(Line::from(vec![
        border.clone(),
        Span::styled(
            format!("({})", post.initials()),
            Style::default().fg(theme.highlight).bg(bg),
        ),
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            post.author.clone(),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", post.handle),
            Style::default().fg(theme.dim).bg(bg),
        ),
    ]));

    // Caption, wrapped, with hashtags colored
    for row in wrap_words(&post.caption, text_width) {
        let mut spans = vec![border.clone()];
        for (i, word) in row.split(' ').enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", Style::default().bg(bg)));
            }
            let fg = match word.strip_prefix('#') {
                Some(tag) if !tag.is_empty() => theme.tag_color(tag),
                _ => theme.text,
            };
            spans.push(Span::styled(word.to_string(), Style::default().fg(fg).bg(bg)));
        }
        lines.push(Line::from(spans));
    }

    // Likes and comments
    let liked = app.likes.is_liked(post.id);
    let (heart, heart_color) = if liked {
        ("\u{2665}", theme.highlight) // ♥
    } else {
        ("\u{2661}", theme.dim) // ♡
    };
    lines.push(Line::from(vec![
        border,
        Span::styled(
            format!("{} {}", heart, app.likes.display_likes(post)),
            Style::default().fg(heart_color).bg(bg),
        ),
        Span::styled(
            format!("   {} comments", post.comments),
            Style::default().fg(theme.dim).bg(bg),
        ),
    ]));
    lines.push(Line::from(""));
    lines
}

/// Greedy word wrap by display width. Words wider than `width` get a row
/// of their own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if unicode::display_width(&current) + 1 + unicode::display_width(word) <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            rows.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn wrap_respects_width() {
        let rows = wrap_words("one two three four", 9);
        assert_eq!(rows, vec!["one two", "three", "four"]);
        assert!(wrap_words("", 10).is_empty());
    }

    #[test]
    fn feed_shows_authors_and_counts() {
        let app = local_app(&[]);
        let out = render_to_string(TERM_W, 40, |frame, area| {
            render_feed_view(frame, &app, area);
        });
        assert!(out.contains("(SC) Sarah Chen @sarahfitslife"));
        assert!(out.contains("Mike Rodriguez"));
        assert!(out.contains("\u{2661} 127"));
        assert!(out.contains("23 comments"));
        assert!(out.contains("#DeadliftPR"));
    }

    #[test]
    fn liked_post_shows_filled_heart() {
        let mut app = local_app(&[]);
        let id = app.posts[2].id;
        app.likes.toggle(id);
        let out = render_to_string(TERM_W, 40, |frame, area| {
            render_feed_view(frame, &app, area);
        });
        assert!(out.contains("\u{2665} 157"));
    }

    #[test]
    fn selected_card_stays_visible() {
        let mut app = local_app(&[]);
        app.feed_cursor = 2;
        let out = render_to_string(TERM_W, 6, |frame, area| {
            render_feed_view(frame, &app, area);
        });
        assert!(out.contains("Emma Thompson"));
    }
}
