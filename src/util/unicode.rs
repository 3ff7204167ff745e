//! Grapheme- and width-aware helpers for the line editor and renderers.
//! Offsets are byte offsets into UTF-8 text; widths are terminal cells.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` down to `max_cells`, ending in `…` when anything was dropped
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }

    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = display_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push(ELLIPSIS);
    out
}

/// Start of the grapheme after the one at `offset`; None at the end
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let rest = s.get(offset..)?;
    let first = rest.graphemes(true).next()?;
    Some(offset + first.len())
}

/// Start of the grapheme before `offset`; None at the start
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let head = s.get(..offset)?;
    head.grapheme_indices(true).next_back().map(|(i, _)| i)
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word left of `offset`, skipping any whitespace first
pub fn word_boundary_left(s: &str, offset: usize) -> usize {
    let Some(head) = s.get(..offset) else {
        return 0;
    };
    let mut graphemes = head.grapheme_indices(true).rev().peekable();
    while graphemes.next_if(|(_, g)| is_space(g)).is_some() {}
    let mut start = graphemes.peek().map_or(0, |(i, _)| *i);
    while let Some((i, _)) = graphemes.next_if(|(_, g)| !is_space(g)) {
        start = i;
    }
    start
}

/// Start of the next word right of `offset`, or the end of `s`
pub fn word_boundary_right(s: &str, offset: usize) -> usize {
    let Some(tail) = s.get(offset..) else {
        return s.len();
    };
    let mut graphemes = tail.grapheme_indices(true).peekable();
    while graphemes.next_if(|(_, g)| !is_space(g)).is_some() {}
    while graphemes.next_if(|(_, g)| is_space(g)).is_some() {}
    graphemes.peek().map_or(s.len(), |(i, _)| offset + i)
}
