use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" { 4 } else { UnicodeWidthStr::width(g) }
}

/// Fold every whitespace run (newlines included) into one space.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `s` to at most `max_cells` cells, ending in `…` when anything was dropped.
/// Never splits a grapheme cluster.
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
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push(ELLIPSIS);
    out
}

/// Byte offset of the grapheme boundary after `at`, or None at the end.
pub fn next_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    if at >= s.len() {
        return None;
    }
    let step = s[at..].graphemes(true).next().map_or(0, str::len);
    Some(at + step)
}

/// Byte offset of the grapheme boundary before `at`, or None at the start.
pub fn prev_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    if at == 0 {
        return None;
    }
    s[..at].grapheme_indices(true).last().map(|(i, _)| i)
}

/// Terminal column of a byte offset within `s`.
pub fn display_col(s: &str, at: usize) -> usize {
    display_width(&s[..at.min(s.len())])
}
