//! Cell-width helpers for terminal text.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Number of terminal cells the text occupies.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Number of terminal cells one character occupies (0 for control characters).
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Longest prefix of `text` that fits into `max_width` cells.
pub fn fit_width(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += char_width(ch);
        if used > max_width {
            return &text[..idx];
        }
    }
    text
}
