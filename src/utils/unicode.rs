//! Unicode-safe helpers for working with UTF-8 strings.

use unicode_width::UnicodeWidthStr;

/// Convert a character index (0-based) to a byte index in the given string.
/// If `n` exceeds the number of characters, returns `s.len()`.
pub fn char_to_byte_index(s: &str, n: usize) -> usize {
    match s.char_indices().nth(n) {
        Some((i, _)) => i,
        None => s.len(),
    }
}

/// Keep at most `max_chars` characters, marking the cut with `…`.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    let cut = char_to_byte_index(s, max_chars);
    if cut == s.len() {
        s.to_string()
    } else {
        format!("{}…", &s[..cut])
    }
}

/// Terminal column at which the character with index `n` starts.
pub fn display_column(s: &str, n: usize) -> usize {
    s[..char_to_byte_index(s, n)].width()
}

/// A line with `^` under the character at index `n`, for printing below `s`.
pub fn caret_line(s: &str, n: usize) -> String {
    format!("{}^", " ".repeat(display_column(s, n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_index_maps_to_byte_index() {
        assert_eq!(char_to_byte_index("héllo", 2), 3);
        assert_eq!(char_to_byte_index("abc", 10), 3);
    }

    #[test]
    fn truncation_is_char_safe() {
        assert_eq!(truncate_chars("北京欢迎你", 2), "北京…");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn caret_accounts_for_wide_chars() {
        assert_eq!(display_column("--name \"x", 7), 7);
        // Each CJK char occupies two columns.
        assert_eq!(display_column("城市 \"北京", 3), 5);
        assert_eq!(caret_line("ab'c", 2), "  ^");
    }
}
