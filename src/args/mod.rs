//! Script argument text: tokenize editable argument strings and format token lists back.
//!
//! The persisted form of a script's argument list is a single human-edited string.
//! `parse` splits it into tokens with double/single quoting and backslash escapes;
//! `format` produces the canonical text that parses back to the same tokens.

use thiserror::Error;

/// Quote characters that open a quoted region.
pub const QUOTE_CHARS: [char; 2] = ['"', '\''];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgParseError {
    /// Input ended inside a quoted region. `index` is the char index of the opening quote.
    #[error("UNCLOSED_QUOTE: {quote} opened at index {index} is never closed")]
    UnclosedQuote { quote: char, index: usize },
}

impl ArgParseError {
    pub fn code(&self) -> &'static str {
        match self {
            ArgParseError::UnclosedQuote { .. } => "UNCLOSED_QUOTE",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ArgParseError::UnclosedQuote { index, .. } => *index,
        }
    }
}

fn can_escape(c: char) -> bool {
    c == '"' || c == '\'' || c == '\\' || c.is_whitespace()
}

/// Split argument text into tokens.
///
/// Whitespace outside quotes separates tokens. `"` and `'` open a quoted region
/// that ends at the same character. A backslash escapes a following quote,
/// backslash or whitespace character in every state; before anything else it is
/// kept as a literal backslash.
pub fn parse(input: &str) -> Result<Vec<String>, ArgParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<(char, usize)> = None;
    // Distinguishes an empty quoted token ("") from no token at all.
    let mut has_token = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            match chars.get(i + 1) {
                Some(&next) if can_escape(next) => {
                    current.push(next);
                    has_token = true;
                    i += 2;
                }
                _ => {
                    current.push(c);
                    has_token = true;
                    i += 1;
                }
            }
            continue;
        }

        if let Some((open, _)) = quote {
            if c == open {
                quote = None;
            } else {
                current.push(c);
                has_token = true;
            }
            i += 1;
            continue;
        }

        if QUOTE_CHARS.contains(&c) {
            quote = Some((c, i));
            has_token = true;
        } else if c.is_whitespace() {
            if has_token {
                args.push(std::mem::take(&mut current));
                has_token = false;
            }
        } else {
            current.push(c);
            has_token = true;
        }
        i += 1;
    }

    if let Some((quote, index)) = quote {
        return Err(ArgParseError::UnclosedQuote { quote, index });
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}

fn needs_quoting(token: &str) -> bool {
    token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == '\\')
}

fn quote_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 2);
    out.push('"');
    for c in token.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Join tokens into canonical argument text.
///
/// Tokens that are empty or contain whitespace, quotes or backslashes are wrapped
/// in double quotes with `\` and `"` escaped; others pass through verbatim.
pub fn format<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| {
            let t = t.as_ref();
            if needs_quoting(t) {
                quote_token(t)
            } else {
                t.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
