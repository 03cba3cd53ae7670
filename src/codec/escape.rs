//! Field-level escaping for the delimited grammar.

use std::borrow::Cow;

/// Stands in for a line break inside a field.
pub const EOL_PLACEHOLDER: &str = "\u{7f}\u{7f}";

/// Escapes one formatted value for placement on a record line.
///
/// Line breaks become [`EOL_PLACEHOLDER`]. Text holding a quote is wrapped
/// and every quote doubled; otherwise text holding the delimiter is wrapped
/// as-is. Empty text is never quoted.
pub fn escape(text: &str, delimiter: char) -> Cow<'_, str> {
    let text = strip_line_breaks(text);
    if text.contains('"') {
        let mut out = String::with_capacity(text.len() + 4);
        out.push('"');
        for ch in text.chars() {
            out.push(ch);
            if ch == '"' {
                out.push('"');
            }
        }
        out.push('"');
        Cow::Owned(out)
    } else if text.contains(delimiter) {
        Cow::Owned(format!("\"{text}\""))
    } else {
        text
    }
}

/// Replaces `\r\n`, `\n\r`, `\r` and `\n` with [`EOL_PLACEHOLDER`].
pub fn strip_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\r', '\n']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 2);
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' | '\n' => {
                let pair = if ch == '\r' { '\n' } else { '\r' };
                if chars.peek() == Some(&pair) {
                    chars.next();
                }
                out.push_str(EOL_PLACEHOLDER);
            }
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Inverse of the line-break substitution, applied by the reader after the
/// tokenizer has removed quoting.
pub fn restore_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains(EOL_PLACEHOLDER) {
        Cow::Owned(text.replace(EOL_PLACEHOLDER, "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
