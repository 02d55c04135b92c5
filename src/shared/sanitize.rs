//! Free-text sanitisation applied before report fields are stored.
//!
//! Best-effort markup neutralisation; queries are parameterised regardless.

/// Trim, drop backslash escapes, then HTML-escape.
pub fn sanitize_text(input: &str) -> String {
    html_escape(&strip_slashes(input.trim()))
}

/// `\x` becomes `x` and `\\` becomes `\`. A trailing lone backslash is dropped.
pub fn strip_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
