//! ANSI-aware string measurement and padding.
//!
//! Color codes have no width on screen, so every column computation in the
//! renderer goes through [`visible_len`] rather than `str::len`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// SGR reset sequence, as emitted by `colored`.
pub const RESET: &str = "\x1b[0m";

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ANSI pattern"));

enum Token<'a> {
    Escape(&'a str),
    Text(&'a str),
}

/// Split a string into alternating escape sequences and visible text runs.
fn tokens(s: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in ANSI_RE.find_iter(s) {
        if m.start() > last {
            out.push(Token::Text(&s[last..m.start()]));
        }
        out.push(Token::Escape(m.as_str()));
        last = m.end();
    }
    if last < s.len() {
        out.push(Token::Text(&s[last..]));
    }
    out
}

/// Remove all SGR escape sequences.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    ANSI_RE.replace_all(s, "")
}

/// Number of visible characters once escape sequences are removed.
pub fn visible_len(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// Right-pad with spaces until the visible length reaches `width`.
/// Strings already at or past `width` are returned unchanged.
pub fn pad_right(s: &str, width: usize) -> String {
    let len = visible_len(s);
    let mut out = String::with_capacity(s.len() + width.saturating_sub(len));
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

/// Cut `s` to at most `max_visible` visible columns, ending in `ellipsis`.
///
/// Escape sequences that precede the cut point are kept, so a colored prefix
/// stays colored. If any escape was copied a reset is appended, keeping the
/// color from bleeding into whatever follows.
pub fn truncate(s: &str, max_visible: usize, ellipsis: &str) -> String {
    if visible_len(s) <= max_visible {
        return s.to_string();
    }

    let ellipsis_len = ellipsis.chars().count();
    let keep = max_visible.saturating_sub(ellipsis_len);

    let mut out = String::with_capacity(s.len());
    let mut visible = 0;
    let mut saw_escape = false;

    'outer: for token in tokens(s) {
        match token {
            Token::Escape(seq) => {
                out.push_str(seq);
                saw_escape = true;
            }
            Token::Text(text) => {
                for c in text.chars() {
                    if visible == keep {
                        break 'outer;
                    }
                    out.push(c);
                    visible += 1;
                }
            }
        }
    }

    out.extend(ellipsis.chars().take(max_visible - visible));
    if saw_escape {
        out.push_str(RESET);
    }
    out
}

/// Truncate then pad: the result is exactly `width` visible columns.
pub fn fit(s: &str, width: usize, ellipsis: &str) -> String {
    pad_right(&truncate(s, width, ellipsis), width)
}

/// Paint `bg` behind the whole line, padding included.
///
/// Segment colors end in a reset which would also clear the background, so
/// the background code is re-applied after every reset.
pub fn with_background(line: &str, width: usize, bg: &str) -> String {
    let padded = pad_right(line, width);
    let body = padded.replace(RESET, &format!("{RESET}{bg}"));
    format!("{bg}{body}{RESET}")
}
