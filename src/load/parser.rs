//! dotenv syntax parser
//!
//! Supports `#` comments, an optional `export ` prefix, unquoted values with
//! trailing ` # comments`, and single, double or backtick quoted values that
//! may span lines. Only double-quoted values interpret escapes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern for a valid variable name.
pub const KEY_PATTERN: &str = r"[A-Za-z_][A-Za-z0-9_.\-]*";

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\s*(?:export\s+)?({KEY_PATTERN})\s*=(.*)$")).expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    None,
    Single,
    Double,
    Backtick,
}

impl Quote {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Quote::Single),
            '"' => Some(Quote::Double),
            '`' => Some(Quote::Backtick),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
    pub quote: Quote,
    /// 1-based line the assignment starts on.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub reason: &'static str,
}

/// Parse env file contents into assignments in file order.
pub fn parse_str(content: &str) -> Result<Vec<Assignment>, SyntaxError> {
    let lines: Vec<&str> = content.lines().collect();
    let mut assignments = Vec::new();
    let mut next = 0;

    while next < lines.len() {
        let line_no = next + 1;
        let line = lines[next].strip_prefix('\u{feff}').unwrap_or(lines[next]);
        next += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let caps = ASSIGNMENT
            .captures(line)
            .ok_or(SyntaxError { line: line_no, reason: "expected KEY=VALUE" })?;
        let key = caps[1].to_string();
        let rest = caps.get(2).map_or("", |m| m.as_str()).trim_start();

        let opening = rest.chars().next().and_then(|c| Quote::from_char(c).map(|q| (c, q)));
        let (value, quote) = match opening {
            Some((delim, quote)) => {
                let body = read_quoted(&rest[1..], delim, &lines, &mut next, line_no)?;
                let value = if quote == Quote::Double { unescape_double(&body) } else { body };
                (value, quote)
            }
            None => (strip_inline_comment(rest).trim_end().to_string(), Quote::None),
        };

        assignments.push(Assignment { key, value, quote, line: line_no });
    }

    Ok(assignments)
}

/// Collect a quoted body starting after the opening `delim`, pulling further
/// lines from `lines[*next..]` until the closing quote.
fn read_quoted(
    first: &str,
    delim: char,
    lines: &[&str],
    next: &mut usize,
    line_no: usize,
) -> Result<String, SyntaxError> {
    let mut body = String::new();
    let mut segment = first;
    loop {
        if let Some(end) = find_closing(segment, delim) {
            body.push_str(&segment[..end]);
            let trailing = segment[end + delim.len_utf8()..].trim();
            if !trailing.is_empty() && !trailing.starts_with('#') {
                return Err(SyntaxError {
                    line: line_no,
                    reason: "unexpected characters after closing quote",
                });
            }
            return Ok(body);
        }
        body.push_str(segment);
        if *next >= lines.len() {
            return Err(SyntaxError { line: line_no, reason: "unterminated quoted value" });
        }
        body.push('\n');
        segment = lines[*next];
        *next += 1;
    }
}

/// Byte offset of the closing quote. Backslash escapes are honoured for `"` only.
fn find_closing(segment: &str, delim: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in segment.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' && delim == '"' {
            escaped = true;
        } else if c == delim {
            return Some(i);
        }
    }
    None
}

fn unescape_double(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Drop a `#` comment that starts the value or follows whitespace.
fn strip_inline_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &value[..i];
        }
    }
    value
}
