//! Line classification for the configobj format
//!
//! The format is line oriented, so instead of a token stream this module
//! turns one trimmed line into a [`Line`] describing its shape. All slices
//! borrow from the input line; nothing is allocated here.
//!
//! Grammar surface:
//!
//! ```text
//! section   <spaces> "["*N <name> "]"*N <spaces> <#comment>?     N >= 1
//! key/value <spaces> <key> \s* "=" \s* <value>
//! comment   first non-space character is '#' or ';'
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

// Whitespace in these patterns is the ASCII set `[\t\n\f\r ]`. Unicode
// spaces such as U+3000 are part of keys, names and values.
static SECTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^((?-u:\s)*)((?:\[(?-u:\s)*)+)((?:"(?-u:\s)*[^\t\n\f\r ].*?(?-u:\s)*")|(?:'(?-u:\s)*[^\t\n\f\r ].*?(?-u:\s)*')|(?:[^'"\t\n\f\r ].*?))((?:(?-u:\s)*\])+)((?-u:\s)*(?:#.*)?)?$"#,
    )
    .unwrap()
});

static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^((?-u:\s)*)((?:".*?")|(?:'.*?')|(?:[^'"=].*?))(?-u:\s)*=(?-u:\s)*(.*)$"#)
        .unwrap()
});

static SINGLE_LINE_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^'''(.*?)'''((?-u:\s)*(?:#.*)?)?$").unwrap());

static SINGLE_LINE_DOUBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"""(.*?)"""((?-u:\s)*(?:#.*)?)?$"#).unwrap());

static CLOSING_LINE_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)'''((?-u:\s)*(?:#.*)?)?$").unwrap());

static CLOSING_LINE_DOUBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(.*?)"""((?-u:\s)*(?:#.*)?)?$"#).unwrap());

/// Shape of a single input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty after trimming
    Blank,
    /// First non-space character is `#` or `;`
    Comment,
    /// A well-formed section marker; `name` has one quote layer stripped
    Section { depth: usize, name: &'a str },
    /// Looks like a section marker but the bracket counts differ
    UnbalancedSection { open: usize, close: usize },
    /// A `key = value` line; `raw_value` is not quote-stripped yet
    KeyValue { key: &'a str, raw_value: &'a str },
    /// Neither shape matched
    Unrecognized,
}

/// Classifies one line of input.
pub fn classify(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('#') || line.starts_with(';') {
        return Line::Comment;
    }

    if let Some(caps) = SECTION_MARKER.captures(line) {
        let open = count_char(&caps[2], '[');
        let close = count_char(&caps[4], ']');
        if open != close || open < 1 {
            return Line::UnbalancedSection { open, close };
        }
        let name = caps.get(3).map_or("", |m| m.as_str());
        return Line::Section {
            depth: open,
            name: strip_quotes(name),
        };
    }

    if let Some(caps) = KEY_VALUE.captures(line) {
        let key = caps.get(2).map_or("", |m| m.as_str());
        let raw_value = caps.get(3).map_or("", |m| m.as_str());
        return Line::KeyValue {
            key: trim_key(key),
            raw_value,
        };
    }

    Line::Unrecognized
}

fn count_char(s: &str, c: char) -> usize {
    s.chars().filter(|&ch| ch == c).count()
}

/// Strips one layer of matching `"…"` or `'…'` quoting.
pub fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Trims any mix of `"`, `'` and `:` from both ends of a key.
pub fn trim_key(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, '"' | '\'' | ':'))
}

/// Delimiter of a triple-quoted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleQuote {
    /// `"""`
    Double,
    /// `'''`
    Single,
}

impl TripleQuote {
    /// Returns the delimiter a raw value opens with, if any.
    pub fn opening(raw_value: &str) -> Option<Self> {
        if raw_value.starts_with(r#"""""#) {
            Some(TripleQuote::Double)
        } else if raw_value.starts_with("'''") {
            Some(TripleQuote::Single)
        } else {
            None
        }
    }

    /// The three-character delimiter
    pub fn delimiter(self) -> &'static str {
        match self {
            TripleQuote::Double => r#"""""#,
            TripleQuote::Single => "'''",
        }
    }

    /// Matches a value opened and closed on the same line, with an optional
    /// trailing comment, and returns the text between the delimiters.
    pub fn single_line(self, raw_value: &str) -> Option<&str> {
        let re = match self {
            TripleQuote::Double => &SINGLE_LINE_DOUBLE,
            TripleQuote::Single => &SINGLE_LINE_SINGLE,
        };
        re.captures(raw_value)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Matches the line that terminates a multi-line value and returns the
    /// text before the closing delimiter.
    pub fn closing_line(self, line: &str) -> Option<&str> {
        let re = match self {
            TripleQuote::Double => &CLOSING_LINE_DOUBLE,
            TripleQuote::Single => &CLOSING_LINE_SINGLE,
        };
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}
