//! Records of lines the parser skipped or repaired
//!
//! Parsing never fails on malformed content. When
//! [`ParserConfig::collect_diagnostics`](crate::ParserConfig) is enabled the
//! parser leaves one [`Diagnostic`] per defect on the document instead.

use std::fmt;

/// What went wrong on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Section marker whose opening and closing bracket counts differ
    UnbalancedBrackets { open: usize, close: usize },
    /// Neither a section marker nor a key/value line
    Unrecognized,
    /// Triple-quoted value still open at end of input
    UnterminatedMultiline,
    /// No ancestor at the requested depth; the section was attached to the root
    OrphanedSection { depth: usize },
    /// Marker skipped one or more levels; the section was attached to the root
    DepthJump { requested: usize, parent_depth: usize },
    /// Input exceeded the configured line limit
    Truncated { max_lines: usize },
}

/// A skipped or repaired line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number within the parse pass
    pub line: usize,
    pub kind: DiagnosticKind,
    /// Trimmed text of the offending line
    pub text: String,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnbalancedBrackets { open, close } => {
                write!(f, "unbalanced section brackets ({} open, {} close)", open, close)
            }
            DiagnosticKind::Unrecognized => write!(f, "unrecognized line"),
            DiagnosticKind::UnterminatedMultiline => write!(f, "unterminated multi-line value"),
            DiagnosticKind::OrphanedSection { depth } => {
                write!(f, "no enclosing section at depth {}, attached to root", depth)
            }
            DiagnosticKind::DepthJump {
                requested,
                parent_depth,
            } => write!(
                f,
                "depth {} skips levels below depth {}, attached to root",
                requested, parent_depth
            ),
            DiagnosticKind::Truncated { max_lines } => {
                write!(f, "input truncated after {} lines", max_lines)
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)?;
        if !self.text.is_empty() {
            write!(f, " ('{}')", self.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic {
            line: 3,
            kind: DiagnosticKind::UnbalancedBrackets { open: 2, close: 1 },
            text: "[[a]".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "line 3: unbalanced section brackets (2 open, 1 close) ('[[a]')"
        );
    }

    #[test]
    fn test_display_without_text() {
        let diagnostic = Diagnostic {
            line: 10,
            kind: DiagnosticKind::Truncated { max_lines: 9 },
            text: String::new(),
        };
        assert_eq!(diagnostic.to_string(), "line 10: input truncated after 9 lines");
    }
}
