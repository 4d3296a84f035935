//! Line-by-line parsing engine
//!
//! The engine walks an already materialized sequence of lines, keeps a cursor
//! on the section currently being populated, and re-anchors that cursor
//! whenever a section marker changes the bracket depth. Malformed lines never
//! abort the pass: they are logged, optionally recorded as diagnostics, and
//! skipped with the cursor left where it was.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::lexer::{self, Line, TripleQuote};
use crate::section::{SectionId, Tree};

/// Configuration options for the parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Record skipped and repaired lines on the document
    pub collect_diagnostics: bool,
    /// Stop after this many lines; the rest of the input is ignored
    pub max_lines: Option<usize>,
}

impl ParserConfig {
    /// Creates a parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether skipped lines are recorded as diagnostics
    pub fn with_collect_diagnostics(mut self, collect: bool) -> Self {
        self.collect_diagnostics = collect;
        self
    }

    /// Sets the maximum number of lines scanned per pass
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }
}

/// One parse pass over a list of lines, mutating the tree in place
pub(crate) struct Parser<'t> {
    tree: &'t mut Tree,
    config: &'t ParserConfig,
    diagnostics: &'t mut Vec<Diagnostic>,
    cursor: SectionId,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(
        tree: &'t mut Tree,
        config: &'t ParserConfig,
        diagnostics: &'t mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            tree,
            config,
            diagnostics,
            cursor: SectionId::ROOT,
        }
    }

    pub(crate) fn parse_lines<S: AsRef<str>>(mut self, lines: &[S]) {
        let mut limit = lines.len();
        if let Some(max_lines) = self.config.max_lines {
            if lines.len() > max_lines {
                limit = max_lines;
                self.report(max_lines, DiagnosticKind::Truncated { max_lines }, "");
            }
        }
        let lines = &lines[..limit];

        let mut index = 0;
        while index < lines.len() {
            let raw = lines[index].as_ref();
            let line = lexer::classify(raw);
            log::trace!("line {}: {:?}", index + 1, line);

            match line {
                Line::Blank | Line::Comment => {}
                Line::Section { depth, name } => self.open_section(index, depth, name, raw),
                Line::UnbalancedSection { open, close } => {
                    self.report(index, DiagnosticKind::UnbalancedBrackets { open, close }, raw)
                }
                Line::KeyValue { key, raw_value } => {
                    let value = match TripleQuote::opening(raw_value) {
                        Some(quote) => self.multiline_value(quote, raw_value, lines, &mut index),
                        None => lexer::strip_quotes(raw_value).to_string(),
                    };
                    self.tree
                        .node_mut(self.cursor)
                        .entries
                        .insert(key.to_string(), value);
                }
                Line::Unrecognized => self.report(index, DiagnosticKind::Unrecognized, raw),
            }
            index += 1;
        }
    }

    /// Resolves the parent of a new section from the cursor's depth and makes
    /// the new section the cursor.
    fn open_section(&mut self, index: usize, depth: usize, name: &str, raw: &str) {
        let cursor_depth = self.tree.depth(self.cursor);

        let parent = if depth < cursor_depth {
            match self.ancestor_parent(depth) {
                Some(parent) => parent,
                None => {
                    self.report(index, DiagnosticKind::OrphanedSection { depth }, raw);
                    SectionId::ROOT
                }
            }
        } else if depth == cursor_depth {
            // depth >= 1 here, so the cursor is never the root and has a parent
            self.tree.parent(self.cursor).unwrap_or(SectionId::ROOT)
        } else if depth == cursor_depth + 1 {
            self.cursor
        } else {
            self.report(
                index,
                DiagnosticKind::DepthJump {
                    requested: depth,
                    parent_depth: cursor_depth,
                },
                raw,
            );
            SectionId::ROOT
        };

        self.cursor = self.tree.insert_child(parent, name, depth);
    }

    /// Walks up from the cursor to the first ancestor at `depth` and returns
    /// that ancestor's parent.
    fn ancestor_parent(&self, depth: usize) -> Option<SectionId> {
        let mut node = self.cursor;
        while let Some(parent) = self.tree.parent(node) {
            if self.tree.depth(parent) == depth {
                return self.tree.parent(parent);
            }
            node = parent;
        }
        None
    }

    /// Reassembles a triple-quoted value. `index` is left on the last line
    /// consumed.
    fn multiline_value<S: AsRef<str>>(
        &mut self,
        quote: TripleQuote,
        raw_value: &str,
        lines: &[S],
        index: &mut usize,
    ) -> String {
        if let Some(inner) = quote.single_line(raw_value) {
            return inner.to_string();
        }

        let delimiter = quote.delimiter();
        let rest = &raw_value[delimiter.len()..];
        // closing delimiter on the opening line without the strict shape
        if rest.contains(delimiter) {
            return rest.to_string();
        }

        let start = *index;
        let mut value = rest.to_string();
        for (offset, line) in lines[start + 1..].iter().enumerate() {
            let line = line.as_ref();
            value.push('\n');
            if line.contains(delimiter) {
                if let Some(prefix) = quote.closing_line(line) {
                    value.push_str(prefix);
                }
                *index = start + 1 + offset;
                return value;
            }
            value.push_str(line);
        }

        let opening = lines[start].as_ref();
        self.report(start, DiagnosticKind::UnterminatedMultiline, opening);
        *index = lines.len() - 1;
        value
    }

    fn report(&mut self, index: usize, kind: DiagnosticKind, text: &str) {
        log::debug!("line {}: {}", index + 1, kind);
        if self.config.collect_diagnostics {
            self.diagnostics.push(Diagnostic {
                line: index + 1,
                kind,
                text: text.trim().to_string(),
            });
        }
    }
}
