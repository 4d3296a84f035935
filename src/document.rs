//! The parsed document
//!
//! [`ConfigObj`] owns the section arena, the parser configuration and any
//! diagnostics collected while parsing. Its query methods mirror
//! [`Section`] and act on the implicit root section.

use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::parser::{Parser, ParserConfig};
use crate::section::{EntryMap, Section, SectionId, SectionMut, Tree};
use crate::writer;
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use std::convert::Infallible;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::str::FromStr;

/// A configobj document: one implicit root section holding everything else
#[derive(Debug, Clone)]
pub struct ConfigObj {
    tree: Tree,
    config: ParserConfig,
    diagnostics: Vec<Diagnostic>,
}

impl ConfigObj {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Creates an empty document that parses with `config`
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            tree: Tree::new(),
            config,
            diagnostics: Vec::new(),
        }
    }

    /// Reads the whole stream and parses it.
    ///
    /// Malformed lines are skipped; the only error is a failure of the
    /// reader itself, including input that is not valid UTF-8.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_config(reader, ParserConfig::default())
    }

    /// Like [`ConfigObj::from_reader`] with an explicit parser configuration
    pub fn from_reader_with_config<R: Read>(reader: R, config: ParserConfig) -> Result<Self> {
        let mut document = Self::with_config(config);
        document.parse_reader(reader)?;
        Ok(document)
    }

    /// Opens and parses a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses in-memory text. Cannot fail.
    pub fn parse_str(input: &str) -> Self {
        Self::parse_str_with_config(input, ParserConfig::default())
    }

    /// Like [`ConfigObj::parse_str`] with an explicit parser configuration
    pub fn parse_str_with_config(input: &str, config: ParserConfig) -> Self {
        let mut document = Self::with_config(config);
        let lines: Vec<&str> = input.lines().collect();
        document.parse_lines(&lines);
        document
    }

    /// Runs another parse pass over a stream, adding to this document.
    /// The cursor starts at the root again.
    pub fn parse_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        let lines = BufReader::new(reader)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?;
        self.parse_lines(&lines);
        Ok(())
    }

    /// Runs another parse pass over already split lines
    pub fn parse_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        log::debug!("parsing {} lines", lines.len());
        Parser::new(&mut self.tree, &self.config, &mut self.diagnostics).parse_lines(lines);
    }

    /// Parser configuration used by this document
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Lines skipped or repaired so far; empty unless
    /// [`ParserConfig::collect_diagnostics`] is set
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn root(&self) -> Section<'_> {
        self.tree.view(SectionId::ROOT)
    }

    pub fn root_mut(&mut self) -> SectionMut<'_> {
        SectionMut {
            tree: &mut self.tree,
            id: SectionId::ROOT,
        }
    }

    /// Looks a section up by arena index
    pub fn section_by_id(&self, id: SectionId) -> Option<Section<'_>> {
        self.tree.contains(id).then(|| self.tree.view(id))
    }

    /// Mutable view of a section by arena index
    pub fn section_by_id_mut(&mut self, id: SectionId) -> Option<SectionMut<'_>> {
        if !self.tree.contains(id) {
            return None;
        }
        Some(SectionMut {
            tree: &mut self.tree,
            id,
        })
    }

    /// Direct child of the root by name
    pub fn section(&self, name: &str) -> Option<Section<'_>> {
        self.root().section(name)
    }

    /// Root entry by key, empty string when absent
    pub fn value(&self, key: &str) -> &str {
        self.root().value(key)
    }

    /// Root entry by key, `None` when absent
    pub fn try_value(&self, key: &str) -> Option<&str> {
        self.root().try_value(key)
    }

    pub fn all_sections(&self) -> IndexMap<&str, Section<'_>> {
        self.root().all_sections()
    }

    pub fn all_values(&self) -> &EntryMap {
        self.root().all_values()
    }

    /// Always `None`: the root has no parent
    pub fn parent(&self) -> Option<Section<'_>> {
        self.root().parent()
    }

    /// Always 0
    pub fn depth(&self) -> usize {
        self.root().depth()
    }

    /// Sets a root entry
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.root_mut().set_value(key, value);
    }

    /// Adds an empty top-level section, replacing any with the same name
    pub fn add_section(&mut self, name: &str) -> SectionId {
        self.root_mut().add_child(name)
    }

    /// Renders the document back to configobj text
    pub fn to_config_string(&self) -> Result<String> {
        writer::render(self.root())
    }

    /// Renders the document into a byte sink
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<()> {
        let text = self.to_config_string()?;
        sink.write_all(text.as_bytes())?;
        Ok(())
    }
}

impl Default for ConfigObj {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ConfigObj {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse_str(s))
    }
}

/// Documents compare by content: entries and sections, recursively
impl PartialEq for ConfigObj {
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}

impl Serialize for ConfigObj {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.root().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigObjError;
    use std::io::Cursor;

    #[test]
    fn test_empty_input() {
        let document = ConfigObj::parse_str("");
        assert!(document.all_sections().is_empty());
        assert!(document.all_values().is_empty());
        assert_eq!(document.depth(), 0);
        assert!(document.parent().is_none());
        assert_eq!(document.root().name(), "default");
    }

    #[test]
    fn test_from_reader() {
        let input = Cursor::new("a = 1\r\n[s]\r\nb = 2\r\n");
        let document = ConfigObj::from_reader(input).unwrap();
        assert_eq!(document.value("a"), "1");
        assert_eq!(document.section("s").unwrap().value("b"), "2");
    }

    #[test]
    fn test_invalid_utf8_is_an_io_error() {
        let input = Cursor::new(vec![b'a', b' ', b'=', b' ', 0xff, 0xfe, b'\n']);
        let result = ConfigObj::from_reader(input);
        assert!(matches!(result, Err(ConfigObjError::Io(_))));
    }

    #[test]
    fn test_second_pass_restarts_at_root() {
        let mut document = ConfigObj::parse_str("[a]\nx = 1");
        document.parse_lines(&["y = 2", "[a]", "z = 3"]);

        assert_eq!(document.value("y"), "2");
        let a = document.section("a").unwrap();
        assert_eq!(a.value("z"), "3");
        assert_eq!(a.try_value("x"), None, "re-opened section replaces the old one");
    }

    #[test]
    fn test_mutation_api() {
        let mut document = ConfigObj::new();
        document.set_value("name", "demo");
        let id = document.add_section("server");
        document
            .section_by_id_mut(id)
            .unwrap()
            .set_value("port", "8080");

        assert_eq!(document.value("name"), "demo");
        let server = document.section_by_id(id).unwrap();
        assert_eq!(server.value("port"), "8080");
        assert_eq!(server.depth(), 1);
    }

    #[test]
    fn test_replaced_section_ids_no_longer_resolve() {
        let mut document = ConfigObj::parse_str("[s]\n[[child]]\nk = old");
        let first = document.section("s").unwrap().id();
        let nested = document.section("s").unwrap().section("child").unwrap().id();

        let second = document.add_section("s");
        assert_ne!(first, second);
        assert!(document.section_by_id(first).is_none());
        assert!(document.section_by_id(nested).is_none());
        assert!(document.section_by_id_mut(first).is_none());

        document
            .section_by_id_mut(second)
            .unwrap()
            .set_value("k", "kept");
        assert_eq!(document.section("s").unwrap().value("k"), "kept");
        assert!(document.section_by_id(SectionId::ROOT).is_some());
    }

    #[test]
    fn test_from_str_trait() {
        let document: ConfigObj = "k = v".parse().unwrap();
        assert_eq!(document.value("k"), "v");
    }

    #[test]
    fn test_serialize_to_json() {
        let document = ConfigObj::parse_str("a = 1\n[s]\nb = 2\n[[t]]\nc = 3");
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "a": "1",
                "s": { "b": "2", "t": { "c": "3" } }
            })
        );
    }

    #[test]
    fn test_serialize_rejects_key_and_section_with_same_name() {
        let document = ConfigObj::parse_str("s = 1\n[s]\nk = v");
        assert_eq!(document.value("s"), "1");
        assert_eq!(document.section("s").unwrap().value("k"), "v");

        let err = serde_json::to_string(&document).unwrap_err();
        assert!(err.to_string().contains("Key and section both named 's'"));
    }

    #[test]
    fn test_write_to_sink() {
        let document = ConfigObj::parse_str("a = 1\n[s]\nb = 2");
        let mut out = Vec::new();
        document.write_to(&mut out).unwrap();
        let reparsed = ConfigObj::from_reader(Cursor::new(out)).unwrap();
        assert_eq!(reparsed, document);
    }
}
