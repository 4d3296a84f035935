//! Section tree storage
//!
//! Sections live in an arena owned by the document and refer to each other
//! through [`SectionId`] indices, so a child can point back at its parent
//! without shared ownership. [`Section`] is a cheap read view into the arena,
//! [`SectionMut`] a write view.

use crate::error::SerdeError;
use indexmap::IndexMap;
use serde::ser::{self, Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// Name given to the implicit root section
pub const ROOT_NAME: &str = "default";

/// Index of a section inside its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(usize);

impl SectionId {
    /// The root section of every document
    pub const ROOT: SectionId = SectionId(0);
}

/// Child sections keyed by name (insertion order preserved)
pub type SectionMap = IndexMap<String, SectionId>;

/// Key/value entries of a section (insertion order preserved)
pub type EntryMap = IndexMap<String, String>;

/// Path of section names from the root, root excluded
pub type SectionPath<'a> = SmallVec<[&'a str; 4]>;

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) depth: usize,
    pub(crate) parent: Option<SectionId>,
    pub(crate) children: SectionMap,
    pub(crate) entries: EntryMap,
}

impl Node {
    fn new(name: String, depth: usize, parent: Option<SectionId>) -> Self {
        Self {
            name,
            depth,
            parent,
            children: IndexMap::new(),
            entries: IndexMap::new(),
        }
    }
}

/// Arena holding every section of a document.
///
/// Replacing a child by name unlinks the previous subtree; its nodes stay in
/// the arena but are no longer reachable from the root.
#[derive(Debug, Clone)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::new(ROOT_NAME.to_string(), 0, None)],
        }
    }

    pub(crate) fn node(&self, id: SectionId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: SectionId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// True if `id` is still reachable from the root. Replaced subtrees stay
    /// in the arena but are no longer linked from their parent.
    pub(crate) fn contains(&self, id: SectionId) -> bool {
        if id.0 >= self.nodes.len() {
            return false;
        }
        let mut node = id;
        while let Some(parent) = self.parent(node) {
            let linked = self.node(parent).children.get(&self.node(node).name);
            if linked != Some(&node) {
                return false;
            }
            node = parent;
        }
        node == SectionId::ROOT
    }

    pub(crate) fn depth(&self, id: SectionId) -> usize {
        self.node(id).depth
    }

    pub(crate) fn parent(&self, id: SectionId) -> Option<SectionId> {
        self.node(id).parent
    }

    /// Creates a section with an explicit depth and registers it under
    /// `parent`, replacing any child with the same name.
    pub(crate) fn insert_child(&mut self, parent: SectionId, name: &str, depth: usize) -> SectionId {
        let id = SectionId(self.nodes.len());
        self.nodes
            .push(Node::new(name.to_string(), depth, Some(parent)));
        self.node_mut(parent).children.insert(name.to_string(), id);
        id
    }

    pub(crate) fn view(&self, id: SectionId) -> Section<'_> {
        Section { tree: self, id }
    }
}

/// Read-only view of a section
#[derive(Clone, Copy)]
pub struct Section<'a> {
    pub(crate) tree: &'a Tree,
    pub(crate) id: SectionId,
}

impl<'a> Section<'a> {
    fn node(&self) -> &'a Node {
        self.tree.node(self.id)
    }

    /// Arena index of this section
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Section name with quoting removed; `"default"` for the root
    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    /// Nesting depth: 0 for the root, N for a section opened with N brackets
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    /// Returns true for the implicit root section
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// Enclosing section, `None` for the root
    pub fn parent(&self) -> Option<Section<'a>> {
        self.node().parent.map(|id| self.tree.view(id))
    }

    /// Direct child lookup by exact name. Does not search recursively.
    pub fn section(&self, name: &str) -> Option<Section<'a>> {
        self.node()
            .children
            .get(name)
            .map(|&id| self.tree.view(id))
    }

    /// Direct entry lookup. A missing key yields the empty string, so an
    /// absent key and a key set to `""` look the same; use [`Section::try_value`]
    /// to tell them apart.
    pub fn value(&self, key: &str) -> &'a str {
        self.try_value(key).unwrap_or("")
    }

    /// Direct entry lookup that reports absence
    pub fn try_value(&self, key: &str) -> Option<&'a str> {
        self.node().entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.node().entries.contains_key(key)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.node().children.contains_key(name)
    }

    /// All direct child sections by name
    pub fn all_sections(&self) -> IndexMap<&'a str, Section<'a>> {
        self.sections().collect()
    }

    /// Iterates direct child sections in insertion order
    pub fn sections(&self) -> impl Iterator<Item = (&'a str, Section<'a>)> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |(name, &id)| (name.as_str(), tree.view(id)))
    }

    /// All key/value entries of this section
    pub fn all_values(&self) -> &'a EntryMap {
        &self.node().entries
    }

    /// Names from the root down to this section, root excluded
    pub fn path(&self) -> SectionPath<'a> {
        let mut path = SectionPath::new();
        let mut current = Some(*self);
        while let Some(section) = current {
            if section.is_root() {
                break;
            }
            path.push(section.name());
            current = section.parent();
        }
        path.reverse();
        path
    }

    /// Dotted form of [`Section::path`], empty for the root
    pub fn dotted_path(&self) -> String {
        self.path().join(".")
    }
}

impl fmt::Debug for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        f.debug_struct("Section")
            .field("name", &node.name)
            .field("depth", &node.depth)
            .field("entries", &node.entries)
            .field("sections", &node.children.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Structural equality: names, entries and child sections, recursively.
/// Depth is derived from position and not compared.
impl PartialEq for Section<'_> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.node(), other.node());
        a.name == b.name
            && a.entries == b.entries
            && a.children.len() == b.children.len()
            && self
                .sections()
                .all(|(name, child)| other.section(name).is_some_and(|o| child == o))
    }
}

/// Serializes as a map: entries first, then child sections as nested maps.
/// A key and a child section with the same name cannot share one map, so
/// that case is an error.
impl Serialize for Section<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let node = self.node();
        if let Some(name) = node.children.keys().find(|name| node.entries.contains_key(*name)) {
            return Err(ser::Error::custom(SerdeError::NameCollision {
                name: name.clone(),
                path: self.dotted_path(),
            }));
        }

        let mut map = serializer.serialize_map(Some(node.entries.len() + node.children.len()))?;
        for (key, value) in &node.entries {
            map.serialize_entry(key, value)?;
        }
        for (name, child) in self.sections() {
            map.serialize_entry(name, &child)?;
        }
        map.end()
    }
}

/// Mutable view of a section
pub struct SectionMut<'a> {
    pub(crate) tree: &'a mut Tree,
    pub(crate) id: SectionId,
}

impl<'a> SectionMut<'a> {
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Read view of the same section
    pub fn as_section(&self) -> Section<'_> {
        self.tree.view(self.id)
    }

    /// Inserts or overwrites an entry
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tree
            .node_mut(self.id)
            .entries
            .insert(key.into(), value.into());
    }

    /// Removes an entry, returning its value
    pub fn remove_value(&mut self, key: &str) -> Option<String> {
        self.tree.node_mut(self.id).entries.shift_remove(key)
    }

    /// Adds an empty child one level deeper, replacing (and discarding) any
    /// existing child with the same name.
    pub fn add_child(&mut self, name: &str) -> SectionId {
        let depth = self.tree.depth(self.id) + 1;
        self.tree.insert_child(self.id, name, depth)
    }

    /// Mutable view of a direct child
    pub fn section_mut(&mut self, name: &str) -> Option<SectionMut<'_>> {
        let id = *self.tree.node(self.id).children.get(name)?;
        Some(SectionMut {
            tree: &mut *self.tree,
            id,
        })
    }

    /// Mutable view of a direct child, created if missing
    pub fn section_or_insert(&mut self, name: &str) -> SectionMut<'_> {
        let existing = self.tree.node(self.id).children.get(name).copied();
        let id = match existing {
            Some(id) => id,
            None => self.add_child(name),
        };
        SectionMut {
            tree: &mut *self.tree,
            id,
        }
    }
}
