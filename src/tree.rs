// src/tree.rs
//
// Arena-backed document tree and the node-access interface the walker needs.
//
// - Nodes are `NodeId` handles (u32 indices); links are plain indices, so parent
//   and child references never own each other.
// - Text is stored as UTF-16 units so offsets line up with the scanner.
// - The tree is append-only: nodes are never removed or re-parented.

use std::fmt;

/// Compact node handle (index into the arena).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The document node every `Tree` starts with.
    pub const DOCUMENT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owned node payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element {
        /// Lowercased tag name.
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(Vec<u16>),
    Comment(String),
}

/// Borrowed, walker-facing view of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeData<'a> {
    Text(&'a [u16]),
    /// An element that always forces a line break (`<br>`).
    LineBreak,
    Element(&'a str),
    Other,
}

/// Read-only structural access to a document.
///
/// Implementations must describe a finite, acyclic tree that does not change
/// while a walker is using it.
pub trait DocumentTree {
    type Node: Copy + Eq + fmt::Debug;

    fn data(&self, node: Self::Node) -> NodeData<'_>;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn last_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn previous_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Whether the node's `textContent` would be non-empty: its own data for
    /// text and comments, any descendant text for elements and documents.
    fn has_text_content(&self, node: Self::Node) -> bool;
}

#[derive(Clone, Debug)]
struct Entry {
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// An append-only document tree.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Entry>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only the document node.
    pub fn new() -> Self {
        Tree {
            nodes: vec![Entry {
                kind: NodeKind::Document,
                parent: None,
                first_child: None,
                last_child: None,
                prev_sibling: None,
                next_sibling: None,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The document node is always present.
        false
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.index()].kind
    }

    /// Lowercased tag name, for elements.
    pub fn element_name(&self, node: NodeId) -> Option<&str> {
        match self.kind(node) {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Attribute value by ASCII case-insensitive name.
    pub fn attr(&self, node: NodeId, attr: &str) -> Option<&str> {
        match self.kind(node) {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(attr))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Appends an element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.append_element_with_attrs(parent, name, Vec::new())
    }

    pub fn append_element_with_attrs(
        &mut self,
        parent: NodeId,
        name: &str,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        self.append(
            parent,
            NodeKind::Element {
                name: name.to_ascii_lowercase(),
                attrs,
            },
        )
    }

    /// Appends a text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Text(text.encode_utf16().collect()))
    }

    /// Appends a text node from raw UTF-16 units (which may hold unpaired surrogates).
    pub fn append_text_units(&mut self, parent: NodeId, units: Vec<u16>) -> NodeId {
        self.append(parent, NodeKind::Text(units))
    }

    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Comment(text.to_owned()))
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let prev = self.nodes[parent.index()].last_child;
        self.nodes.push(Entry {
            kind,
            parent: Some(parent),
            first_child: None,
            last_child: None,
            prev_sibling: prev,
            next_sibling: None,
        });
        match prev {
            Some(prev) => self.nodes[prev.index()].next_sibling = Some(id),
            None => self.nodes[parent.index()].first_child = Some(id),
        }
        self.nodes[parent.index()].last_child = Some(id);
        id
    }

    /// Iterates over `root` and its descendants in document order.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root,
            next: Some(root),
        }
    }

    /// Concatenated descendant text, as `textContent` would report it.
    pub fn text_content(&self, node: NodeId) -> String {
        match self.kind(node) {
            NodeKind::Text(units) => String::from_utf16_lossy(units),
            NodeKind::Comment(text) => text.clone(),
            NodeKind::Document | NodeKind::Element { .. } => {
                let mut out = String::new();
                for id in self.descendants(node) {
                    if let NodeKind::Text(units) = self.kind(id) {
                        out.push_str(&String::from_utf16_lossy(units));
                    }
                }
                out
            }
        }
    }

    fn entry(&self, node: NodeId) -> &Entry {
        &self.nodes[node.index()]
    }
}

impl DocumentTree for Tree {
    type Node = NodeId;

    fn data(&self, node: NodeId) -> NodeData<'_> {
        match self.kind(node) {
            NodeKind::Text(units) => NodeData::Text(units),
            NodeKind::Element { name, .. } if name.eq_ignore_ascii_case("br") => {
                NodeData::LineBreak
            }
            NodeKind::Element { name, .. } => NodeData::Element(name),
            NodeKind::Document | NodeKind::Comment(_) => NodeData::Other,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).first_child
    }

    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).last_child
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).prev_sibling
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).next_sibling
    }

    fn has_text_content(&self, node: NodeId) -> bool {
        match self.kind(node) {
            NodeKind::Text(units) => !units.is_empty(),
            NodeKind::Comment(text) => !text.is_empty(),
            NodeKind::Document | NodeKind::Element { .. } => self
                .descendants(node)
                .any(|id| matches!(self.kind(id), NodeKind::Text(units) if !units.is_empty())),
        }
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a Tree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = following(self.tree, self.root, current);
        Some(current)
    }
}

/// The node after `node` in document order, without leaving `root`'s subtree.
pub(crate) fn following<T: DocumentTree>(
    tree: &T,
    root: T::Node,
    node: T::Node,
) -> Option<T::Node> {
    if let Some(child) = tree.first_child(node) {
        return Some(child);
    }
    let mut cur = node;
    loop {
        if cur == root {
            return None;
        }
        if let Some(sibling) = tree.next_sibling(cur) {
            return Some(sibling);
        }
        cur = tree.parent(cur)?;
    }
}

/// The node before `node` in document order, without leaving `root`'s subtree.
pub(crate) fn preceding<T: DocumentTree>(
    tree: &T,
    root: T::Node,
    node: T::Node,
) -> Option<T::Node> {
    if node == root {
        return None;
    }
    match tree.previous_sibling(node) {
        Some(mut cur) => {
            while let Some(last) = tree.last_child(cur) {
                cur = last;
            }
            Some(cur)
        }
        None => tree.parent(node),
    }
}
