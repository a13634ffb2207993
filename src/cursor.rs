// src/cursor.rs
//
// Tree cursor: document-order and sibling movement over a tree, scoped to a root.
//
// Probes (looking at the previous node or previous sibling without moving) are
// built from an explicit save/restore of the cursor position rather than from
// a move followed by an inverse move.

use crate::tree::{self, DocumentTree, NodeId, Tree};

/// A movable position in a tree.
///
/// Moves return the node moved to, or `None` (leaving the position unchanged)
/// when there is nowhere to go inside the cursor's root.
pub trait TreeCursor {
    type Node: Copy + Eq + std::fmt::Debug;
    /// Opaque snapshot of the cursor position.
    type Position: Copy;

    fn current_node(&self) -> Self::Node;
    fn next_node(&mut self) -> Option<Self::Node>;
    fn previous_node(&mut self) -> Option<Self::Node>;
    fn previous_sibling(&mut self) -> Option<Self::Node>;
    fn next_sibling(&mut self) -> Option<Self::Node>;

    fn save(&self) -> Self::Position;
    fn restore(&mut self, position: Self::Position);

    /// The previous node in document order; the position is left untouched.
    fn peek_previous_node(&mut self) -> Option<Self::Node> {
        let saved = self.save();
        let node = self.previous_node();
        self.restore(saved);
        node
    }

    /// The previous sibling; the position is left untouched.
    fn peek_previous_sibling(&mut self) -> Option<Self::Node> {
        let saved = self.save();
        let node = self.previous_sibling();
        self.restore(saved);
        node
    }
}

/// DOM `TreeWalker` over every node kind, confined to `root`'s subtree.
#[derive(Clone, Debug)]
pub struct Walker<'t, T: DocumentTree = Tree> {
    tree: &'t T,
    root: T::Node,
    current: T::Node,
}

impl<'t> Walker<'t, Tree> {
    pub fn new(tree: &'t Tree, root: NodeId) -> Self {
        Walker::over(tree, root)
    }
}

impl<'t, T: DocumentTree> Walker<'t, T> {
    /// A walker over any `DocumentTree`, starting at `root`.
    pub fn over(tree: &'t T, root: T::Node) -> Self {
        Walker {
            tree,
            root,
            current: root,
        }
    }

    fn settle(&mut self, node: Option<T::Node>) -> Option<T::Node> {
        if let Some(node) = node {
            self.current = node;
        }
        node
    }
}

impl<T: DocumentTree> TreeCursor for Walker<'_, T> {
    type Node = T::Node;
    type Position = T::Node;

    fn current_node(&self) -> T::Node {
        self.current
    }

    fn next_node(&mut self) -> Option<T::Node> {
        let next = tree::following(self.tree, self.root, self.current);
        self.settle(next)
    }

    fn previous_node(&mut self) -> Option<T::Node> {
        let prev = tree::preceding(self.tree, self.root, self.current);
        self.settle(prev)
    }

    fn previous_sibling(&mut self) -> Option<T::Node> {
        if self.current == self.root {
            return None;
        }
        let prev = self.tree.previous_sibling(self.current);
        self.settle(prev)
    }

    fn next_sibling(&mut self) -> Option<T::Node> {
        if self.current == self.root {
            return None;
        }
        let next = self.tree.next_sibling(self.current);
        self.settle(next)
    }

    fn save(&self) -> T::Node {
        self.current
    }

    fn restore(&mut self, position: T::Node) {
        self.current = position;
    }
}
