// src/boundary.rs
//
// Newline boundary decision: is there a rendering-level line break right before
// the node the cursor points at?
//
// Two rules, in order:
//   • Leading block: the node is a block. It breaks unless an enclosing block
//     reached purely through first-child links already broke for it.
//   • Trailing block: the node is not a block, has a previous sibling, and the
//     walk from the previous node up to that sibling meets a non-empty block.

use crate::classify::BlockClassifier;
use crate::cursor::TreeCursor;
use crate::tree::DocumentTree;
use tracing::{debug, trace};

/// Decides whether a newline is emitted at the cursor's current node.
///
/// Only meaningful at the start of a node (intra-node offset 0). The cursor's
/// position is the same on return as on entry.
pub fn at_boundary<T, C, B>(tree: &T, blocks: &B, cursor: &mut C, root: T::Node) -> bool
where
    T: DocumentTree,
    C: TreeCursor<Node = T::Node>,
    B: BlockClassifier<T::Node>,
{
    let node = cursor.current_node();
    if blocks.is_block(node) {
        leading_block(tree, blocks, node, root)
    } else {
        trailing_block(tree, blocks, cursor)
    }
}

/// Break for a block unless a first-child chain of ancestors holds another block.
pub fn leading_block<T, B>(tree: &T, blocks: &B, node: T::Node, root: T::Node) -> bool
where
    T: DocumentTree,
    B: BlockClassifier<T::Node>,
{
    let mut cur = node;
    while cur != root {
        let Some(parent) = tree.parent(cur) else {
            break;
        };
        if tree.first_child(parent) != Some(cur) {
            break;
        }
        if blocks.is_block(parent) {
            trace!(?node, absorbed_by = ?parent, "leading block absorbed");
            return false;
        }
        cur = parent;
    }
    trace!(?node, "leading block");
    true
}

/// Break after leaving a block that had text, when continuing inline.
pub fn trailing_block<T, C, B>(tree: &T, blocks: &B, cursor: &mut C) -> bool
where
    T: DocumentTree,
    C: TreeCursor<Node = T::Node>,
    B: BlockClassifier<T::Node>,
{
    let previous_node = cursor.peek_previous_node();
    let Some(previous_sibling) = cursor.peek_previous_sibling() else {
        return false;
    };

    let mut cur = previous_node;
    while let Some(node) = cur {
        if blocks.is_block(node) && tree.has_text_content(node) {
            trace!(at = ?cursor.current_node(), closed = ?node, "trailing block");
            return true;
        }
        if node == previous_sibling {
            return false;
        }
        cur = tree.parent(node);
    }

    debug!(
        at = ?cursor.current_node(),
        ?previous_sibling,
        "trailing-block walk never reached the previous sibling"
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::StyleClassifier;
    use crate::cursor::Walker;
    use crate::tree::{NodeId, Tree};

    fn decide(tree: &Tree, root: NodeId, at: NodeId) -> bool {
        let mut walker = Walker::new(tree, root);
        walker.restore(at);
        let blocks = StyleClassifier::new(tree);
        let fired = at_boundary(tree, &blocks, &mut walker, root);
        assert_eq!(walker.current_node(), at, "decision moved the cursor");
        fired
    }

    #[test]
    fn block_at_root_level_breaks() {
        let mut tree = Tree::new();
        let body = tree.append_element(NodeId::DOCUMENT, "body");
        tree.append_text(body, "a");
        let div = tree.append_element(body, "div");
        assert!(decide(&tree, body, div));
    }

    #[test]
    fn first_child_block_of_block_is_absorbed() {
        let mut tree = Tree::new();
        let outer = tree.append_element(NodeId::DOCUMENT, "div");
        let inner = tree.append_element(outer, "div");
        tree.append_text(inner, "X");
        assert!(!decide(&tree, NodeId::DOCUMENT, inner));
        assert!(decide(&tree, NodeId::DOCUMENT, outer));
    }

    #[test]
    fn absorption_looks_through_inline_first_children() {
        let mut tree = Tree::new();
        let outer = tree.append_element(NodeId::DOCUMENT, "div");
        let span = tree.append_element(outer, "span");
        let inner = tree.append_element_with_attrs(
            span,
            "b",
            vec![("style".into(), "display: block".into())],
        );
        assert!(!decide(&tree, NodeId::DOCUMENT, inner));
    }

    #[test]
    fn non_first_child_block_breaks() {
        let mut tree = Tree::new();
        let outer = tree.append_element(NodeId::DOCUMENT, "div");
        tree.append_text(outer, "lead");
        let inner = tree.append_element(outer, "p");
        assert!(decide(&tree, NodeId::DOCUMENT, inner));
    }

    #[test]
    fn walk_stops_at_root() {
        let mut tree = Tree::new();
        let outer = tree.append_element(NodeId::DOCUMENT, "div");
        let inner = tree.append_element(outer, "div");
        // Rooted at `inner` the enclosing block is out of view.
        assert!(decide(&tree, inner, inner));
    }

    #[test]
    fn inline_after_block_with_text_breaks() {
        let mut tree = Tree::new();
        let body = tree.append_element(NodeId::DOCUMENT, "body");
        let div = tree.append_element(body, "div");
        tree.append_text(div, "A");
        let tail = tree.append_text(body, "B");
        assert!(decide(&tree, body, tail));
    }

    #[test]
    fn inline_after_empty_block_does_not_break() {
        let mut tree = Tree::new();
        let body = tree.append_element(NodeId::DOCUMENT, "body");
        tree.append_element(body, "div");
        let tail = tree.append_text(body, "B");
        assert!(!decide(&tree, body, tail));
    }

    #[test]
    fn inline_after_nested_block_breaks() {
        let mut tree = Tree::new();
        let body = tree.append_element(NodeId::DOCUMENT, "body");
        let span = tree.append_element(body, "span");
        let p = tree.append_element(span, "p");
        let em = tree.append_element(p, "em");
        tree.append_text(em, "deep");
        let tail = tree.append_text(body, "after");
        assert!(decide(&tree, body, tail));
    }

    #[test]
    fn first_child_inline_does_not_break() {
        let mut tree = Tree::new();
        let body = tree.append_element(NodeId::DOCUMENT, "body");
        let text = tree.append_text(body, "x");
        assert!(!decide(&tree, body, text));
    }

    #[test]
    fn inline_after_inline_does_not_break() {
        let mut tree = Tree::new();
        let body = tree.append_element(NodeId::DOCUMENT, "body");
        let span = tree.append_element(body, "span");
        tree.append_text(span, "a");
        let tail = tree.append_text(body, "b");
        assert!(!decide(&tree, body, tail));
    }

    /// Walker whose previous sibling is forced to an unrelated node.
    struct Misaligned<'t> {
        inner: Walker<'t>,
        sibling: NodeId,
    }

    impl TreeCursor for Misaligned<'_> {
        type Node = NodeId;
        type Position = NodeId;

        fn current_node(&self) -> NodeId {
            self.inner.current_node()
        }
        fn next_node(&mut self) -> Option<NodeId> {
            self.inner.next_node()
        }
        fn previous_node(&mut self) -> Option<NodeId> {
            self.inner.previous_node()
        }
        fn previous_sibling(&mut self) -> Option<NodeId> {
            Some(self.sibling)
        }
        fn next_sibling(&mut self) -> Option<NodeId> {
            self.inner.next_sibling()
        }
        fn save(&self) -> NodeId {
            self.inner.save()
        }
        fn restore(&mut self, position: NodeId) {
            self.inner.restore(position)
        }
    }

    fn decide_misaligned(tree: &Tree, root: NodeId, at: NodeId, sibling: NodeId) -> bool {
        let mut walker = Walker::new(tree, root);
        walker.restore(at);
        let mut cursor = Misaligned {
            inner: walker,
            sibling,
        };
        let blocks = StyleClassifier::new(tree);
        at_boundary(tree, &blocks, &mut cursor, root)
    }

    #[test]
    fn unrelated_sibling_climbs_to_enclosing_block() {
        // <i/><body><span>a</span>b</body>, sibling reported as <i>.
        let mut tree = Tree::new();
        let stray = tree.append_element(NodeId::DOCUMENT, "i");
        let body = tree.append_element(NodeId::DOCUMENT, "body");
        let span = tree.append_element(body, "span");
        tree.append_text(span, "a");
        let tail = tree.append_text(body, "b");

        assert!(!decide(&tree, body, tail));
        assert!(decide_misaligned(&tree, body, tail, stray));
    }

    #[test]
    fn unrelated_sibling_without_block_ancestor_does_not_break() {
        // <i/><span><b>a</b>b</span>, all inline up to the document.
        let mut tree = Tree::new();
        let stray = tree.append_element(NodeId::DOCUMENT, "i");
        let outer = tree.append_element(NodeId::DOCUMENT, "span");
        let bold = tree.append_element(outer, "b");
        tree.append_text(bold, "a");
        let tail = tree.append_text(outer, "b");

        assert!(!decide_misaligned(&tree, outer, tail, stray));
    }

    #[test]
    fn works_with_closure_classifier() {
        let mut tree = Tree::new();
        let first = tree.append_element(NodeId::DOCUMENT, "x-block");
        tree.append_text(first, "A");
        let tail = tree.append_text(NodeId::DOCUMENT, "B");
        let blocks = |n: NodeId| n == first;
        let mut walker = Walker::new(&tree, NodeId::DOCUMENT);
        walker.restore(tail);
        assert!(at_boundary(&tree, &blocks, &mut walker, NodeId::DOCUMENT));
    }
}
