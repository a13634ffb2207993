// src/iter.rs
//
// The bug-report iterator: walks a tree one code point at a time and reports
// line breaks where a renderer would insert them.
//
// Each `advance` yields one of:
//   • a code point from the current text node,
//   • a newline for an explicit `<br>` (always positive),
//   • a newline detected at a block boundary (negated when the false-positive
//     flag is set),
//   • end of stream, repeatedly once reached.
//
// The tree must not change while an iterator is walking it.

use crate::boundary::at_boundary;
use crate::classify::{BlockClassifier, StyleClassifier};
use crate::codepoint::next_code_point;
use crate::cursor::{TreeCursor, Walker};
use crate::tree::{DocumentTree, NodeData, NodeId, Tree};
use tracing::trace;

pub const NEWLINE: i32 = 10;
pub const END_OF_STREAM: i32 = -1;

/// One step of output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emitted {
    /// A code point (a lone high surrogate passes through unchanged).
    Scalar(u32),
    /// Newline from an explicit line-break node.
    LineBreak,
    /// Newline found by the boundary rules.
    Boundary { false_positive: bool },
    End,
}

impl Emitted {
    /// Integer form: the code point, `10`, `-10` for a flagged boundary, or `-1`.
    pub fn code(self) -> i32 {
        match self {
            Emitted::Scalar(cp) => cp as i32,
            Emitted::LineBreak => NEWLINE,
            Emitted::Boundary { false_positive: false } => NEWLINE,
            Emitted::Boundary { false_positive: true } => -NEWLINE,
            Emitted::End => END_OF_STREAM,
        }
    }

    /// Character form; newlines of either polarity become `'\n'`, unpaired
    /// surrogates become U+FFFD.
    pub fn as_char(self) -> Option<char> {
        match self {
            Emitted::Scalar(cp) => Some(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER)),
            Emitted::LineBreak | Emitted::Boundary { .. } => Some('\n'),
            Emitted::End => None,
        }
    }
}

pub struct BugReportIter<'t, T, C, B>
where
    T: DocumentTree,
{
    tree: &'t T,
    cursor: C,
    blocks: B,
    root: T::Node,
    offset: usize,
}

impl<'t> BugReportIter<'t, Tree, Walker<'t, Tree>, StyleClassifier<'t>> {
    /// Iterator over `root`'s subtree using a DOM walker and computed styles.
    pub fn over(tree: &'t Tree, root: NodeId) -> Self {
        BugReportIter::new(tree, Walker::new(tree, root), StyleClassifier::new(tree))
    }
}

impl<'t, T, C, B> BugReportIter<'t, T, C, B>
where
    T: DocumentTree,
    C: TreeCursor<Node = T::Node>,
    B: BlockClassifier<T::Node>,
{
    /// Starts at the cursor's current node, which is taken as the root.
    pub fn new(tree: &'t T, cursor: C, blocks: B) -> Self {
        Self::with_offset(tree, cursor, blocks, 0)
    }

    /// Starts `offset` UTF-16 units into the root node.
    pub fn with_offset(tree: &'t T, cursor: C, blocks: B, offset: usize) -> Self {
        let root = cursor.current_node();
        BugReportIter {
            tree,
            cursor,
            blocks,
            root,
            offset,
        }
    }

    pub fn current_node(&self) -> T::Node {
        self.cursor.current_node()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    /// Produces the next code point or newline.
    pub fn advance(&mut self, false_positive: bool) -> Emitted {
        let tree = self.tree;
        loop {
            let node = self.cursor.current_node();
            match tree.data(node) {
                NodeData::Text(units) if self.offset < units.len() => {
                    if let (Some(cp), consumed) = next_code_point(units, self.offset) {
                        self.offset += consumed;
                        return Emitted::Scalar(cp);
                    }
                }
                NodeData::LineBreak if self.offset == 0 => {
                    self.offset = 1;
                    trace!(?node, "explicit line break");
                    return Emitted::LineBreak;
                }
                _ => {}
            }

            if self.cursor.next_node().is_none() {
                return Emitted::End;
            }
            self.offset = 0;

            if at_boundary(tree, &self.blocks, &mut self.cursor, self.root) {
                return Emitted::Boundary { false_positive };
            }
        }
    }

    /// Integer stream up to (not including) end of stream.
    pub fn codes(&mut self, false_positive: bool) -> Codes<'_, 't, T, C, B> {
        Codes {
            iter: self,
            false_positive,
        }
    }

    /// Drains the rest of the stream into a string.
    pub fn collect_text(&mut self, false_positive: bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.advance(false_positive).as_char() {
            out.push(ch);
        }
        out
    }
}

/// `Iterator` adapter over `BugReportIter::advance`, yielding integer codes.
pub struct Codes<'i, 't, T, C, B>
where
    T: DocumentTree,
{
    iter: &'i mut BugReportIter<'t, T, C, B>,
    false_positive: bool,
}

impl<T, C, B> Iterator for Codes<'_, '_, T, C, B>
where
    T: DocumentTree,
    C: TreeCursor<Node = T::Node>,
    B: BlockClassifier<T::Node>,
{
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        match self.iter.advance(self.false_positive) {
            Emitted::End => None,
            emitted => Some(emitted.code()),
        }
    }
}
