// src/lib.rs
//
// rendertext — walk a markup tree as the text a reader would see
//
// - `BugReportIter` yields code points from text nodes, one per call.
// - Line breaks are reported where a renderer would put them: at `<br>`, when
//   entering a block that is not absorbed by an enclosing leading block, and
//   when leaving a block with text while staying inline.
// - Boundary-detected breaks can be sign-flipped (`-10`) with the
//   false-positive flag; explicit `<br>` breaks never are.
// - The tree, the cursor and the block classifier are traits; `Tree`, `Walker`
//   and `StyleClassifier` are the bundled implementations and `html` loads
//   markup into a `Tree`.

pub mod boundary;
pub mod classify;
pub mod codepoint;
pub mod cursor;
pub mod error;
pub mod html;
pub mod iter;
pub mod tree;

pub use boundary::at_boundary;
pub use classify::{BlockClassifier, Display, StyleClassifier};
pub use codepoint::next_code_point;
pub use cursor::{TreeCursor, Walker};
pub use error::{Error, Result};
pub use iter::{BugReportIter, Emitted, END_OF_STREAM, NEWLINE};
pub use tree::{DocumentTree, NodeData, NodeId, NodeKind, Tree};
