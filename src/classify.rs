// src/classify.rs
//
// Block classification: does an element render with `display: block`?
//
// - `StyleClassifier` computes the effective display of an element from its
//   inline `style` attribute, falling back to the user-agent default for the tag.
// - Only `block` counts. List items, tables, flex containers and friends do not.
// - Text, comments and the document node are never blocks.
// - Nothing is cached; every query recomputes.

use crate::tree::{NodeId, NodeKind, Tree};

/// Reports whether a node's effective rendering category is "block".
///
/// Answers must be deterministic for a given tree snapshot.
pub trait BlockClassifier<N> {
    fn is_block(&self, node: N) -> bool;
}

impl<N, F> BlockClassifier<N> for F
where
    F: Fn(N) -> bool,
{
    fn is_block(&self, node: N) -> bool {
        self(node)
    }
}

/// The outer display type of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    Block,
    Inline,
    InlineBlock,
    ListItem,
    Flex,
    Grid,
    Table,
    TableRow,
    TableCell,
    Contents,
    None,
    Other,
}

impl Display {
    /// Parses a CSS `display` value. Multi-keyword values are reduced to the
    /// outer keyword when one is present.
    pub fn parse(value: &str) -> Display {
        let value = value.trim();
        let value = value
            .strip_suffix("!important")
            .map(str::trim_end)
            .unwrap_or(value);
        let mut words = value.split_ascii_whitespace();
        let Some(first) = words.next() else {
            return Display::Other;
        };
        let second = words.next();
        match (first.to_ascii_lowercase().as_str(), second) {
            ("block", None) | ("block", Some("flow")) | ("block", Some("flow-root")) => {
                Display::Block
            }
            ("flow-root", None) => Display::Block,
            ("inline", None) | ("inline", Some("flow")) => Display::Inline,
            ("inline-block", None) | ("inline", Some("flow-root")) => Display::InlineBlock,
            ("list-item", _) => Display::ListItem,
            ("flex", None) | ("block", Some("flex")) => Display::Flex,
            ("grid", None) | ("block", Some("grid")) => Display::Grid,
            ("table", None) | ("block", Some("table")) => Display::Table,
            ("table-row", None) => Display::TableRow,
            ("table-cell", None) => Display::TableCell,
            ("contents", None) => Display::Contents,
            ("none", None) => Display::None,
            _ => Display::Other,
        }
    }

    /// User-agent stylesheet default for an HTML tag name.
    pub fn default_for(name: &str) -> Display {
        if is_hidden(name) {
            Display::None
        } else if is_default_block(name) {
            Display::Block
        } else if name.eq_ignore_ascii_case("li") {
            Display::ListItem
        } else if name.eq_ignore_ascii_case("table") {
            Display::Table
        } else if name.eq_ignore_ascii_case("tr") {
            Display::TableRow
        } else if name.eq_ignore_ascii_case("td") || name.eq_ignore_ascii_case("th") {
            Display::TableCell
        } else if matches_ignore_ascii_case(name, &["button", "input", "select", "textarea"]) {
            Display::InlineBlock
        } else {
            Display::Inline
        }
    }
}

/* =============================== Core sets =============================== */

fn is_default_block(name: &str) -> bool {
    matches_ignore_ascii_case(
        name,
        &[
            "address", "article", "aside", "blockquote", "body", "center", "dd", "details",
            "dialog", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
            "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html",
            "legend", "listing", "main", "menu", "nav", "ol", "optgroup", "p", "plaintext",
            "pre", "search", "section", "summary", "ul", "xmp",
        ],
    )
}

fn is_hidden(name: &str) -> bool {
    matches_ignore_ascii_case(
        name,
        &[
            "area", "base", "datalist", "head", "link", "meta", "noembed", "noframes", "param",
            "rp", "script", "style", "template", "title",
        ],
    )
}

fn matches_ignore_ascii_case(name: &str, set: &[&str]) -> bool {
    set.iter().any(|s| name.eq_ignore_ascii_case(s))
}

/* ============================ Inline style scan ========================== */

/// Last `display` declaration in an inline style attribute, if any.
fn inline_display(style: &str) -> Option<Display> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(prop, _)| prop.trim().eq_ignore_ascii_case("display"))
        .map(|(_, value)| Display::parse(value))
        .last()
}

/* ============================== Classifier =============================== */

/// Classifies `Tree` nodes by their computed display.
#[derive(Clone, Copy, Debug)]
pub struct StyleClassifier<'t> {
    tree: &'t Tree,
}

impl<'t> StyleClassifier<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        StyleClassifier { tree }
    }

    /// Effective display for an element; `None` for non-element nodes.
    pub fn display(&self, node: NodeId) -> Option<Display> {
        let NodeKind::Element { name, .. } = self.tree.kind(node) else {
            return None;
        };
        let from_style = self.tree.attr(node, "style").and_then(inline_display);
        Some(from_style.unwrap_or_else(|| Display::default_for(name)))
    }
}

impl BlockClassifier<NodeId> for StyleClassifier<'_> {
    fn is_block(&self, node: NodeId) -> bool {
        self.display(node) == Some(Display::Block)
    }
}
