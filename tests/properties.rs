use pretty_assertions::assert_eq;
use rendertext::{
    BugReportIter, DocumentTree, Emitted, NodeId, StyleClassifier, Tree, TreeCursor, Walker,
    END_OF_STREAM,
};

fn drain(
    iter: &mut BugReportIter<'_, Tree, Walker<'_>, StyleClassifier<'_>>,
    flag: bool,
) -> Vec<i32> {
    let mut out = Vec::new();
    loop {
        let code = iter.advance(flag).code();
        out.push(code);
        if code == END_OF_STREAM {
            return out;
        }
    }
}

fn codes_of(text: &str) -> Vec<i32> {
    text.chars().map(|c| c as i32).collect()
}

#[test]
fn plain_text_node_yields_its_code_points() {
    let mut tree = Tree::new();
    let text = tree.append_text(NodeId::DOCUMENT, "héllo wörld");
    let mut expected = codes_of("héllo wörld");
    expected.push(END_OF_STREAM);
    assert_eq!(drain(&mut BugReportIter::over(&tree, text), false), expected);
}

#[test]
fn surrogate_pair_is_one_value() {
    let mut tree = Tree::new();
    let text = tree.append_text(NodeId::DOCUMENT, "a🎉b");
    assert_eq!(
        drain(&mut BugReportIter::over(&tree, text), false),
        vec!['a' as i32, 0x1F389, 'b' as i32, END_OF_STREAM]
    );
}

#[test]
fn unpaired_low_surrogate_is_skipped() {
    let mut tree = Tree::new();
    let text = tree.append_text_units(NodeId::DOCUMENT, vec![0x61, 0xDE00, 0x62]);
    assert_eq!(
        drain(&mut BugReportIter::over(&tree, text), false),
        vec![0x61, 0x62, END_OF_STREAM]
    );
}

#[test]
fn lone_line_break() {
    let mut tree = Tree::new();
    let br = tree.append_element(NodeId::DOCUMENT, "br");
    for flag in [false, true] {
        assert_eq!(
            drain(&mut BugReportIter::over(&tree, br), flag),
            vec![10, END_OF_STREAM]
        );
    }
}

#[test]
fn sibling_blocks_break_between() {
    let mut tree = Tree::new();
    let body = tree.append_element(NodeId::DOCUMENT, "body");
    let first = tree.append_element(body, "div");
    tree.append_text(first, "A");
    let second = tree.append_element(body, "div");
    tree.append_text(second, "B");

    assert_eq!(
        drain(&mut BugReportIter::over(&tree, body), false),
        vec![65, 10, 66, END_OF_STREAM]
    );
    assert_eq!(
        drain(&mut BugReportIter::over(&tree, body), true),
        vec![65, -10, 66, END_OF_STREAM]
    );
}

#[test]
fn nested_leading_block_breaks_once() {
    let mut tree = Tree::new();
    let outer = tree.append_element(NodeId::DOCUMENT, "div");
    let inner = tree.append_element(outer, "div");
    tree.append_text(inner, "X");

    assert_eq!(
        drain(&mut BugReportIter::over(&tree, outer), false),
        vec!['X' as i32, END_OF_STREAM]
    );
    // From the document the outer block breaks, the inner one is absorbed.
    assert_eq!(
        drain(&mut BugReportIter::over(&tree, NodeId::DOCUMENT), false),
        vec![10, 'X' as i32, END_OF_STREAM]
    );
}

#[test]
fn end_of_stream_repeats() {
    let mut tree = Tree::new();
    let p = tree.append_element(NodeId::DOCUMENT, "p");
    tree.append_text(p, "z");
    let mut iter = BugReportIter::over(&tree, p);
    assert_eq!(iter.advance(false), Emitted::Scalar('z' as u32));
    for flag in [false, true, false] {
        assert_eq!(iter.advance(flag), Emitted::End);
    }
}

#[test]
fn empty_root_ends_immediately() {
    let tree = Tree::new();
    let mut iter = BugReportIter::over(&tree, NodeId::DOCUMENT);
    assert_eq!(iter.advance(false), Emitted::End);
    assert_eq!(iter.collect_text(false), "");
}

/// Walker wrapper that remembers where plain forward movement left it.
struct Tracking<'t> {
    inner: Walker<'t>,
    forward: NodeId,
}

impl TreeCursor for Tracking<'_> {
    type Node = NodeId;
    type Position = NodeId;

    fn current_node(&self) -> NodeId {
        self.inner.current_node()
    }

    fn next_node(&mut self) -> Option<NodeId> {
        let next = self.inner.next_node();
        if let Some(node) = next {
            self.forward = node;
        }
        next
    }

    fn previous_node(&mut self) -> Option<NodeId> {
        self.inner.previous_node()
    }

    fn previous_sibling(&mut self) -> Option<NodeId> {
        self.inner.previous_sibling()
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

#[test]
fn probes_never_leak_into_cursor_position() {
    let tree = rendertext::html::parse(
        "<body>a<div>b<p>c</p></div>d<span>e<br>f</span><section><div>g</div></section>h</body>",
    );
    let body = rendertext::html::find_element(&tree, "body").expect("body");
    let cursor = Tracking {
        inner: Walker::new(&tree, body),
        forward: body,
    };
    let mut iter = BugReportIter::new(&tree, cursor, StyleClassifier::new(&tree));

    let mut text = String::new();
    loop {
        let emitted = iter.advance(false);
        assert_eq!(iter.current_node(), iter.cursor().forward);
        match emitted.as_char() {
            Some(ch) => text.push(ch),
            None => break,
        }
    }
    assert_eq!(text, "a\nb\nc\nde\nf\ng\nh");
    assert!(tree.has_text_content(body));
}
