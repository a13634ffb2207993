// src/html.rs
//
// Tag-soup HTML loader: builds a `Tree` good enough to walk as rendered text.
//
// - Start tags open elements; void and self-closing tags don't.
// - End tags close the nearest open element with the same name; unmatched end
//   tags are ignored.
// - RAW-TEXT elements (script, style, textarea, title, xmp, plaintext) keep
//   their content verbatim as a single text child.
// - Adjacent text runs merge into one text node.
// - Comments become comment nodes; `<!DOCTYPE>` and `<?...>` are dropped.
// - An unterminated tag or comment at EOF is kept as text.
// - Text decodes the common named references and numeric references.
//
// This is not a conforming HTML parser: no implied end tags, no foster
// parenting, no implicit html/head/body.

use crate::error::{Error, Result};
use crate::tree::{NodeId, Tree};
use memchr::memchr;
use tracing::debug;

/* =============================== Core sets =============================== */

fn is_void(name: &[u8]) -> bool {
    matches_ignore_ascii_case(
        name,
        &[
            b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
            b"param", b"source", b"track", b"wbr",
        ],
    )
}

fn is_raw_text(name: &[u8]) -> bool {
    matches_ignore_ascii_case(
        name,
        &[b"script", b"style", b"textarea", b"title", b"xmp", b"plaintext"],
    )
}

/* ============================ Utility predicates ========================= */

#[inline]
fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

#[inline]
fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' || b == b'\x0c'
}

fn matches_ignore_ascii_case(name: &[u8], set: &[&[u8]]) -> bool {
    set.iter().any(|&s| name.eq_ignore_ascii_case(s))
}

/* =============================== Tag parsing ============================= */

#[derive(Clone, Copy, Debug)]
struct TagInfo<'a> {
    name: &'a [u8],
    is_end: bool,
    self_closing: bool,
}

/// Find the '>' for a tag starting at `i` (s[i] == '<'), being quote-aware.
fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    i += 1;
    let mut quote: u8 = 0;
    while i < s.len() {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if b == b'"' || b == b'\'' {
            quote = b;
        } else if b == b'>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Extract tag name, end/self-closing flags from raw `<...>` bytes.
fn parse_tag_info(tag: &[u8]) -> TagInfo<'_> {
    let n = tag.len();
    let mut i = 1;

    let mut is_end = false;
    if i < n && tag[i] == b'/' {
        is_end = true;
        i += 1;
    }
    let start = i;
    while i < n && is_name_char(tag[i]) {
        i += 1;
    }
    let name = &tag[start..i];

    let mut j = n - 1;
    while j > 0 && is_ws(tag[j - 1]) {
        j -= 1;
    }
    let self_closing = j >= 2 && tag[j - 1] == b'/';

    TagInfo {
        name,
        is_end,
        self_closing,
    }
}

/// A tag is a start or end tag only when a name follows `<` or `</` directly.
fn looks_like_tag(s: &[u8], i: usize) -> bool {
    let at = if s.get(i + 1) == Some(&b'/') { i + 2 } else { i + 1 };
    s.get(at).is_some_and(u8::is_ascii_alphabetic)
}

/* ============================ Attribute scan ============================= */

/// Scan `[name] ( '=' [value] )?` pairs from raw `<...>` bytes.
fn parse_attrs(tag: &[u8]) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let len = tag.len();
    let mut i = 1usize;

    // skip the tag name
    while i < len && is_name_char(tag[i]) {
        i += 1;
    }

    while i < len && tag[i] != b'>' {
        while i < len && (is_ws(tag[i]) || tag[i] == b'/') {
            i += 1;
        }
        if i >= len || tag[i] == b'>' {
            break;
        }

        if !is_name_char(tag[i]) {
            i += 1;
            continue;
        }
        let name_start = i;
        i += 1;
        while i < len && is_name_char(tag[i]) {
            i += 1;
        }
        let name = String::from_utf8_lossy(&tag[name_start..i]).to_ascii_lowercase();

        while i < len && is_ws(tag[i]) {
            i += 1;
        }

        let mut value = String::new();
        if i < len && tag[i] == b'=' {
            i += 1;
            while i < len && is_ws(tag[i]) {
                i += 1;
            }
            if i >= len || tag[i] == b'>' {
                attrs.push((name, value));
                break;
            }

            let value_start;
            let value_end;
            if tag[i] == b'"' || tag[i] == b'\'' {
                let q = tag[i];
                i += 1;
                value_start = i;
                while i < len && tag[i] != q {
                    i += 1;
                }
                value_end = i;
                if i < len {
                    i += 1;
                }
            } else {
                value_start = i;
                while i < len && !is_ws(tag[i]) && tag[i] != b'>' {
                    i += 1;
                }
                value_end = i;
            }
            value = decode_entities(&String::from_utf8_lossy(&tag[value_start..value_end]));
        }

        if !attrs.iter().any(|(existing, _)| *existing == name) {
            attrs.push((name, value));
        }
    }
    attrs
}

/* ============================== Comments ================================ */

/// Index of the '-' that starts the closing `-->`, for a comment at `i`.
fn scan_comment(s: &[u8], i: usize) -> Option<usize> {
    let mut k = i + 4;
    while k < s.len() {
        let j = k + memchr(b'-', &s[k..])?;
        if j + 2 < s.len() && s[j + 1] == b'-' && s[j + 2] == b'>' {
            return Some(j);
        }
        k = j + 1;
    }
    None
}

/* ============================ Raw-text content =========================== */

/// Find the matching `</name ...>` for a raw-text element whose content starts
/// at `i`. Returns (content_end, index_after_end_tag).
fn find_raw_text_end(src: &[u8], i: usize, name: &[u8]) -> (usize, usize) {
    let n = src.len();
    let mut j = i;
    while j < n {
        let Some(pos) = memchr(b'<', &src[j..]).map(|off| j + off) else {
            break;
        };
        if pos + 2 >= n || src[pos + 1] != b'/' {
            j = pos + 1;
            continue;
        }
        let Some(end) = find_tag_end(src, pos) else {
            break;
        };
        let ti = parse_tag_info(&src[pos..=end]);
        if ti.name.eq_ignore_ascii_case(name) {
            return (pos, end + 1);
        }
        j = end + 1;
    }
    (n, n)
}

/* =========================== Character references ======================== */

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one(rest) {
            Some((ch, used)) => {
                out.push(ch);
                rest = &rest[used..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode a reference at the start of `s` (which begins with '&').
fn decode_one(s: &str) -> Option<(char, usize)> {
    let semi = s.bytes().take(12).position(|b| b == b';')?;
    let body = &s[1..semi];
    let ch = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
    } else {
        match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{a0}',
            "shy" => '\u{ad}',
            "copy" => '\u{a9}',
            "mdash" => '\u{2014}',
            "ndash" => '\u{2013}',
            "hellip" => '\u{2026}',
            _ => return None,
        }
    };
    Some((ch, semi + 1))
}

/* ================================ Builder ================================ */

struct Builder {
    tree: Tree,
    // Open elements with their lowercased names; the document is implicit.
    open: Vec<(NodeId, Vec<u8>)>,
    // Text bytes not yet turned into a node.
    pending: Vec<u8>,
}

impl Builder {
    fn parent(&self) -> NodeId {
        self.open.last().map_or(NodeId::DOCUMENT, |(id, _)| *id)
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = decode_entities(&String::from_utf8_lossy(&self.pending));
        self.pending.clear();
        let parent = self.parent();
        self.tree.append_text(parent, &text);
    }

    fn close(&mut self, name: &[u8]) {
        self.flush();
        match self.open.iter().rposition(|(_, open)| open.eq_ignore_ascii_case(name)) {
            Some(at) => self.open.truncate(at),
            None => debug!(tag = %String::from_utf8_lossy(name), "ignoring unmatched end tag"),
        }
    }
}

/// Parse markup into a tree.
pub fn parse(src: &str) -> Tree {
    let src = src.as_bytes();
    let n = src.len();
    let mut b = Builder {
        tree: Tree::new(),
        open: Vec::new(),
        pending: Vec::new(),
    };
    let mut i = 0usize;

    while i < n {
        // Comments
        if src[i..].starts_with(b"<!--") {
            let Some(j) = scan_comment(src, i) else {
                debug!(at = i, "unterminated comment");
                b.pending.extend_from_slice(&src[i..]);
                break;
            };
            b.flush();
            let parent = b.parent();
            let body = String::from_utf8_lossy(&src[i + 4..j]);
            b.tree.append_comment(parent, &body);
            i = j + 3;
            continue;
        }

        // Doctype and processing instructions
        if src[i..].starts_with(b"<!") || src[i..].starts_with(b"<?") {
            match memchr(b'>', &src[i..]) {
                Some(off) => i += off + 1,
                None => {
                    debug!(at = i, "unterminated declaration");
                    b.pending.extend_from_slice(&src[i..]);
                    break;
                }
            }
            continue;
        }

        // Tags
        if src[i] == b'<' && looks_like_tag(src, i) {
            let Some(j) = find_tag_end(src, i) else {
                debug!(at = i, "unterminated tag");
                b.pending.extend_from_slice(&src[i..]);
                break;
            };
            let tag = &src[i..=j];
            let ti = parse_tag_info(tag);
            i = j + 1;

            if ti.is_end {
                b.close(ti.name);
                continue;
            }

            b.flush();
            let name = String::from_utf8_lossy(ti.name);
            let parent = b.parent();
            let id = b.tree.append_element_with_attrs(parent, &name, parse_attrs(tag));

            if ti.self_closing || is_void(ti.name) {
                continue;
            }
            if is_raw_text(ti.name) {
                let (content_end, after) = find_raw_text_end(src, i, ti.name);
                let content = String::from_utf8_lossy(&src[i..content_end]);
                if !content.is_empty() {
                    // Escapable raw text still decodes references.
                    if ti.name.eq_ignore_ascii_case(b"textarea")
                        || ti.name.eq_ignore_ascii_case(b"title")
                    {
                        b.tree.append_text(id, &decode_entities(&content));
                    } else {
                        b.tree.append_text(id, &content);
                    }
                }
                i = after;
                continue;
            }
            b.open.push((id, ti.name.to_ascii_lowercase()));
            continue;
        }

        // Text run
        let from = if src[i] == b'<' { i + 1 } else { i };
        let next_lt = memchr(b'<', &src[from..]).map(|off| from + off).unwrap_or(n);
        b.pending.extend_from_slice(&src[i..next_lt]);
        i = next_lt;
    }

    b.flush();
    b.tree
}

/// Read and parse a file.
pub fn load(path: &std::path::Path) -> Result<Tree> {
    let bytes = std::fs::read(path)?;
    let src = String::from_utf8(bytes)?;
    Ok(parse(&src))
}

/// First element named `tag` in document order.
pub fn find_element(tree: &Tree, tag: &str) -> Result<NodeId> {
    tree.descendants(NodeId::DOCUMENT)
        .find(|&id| tree.element_name(id).is_some_and(|name| name.eq_ignore_ascii_case(tag)))
        .ok_or_else(|| Error::RootNotFound {
            tag: tag.to_owned(),
        })
}
