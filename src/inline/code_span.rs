//! Code span extraction.
//!
//! Code spans have highest precedence among inline elements: a span is a
//! single backtick, one or more non-backtick characters, and a single
//! closing backtick. Its content is escaped literally and no other pass
//! ever sees it.

use memchr::memchr;

use super::node::{push_node, push_text, Nesting, Node};
use crate::escape::escape_html_into;

/// Split raw line text into text and `<code>` markup nodes.
pub fn split_code_spans(text: &str) -> Vec<Node> {
    let bytes = text.as_bytes();
    let mut nodes = Vec::new();
    let mut last = 0;
    let mut pos = 0;

    while let Some(offset) = memchr(b'`', &bytes[pos..]) {
        let open = pos + offset;
        let Some(len) = memchr(b'`', &bytes[open + 1..]) else {
            break;
        };
        if len == 0 {
            // "``": retry with the second backtick as opener.
            pos = open + 1;
            continue;
        }

        let close = open + 1 + len;
        push_text(&mut nodes, &text[last..open]);
        let mut html = String::with_capacity(len + 13);
        html.push_str("<code>");
        escape_html_into(&mut html, &text[open + 1..close]);
        html.push_str("</code>");
        push_node(&mut nodes, Node::markup(html, Nesting::Atom));

        pos = close + 1;
        last = pos;
    }

    push_text(&mut nodes, &text[last..]);
    nodes
}
