//! Link, image, footnote reference and autolink resolution.
//!
//! All of these run after escaping, so URLs and labels are already safe
//! text; only quotes still need neutralizing when a value moves into an
//! attribute.

use memchr::memchr2;

use super::node::{balance, find_text, slice_nodes, splice, Balance, Nesting, Node, Pos};
use crate::escape::escape_quotes_into;
use crate::footnote::FootnoteQueue;
use crate::sanitize::is_safe_url;

const LINK_ATTRS: &str = "\" target=\"_blank\" rel=\"noopener noreferrer\">";

/// A `PREFIX label ](url)` construct located in the node sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bracketed {
    start: Pos,
    label_start: Pos,
    label_end: Pos,
    url: String,
    end: Pos,
}

/// Find the next `prefix…](url)` at or after `from`.
///
/// The label runs to the first `]`, may span markup as long as it is
/// balanced, and must be followed directly by `(`. The URL must sit in the
/// same text node as the `]` and runs to the first `)`.
fn find_bracketed(nodes: &[Node], from: Pos, prefix: &str, allow_empty: bool) -> Option<Bracketed> {
    let mut search = from;
    while let Some(start) = find_text(nodes, search, prefix) {
        let label_start = (start.0, start.1 + prefix.len());
        if let Some(found) = match_tail(nodes, start, label_start, allow_empty) {
            return Some(found);
        }
        search = (start.0, start.1 + 1);
    }
    None
}

fn match_tail(nodes: &[Node], start: Pos, label_start: Pos, allow_empty: bool) -> Option<Bracketed> {
    let label_end = find_text(nodes, label_start, "]")?;
    if label_end == label_start && !allow_empty {
        return None;
    }
    if balance(nodes, label_start.0, label_end.0) != Balance::Even {
        return None;
    }

    let tail = &nodes[label_end.0].text()[label_end.1 + 1..];
    let body = tail.strip_prefix('(')?;
    let url_len = body.find(')')?;
    if url_len == 0 {
        return None;
    }

    Some(Bracketed {
        start,
        label_start,
        label_end,
        url: body[..url_len].to_owned(),
        end: (label_end.0, label_end.1 + 2 + url_len + 1),
    })
}

fn write_attr(out: &mut String, value: &str) {
    escape_quotes_into(out, value);
}

/// Replace `![alt](src)` with `<img>` markup.
pub fn resolve_images(nodes: &mut Vec<Node>) {
    let mut from = (0, 0);
    while let Some(image) = find_bracketed(nodes, from, "![", true) {
        let alt: String = slice_nodes(nodes, image.label_start, image.label_end)
            .iter()
            .map(Node::text)
            .collect();

        let mut html = String::from("<img");
        if is_safe_url(&image.url) {
            html.push_str(" src=\"");
            write_attr(&mut html, &image.url);
            html.push('"');
        }
        html.push_str(" alt=\"");
        write_attr(&mut html, &alt);
        html.push_str("\">");

        from = splice(nodes, image.start, image.end, vec![Node::markup(html, Nesting::Atom)]);
    }
}

/// Replace `[text](url)` with an anchor opening in a new tab.
///
/// A URL with a blocked scheme keeps the label text and drops the link.
pub fn resolve_links(nodes: &mut Vec<Node>) {
    let mut from = (0, 0);
    while let Some(link) = find_bracketed(nodes, from, "[", false) {
        let label = slice_nodes(nodes, link.label_start, link.label_end);
        let replacement = if is_safe_url(&link.url) {
            let mut open = String::from("<a href=\"");
            write_attr(&mut open, &link.url);
            open.push_str(LINK_ATTRS);

            let mut nodes = Vec::with_capacity(label.len() + 2);
            nodes.push(Node::markup(open, Nesting::Open));
            nodes.extend(label);
            nodes.push(Node::markup("</a>", Nesting::Close));
            nodes
        } else {
            log::debug!("dropping link with blocked scheme: {}", link.url);
            label
        };
        from = splice(nodes, link.start, link.end, replacement);
    }
}

/// Replace `[^id]` with a superscript anchor and queue the id.
///
/// The id is registered in its decoded form so it matches the definition
/// table, which holds raw ids.
pub fn resolve_footnote_refs(nodes: &mut Vec<Node>, queue: &mut FootnoteQueue) {
    let mut from = (0, 0);
    while let Some(start) = find_text(nodes, from, "[^") {
        let text = nodes[start.0].text();
        let id_start = start.1 + 2;
        let Some(len) = text[id_start..].find(']').filter(|&len| len > 0) else {
            from = (start.0, start.1 + 1);
            continue;
        };
        let id = &text[id_start..id_start + len];

        queue.push(&html_escape::decode_html_entities(id));

        let mut html = String::from("<sup><a href=\"#footnote-");
        write_attr(&mut html, id);
        html.push_str("\" class=\"footnote-ref\">");
        html.push_str(id);
        html.push_str("</a></sup>");

        let end = (start.0, id_start + len + 1);
        from = splice(nodes, start, end, vec![Node::markup(html, Nesting::Atom)]);
    }
}

const SCHEMES: [&str; 3] = ["https://", "http://", "ftp://"];

/// Entities that end a bare URL, in their escaped form.
const URL_STOPS: [&str; 4] = ["&lt;", "&gt;", "&quot;", "&#39;"];

/// Wrap bare URLs in text outside any anchor.
pub fn resolve_autolinks(nodes: &mut Vec<Node>) {
    let mut anchor_depth = 0usize;
    let mut idx = 0;
    while idx < nodes.len() {
        match &nodes[idx] {
            Node::Markup { html, .. } => {
                if is_anchor_open(html) {
                    anchor_depth += 1;
                } else if html.eq_ignore_ascii_case("</a>") {
                    anchor_depth = anchor_depth.saturating_sub(1);
                }
                idx += 1;
            }
            Node::Text(text) if anchor_depth == 0 => match find_url(text) {
                Some((start, end)) => {
                    let url = &text[start..end];
                    let mut html = String::with_capacity(url.len() * 2 + LINK_ATTRS.len() + 16);
                    html.push_str("<a href=\"");
                    html.push_str(url);
                    html.push_str(LINK_ATTRS);
                    html.push_str(url);
                    html.push_str("</a>");
                    let resume = splice(
                        nodes,
                        (idx, start),
                        (idx, end),
                        vec![Node::markup(html, Nesting::Atom)],
                    );
                    idx = resume.0;
                }
                None => idx += 1,
            },
            Node::Text(_) => idx += 1,
        }
    }
}

fn is_anchor_open(html: &str) -> bool {
    let bytes = html.as_bytes();
    bytes.len() > 2
        && bytes[0] == b'<'
        && bytes[1].eq_ignore_ascii_case(&b'a')
        && (bytes[2] == b'>' || bytes[2].is_ascii_whitespace())
}

/// Locate the first bare URL in escaped text as a byte range.
fn find_url(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while let Some(offset) = memchr2(b'h', b'f', &bytes[pos..]) {
        let start = pos + offset;
        pos = start + 1;

        let rest = &text[start..];
        let Some(scheme) = SCHEMES.iter().find(|s| rest.starts_with(*s)) else {
            continue;
        };

        let body_start = start + scheme.len();
        let mut end = body_start;
        while end < bytes.len() {
            let b = bytes[end];
            if b.is_ascii_whitespace() || matches!(b, b'<' | b'>' | b'"' | b'\'') {
                break;
            }
            if b == b'&' && URL_STOPS.iter().any(|stop| text[end..].starts_with(stop)) {
                break;
            }
            end += 1;
        }
        while end > body_start && matches!(bytes[end - 1], b'.' | b',' | b';' | b':' | b'!' | b'?') {
            end -= 1;
        }
        if end > body_start {
            return Some((start, end));
        }
    }
    None
}
