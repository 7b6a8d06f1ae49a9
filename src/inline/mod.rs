//! Inline expander.
//!
//! Turns one line (or one joined paragraph) into safe HTML. The text is held
//! as a sequence of [`Node`]s and run through a fixed list of passes:
//!
//! 1. Code spans become opaque `<code>` markup.
//! 2. Literal HTML tags are sanitized; allowed tags become markup, the rest
//!    stays text.
//! 3. Remaining text is escaped (entity references survive).
//! 4. `**strong**`, `*em*`, `~~s~~`.
//! 5. Inline images, then links.
//! 6. Footnote references.
//! 7. Bare URLs outside anchors (optional).
//!
//! Markup produced by one pass is never seen by a later one, so there is no
//! placeholder restoration step and no double wrapping.

mod code_span;
mod emphasis;
mod links;
pub(crate) mod node;

use memchr::memchr;

use crate::escape::escape_loose_into;
use crate::footnote::FootnoteQueue;
use crate::sanitize::{is_allowed_tag, scan_tag, write_allowed_tag, TagSpan};
use crate::Options;
use node::{push_node, push_text, Nesting, Node};

/// Inline expander configured by [`Options`].
#[derive(Debug, Clone, Copy)]
pub struct InlineExpander {
    autolink_urls: bool,
}

impl InlineExpander {
    pub fn new(options: &Options) -> Self {
        Self {
            autolink_urls: options.autolink_urls,
        }
    }

    /// Expand `text` and return the HTML.
    ///
    /// Footnote references found on the way are added to `footnotes`.
    pub fn expand(&self, text: &str, footnotes: &mut FootnoteQueue) -> String {
        let mut out = String::with_capacity(text.len() + text.len() / 4);
        self.expand_into(&mut out, text, footnotes);
        out
    }

    /// Buffer-reusing form of [`InlineExpander::expand`].
    pub fn expand_into(&self, out: &mut String, text: &str, footnotes: &mut FootnoteQueue) {
        if text.is_empty() {
            return;
        }

        let nodes = code_span::split_code_spans(text);
        let mut nodes = sanitize_tags(nodes);
        escape_text(&mut nodes);

        for delim in emphasis::PASSES {
            emphasis::resolve_emphasis(&mut nodes, delim);
        }
        links::resolve_images(&mut nodes);
        links::resolve_links(&mut nodes);
        links::resolve_footnote_refs(&mut nodes, footnotes);
        if self.autolink_urls {
            links::resolve_autolinks(&mut nodes);
        }

        for node in &nodes {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Markup { html, .. } => out.push_str(html),
            }
        }
    }
}

impl Default for InlineExpander {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

/// Turn allowed literal tags into markup; rejected tags stay as text.
fn sanitize_tags(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        let Node::Text(text) = node else {
            out.push(node);
            continue;
        };

        let bytes = text.as_bytes();
        let mut last = 0;
        let mut pos = 0;
        while let Some(offset) = memchr(b'<', &bytes[pos..]) {
            let at = pos + offset;
            match scan_tag(&text, at) {
                Some(tag) if is_allowed_tag(tag.name) => {
                    push_text(&mut out, &text[last..at]);
                    let mut html = String::with_capacity(tag.end - at);
                    write_allowed_tag(&mut html, &tag);
                    push_node(&mut out, Node::markup(html, tag_nesting(&tag)));
                    pos = tag.end;
                    last = pos;
                }
                Some(tag) => pos = tag.end,
                None => pos = at + 1,
            }
        }
        push_text(&mut out, &text[last..]);
    }
    out
}

const VOID_TAGS: [&str; 3] = ["br", "hr", "img"];

fn tag_nesting(tag: &TagSpan<'_>) -> Nesting {
    if VOID_TAGS.iter().any(|v| v.eq_ignore_ascii_case(tag.name)) {
        Nesting::Atom
    } else if tag.closing {
        Nesting::Close
    } else {
        Nesting::Open
    }
}

fn escape_text(nodes: &mut [Node]) {
    for node in nodes {
        if let Node::Text(text) = node {
            let mut escaped = String::with_capacity(text.len() + 8);
            escape_loose_into(&mut escaped, text);
            *text = escaped;
        }
    }
}
