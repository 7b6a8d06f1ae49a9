//! Emphasis, strong emphasis and strikethrough resolution.
//!
//! Each delimiter kind is resolved in its own pass, strongest first, so
//! `**` is consumed before `*` looks at the text. Openers pair with the
//! nearest closer to their right (lazy, left to right) and the content
//! between them must be non-empty. A closer is only accepted when the
//! markup between the pair is balanced; this keeps the generated HTML
//! well nested even when delimiters overlap.

use super::node::{advance, balance, find_text, slice_nodes, splice, Balance, Nesting, Node, Pos};

/// A delimiter and the element it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    pub marker: &'static str,
    pub tag: &'static str,
}

pub const STRONG: Delimiter = Delimiter {
    marker: "**",
    tag: "strong",
};

pub const EMPHASIS: Delimiter = Delimiter {
    marker: "*",
    tag: "em",
};

pub const STRIKETHROUGH: Delimiter = Delimiter {
    marker: "~~",
    tag: "s",
};

/// Passes in the order they run.
pub const PASSES: [Delimiter; 3] = [STRONG, EMPHASIS, STRIKETHROUGH];

/// Result of looking for a closer.
enum Closer {
    Found(Pos),
    /// No closer can pair with this opener, but a later opener may pair.
    Blocked,
    /// No closer exists to the right at all.
    Exhausted,
}

/// Replace every matched delimiter pair with `<tag>`…`</tag>` markup.
pub fn resolve_emphasis(nodes: &mut Vec<Node>, delim: Delimiter) {
    let mut from: Pos = (0, 0);
    while let Some(opener) = find_text(nodes, from, delim.marker) {
        let content = (opener.0, opener.1 + delim.marker.len());
        match find_closer(nodes, opener, content, delim.marker) {
            Closer::Found(closer) => {
                let inner = slice_nodes(nodes, content, closer);
                let mut replacement = Vec::with_capacity(inner.len() + 2);
                replacement.push(Node::markup(format!("<{}>", delim.tag), Nesting::Open));
                replacement.extend(inner);
                replacement.push(Node::markup(format!("</{}>", delim.tag), Nesting::Close));
                let end = (closer.0, closer.1 + delim.marker.len());
                from = splice(nodes, opener, end, replacement);
            }
            Closer::Blocked => from = (opener.0, opener.1 + 1),
            Closer::Exhausted => break,
        }
    }
}

fn find_closer(nodes: &[Node], opener: Pos, content: Pos, marker: &str) -> Closer {
    // At least one character, or the markup node that follows, of content.
    let Some(search) = advance(nodes, content) else {
        return Closer::Exhausted;
    };

    let mut candidate = find_text(nodes, search, marker);
    if candidate.is_none() {
        return Closer::Exhausted;
    }
    while let Some(pos) = candidate {
        match balance(nodes, opener.0, pos.0) {
            Balance::Even => return Closer::Found(pos),
            Balance::Escaped => return Closer::Blocked,
            Balance::Inside => candidate = find_text(nodes, (pos.0, pos.1 + 1), marker),
        }
    }
    Closer::Blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::node::render;

    fn run(input: &str) -> String {
        let mut nodes = vec![Node::Text(input.to_owned())];
        for delim in PASSES {
            resolve_emphasis(&mut nodes, delim);
        }
        render(&nodes)
    }

    #[test]
    fn test_strong_em_strike() {
        assert_eq!(run("**b** *i* ~~s~~"), "<strong>b</strong> <em>i</em> <s>s</s>");
    }

    #[test]
    fn test_lazy_pairing() {
        assert_eq!(run("*a* b *c*"), "<em>a</em> b <em>c</em>");
        assert_eq!(run("**a** and **b**"), "<strong>a</strong> and <strong>b</strong>");
    }

    #[test]
    fn test_nested() {
        assert_eq!(run("**bold *it* bold**"), "<strong>bold <em>it</em> bold</strong>");
        assert_eq!(run("*it **bold** it*"), "<em>it <strong>bold</strong> it</em>");
    }

    #[test]
    fn test_empty_content_not_matched() {
        assert_eq!(run("**"), "**");
        assert_eq!(run("a ** b"), "a ** b");
        assert_eq!(run("***"), "<em>*</em>");
    }

    #[test]
    fn test_unmatched_left_alone() {
        assert_eq!(run("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(run("a ~~ b"), "a ~~ b");
    }

    #[test]
    fn test_overlap_stays_well_nested() {
        // `*` inside the strong element cannot close an `*` outside it.
        let out = run("*a **b* c**");
        assert_eq!(out, "*a <strong>b* c</strong>");
    }

    #[test]
    fn test_content_may_be_markup() {
        let mut nodes = vec![
            Node::Text("**".to_owned()),
            Node::markup("<code>x</code>", Nesting::Atom),
            Node::Text("**".to_owned()),
        ];
        resolve_emphasis(&mut nodes, STRONG);
        assert_eq!(render(&nodes), "<strong><code>x</code></strong>");
    }
}
