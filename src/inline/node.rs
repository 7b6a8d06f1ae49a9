//! Node sequence shared by the inline passes.
//!
//! A line is held as alternating `Text` (still carrying Markdown syntax) and
//! `Markup` (finished HTML). Passes only search inside `Text`, so markup
//! produced by an earlier pass is never rewritten by a later one.
//!
//! The sequence is kept normalized: no empty `Text` and never two `Text`
//! nodes side by side.

use memchr::memmem;

/// How a markup node affects element nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Open,
    Close,
    Atom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Markup { html: String, nesting: Nesting },
}

impl Node {
    pub fn markup(html: impl Into<String>, nesting: Nesting) -> Self {
        Node::Markup {
            html: html.into(),
            nesting,
        }
    }

    /// Text content, or `""` for markup.
    pub fn text(&self) -> &str {
        match self {
            Node::Text(t) => t,
            Node::Markup { .. } => "",
        }
    }
}

/// A position inside a node sequence: node index and byte offset.
pub type Pos = (usize, usize);

/// Append a node, merging adjacent text and dropping empty text.
pub fn push_node(nodes: &mut Vec<Node>, node: Node) {
    match node {
        Node::Text(t) if t.is_empty() => {}
        Node::Text(t) => match nodes.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(&t),
            _ => nodes.push(Node::Text(t)),
        },
        markup => nodes.push(markup),
    }
}

#[inline]
pub fn push_text(nodes: &mut Vec<Node>, text: &str) {
    push_node(nodes, Node::Text(text.to_owned()));
}

/// Find the next occurrence of `pat` inside a text node at or after `from`.
pub fn find_text(nodes: &[Node], from: Pos, pat: &str) -> Option<Pos> {
    let finder = memmem::Finder::new(pat.as_bytes());
    let (mut idx, mut off) = from;
    while idx < nodes.len() {
        if let Node::Text(t) = &nodes[idx] {
            if let Some(hit) = t.get(off..).and_then(|rest| finder.find(rest.as_bytes())) {
                return Some((idx, off + hit));
            }
        }
        idx += 1;
        off = 0;
    }
    None
}

/// Step one character past `pos`, moving into the next node at a text end.
pub fn advance(nodes: &[Node], pos: Pos) -> Option<Pos> {
    let (idx, off) = pos;
    let text = nodes.get(idx)?.text();
    match text.get(off..).and_then(|rest| rest.chars().next()) {
        Some(c) => Some((idx, off + c.len_utf8())),
        None => (idx + 1 < nodes.len()).then_some((idx + 1, 0)),
    }
}

/// Nesting of the markup strictly between two node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    /// Every element opened in the range is also closed in it.
    Even,
    /// Some element opened in the range is still open at its end.
    Inside,
    /// The range closes an element opened before it.
    Escaped,
}

pub fn balance(nodes: &[Node], from: usize, to: usize) -> Balance {
    if to <= from + 1 {
        return Balance::Even;
    }
    let mut depth = 0usize;
    for node in &nodes[from + 1..to] {
        match node {
            Node::Markup {
                nesting: Nesting::Open,
                ..
            } => depth += 1,
            Node::Markup {
                nesting: Nesting::Close,
                ..
            } => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return Balance::Escaped,
            },
            _ => {}
        }
    }
    if depth == 0 {
        Balance::Even
    } else {
        Balance::Inside
    }
}

/// Copy the nodes between two text positions.
pub fn slice_nodes(nodes: &[Node], from: Pos, to: Pos) -> Vec<Node> {
    let mut out = Vec::new();
    if from.0 == to.0 {
        push_text(&mut out, &nodes[from.0].text()[from.1..to.1]);
        return out;
    }
    push_text(&mut out, &nodes[from.0].text()[from.1..]);
    for node in &nodes[from.0 + 1..to.0] {
        push_node(&mut out, node.clone());
    }
    push_text(&mut out, &nodes[to.0].text()[..to.1]);
    out
}

/// Replace everything between two text positions with `replacement`.
///
/// Both positions must lie in text nodes. Text before `start` and after
/// `end` is kept; since the neighbours of a text node are always markup,
/// the result stays normalized. Returns the position just after the
/// inserted content.
pub fn splice(nodes: &mut Vec<Node>, start: Pos, end: Pos, replacement: Vec<Node>) -> Pos {
    let mut spliced = Vec::with_capacity(replacement.len() + 2);
    push_text(&mut spliced, &nodes[start.0].text()[..start.1]);
    for node in replacement {
        push_node(&mut spliced, node);
    }
    let resume = match spliced.last() {
        Some(Node::Text(t)) => (start.0 + spliced.len() - 1, t.len()),
        _ => (start.0 + spliced.len(), 0),
    };
    push_text(&mut spliced, &nodes[end.0].text()[end.1..]);

    nodes.splice(start.0..=end.0, spliced);
    resume
}

/// Concatenate the sequence into final HTML.
#[cfg(test)]
pub fn render(nodes: &[Node]) -> String {
    let mut out = String::with_capacity(nodes.iter().map(|n| n.len_hint()).sum());
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Markup { html, .. } => out.push_str(html),
        }
    }
    out
}

#[cfg(test)]
impl Node {
    #[inline]
    fn len_hint(&self) -> usize {
        match self {
            Node::Text(t) => t.len(),
            Node::Markup { html, .. } => html.len(),
        }
    }
}
