//! Footnote definitions and the per-section reference queue.
//!
//! Definitions are collected up front by [`preprocess`], so a reference may
//! appear before its definition. References are queued as they are expanded
//! and flushed as a block at section boundaries.

use rustc_hash::FxBuildHasher as FastHashBuilder;
use std::collections::{HashMap, HashSet};

/// Store of footnote definitions, keyed by id.
#[derive(Debug, Default, Clone)]
pub struct FootnoteTable {
    defs: HashMap<String, String, FastHashBuilder>,
}

impl FootnoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition. Later definitions overwrite earlier ones.
    pub fn insert(&mut self, id: &str, text: &str) {
        self.defs.insert(id.to_owned(), text.to_owned());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.defs.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn clear(&mut self) {
        self.defs.clear();
    }
}

/// Insertion-ordered set of ids referenced since the last flush.
#[derive(Debug, Default, Clone)]
pub struct FootnoteQueue {
    order: Vec<String>,
    seen: HashSet<String, FastHashBuilder>,
}

impl FootnoteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `id` unless it is already pending. Returns whether it was added.
    pub fn push(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_owned());
        self.order.push(id.to_owned());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Pending ids in first-reference order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Remove and return the pending ids, leaving the queue empty.
    pub fn take(&mut self) -> Vec<String> {
        self.seen.clear();
        std::mem::take(&mut self.order)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }
}

/// Recognize a `[^id]: text` definition line.
///
/// `id` is one or more characters other than `]`; `text` must contain a
/// non-whitespace character and is returned with surrounding whitespace
/// trimmed.
pub fn parse_definition(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix("[^")?;
    let close = rest.find(']')?;
    if close == 0 {
        return None;
    }
    let id = &rest[..close];
    let text = rest[close + 1..].strip_prefix(':')?.trim();
    if text.is_empty() {
        return None;
    }
    Some((id, text))
}

/// Split `input` into lines, moving footnote definitions into `table`.
///
/// Lines are split on `\n` with an optional preceding `\r`. Definition
/// lines are dropped from the result; every other line is kept in order.
pub fn preprocess<'a>(input: &'a str, table: &mut FootnoteTable) -> Vec<&'a str> {
    let mut lines = Vec::with_capacity(input.len() / 32 + 1);
    for raw in input.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        match parse_definition(line) {
            Some((id, text)) => table.insert(id, text),
            None => lines.push(line),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_definition() {
        assert_eq!(parse_definition("[^1]: First note."), Some(("1", "First note.")));
        assert_eq!(parse_definition("[^src]:tight"), Some(("src", "tight")));
        assert_eq!(parse_definition("[^a b]:  spaced  "), Some(("a b", "spaced")));
    }

    #[test]
    fn test_parse_definition_rejects() {
        assert_eq!(parse_definition("[^]: empty id"), None);
        assert_eq!(parse_definition("[^1]:"), None);
        assert_eq!(parse_definition("[^1]:   "), None);
        assert_eq!(parse_definition("[^1] no colon"), None);
        assert_eq!(parse_definition(" [^1]: indented"), None);
        assert_eq!(parse_definition("[1]: not a footnote"), None);
    }

    #[test]
    fn test_preprocess_removes_definitions() {
        let mut table = FootnoteTable::new();
        let lines = preprocess("Text[^1].\r\n\r\n[^1]: The note.\nAfter", &mut table);
        assert_eq!(lines, vec!["Text[^1].", "", "After"]);
        assert_eq!(table.get("1"), Some("The note."));
    }

    #[test]
    fn test_preprocess_last_definition_wins() {
        let mut table = FootnoteTable::new();
        preprocess("[^x]: one\n[^x]: two", &mut table);
        assert_eq!(table.get("x"), Some("two"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_preprocess_empty_input() {
        let mut table = FootnoteTable::new();
        assert_eq!(preprocess("", &mut table), vec![""]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_queue_dedup_preserves_order() {
        let mut queue = FootnoteQueue::new();
        assert!(queue.push("b"));
        assert!(queue.push("a"));
        assert!(!queue.push("b"));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["b", "a"]);

        let taken = queue.take();
        assert_eq!(taken, vec!["b".to_owned(), "a".to_owned()]);
        assert!(queue.is_empty());
        assert!(queue.push("b"));
    }
}
