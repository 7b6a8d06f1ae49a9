//! Open-block state and the closing transition table.

use smallvec::SmallVec;

use super::kind::{AlertKind, BlockKind, LineRule, ListKind};
use super::scan::Cells;

/// Buffered fenced code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    pub fence: &'a str,
    pub lang: &'a str,
    pub lines: Vec<&'a str>,
}

/// Buffered table rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBlock<'a> {
    pub header: Option<Cells<'a>>,
    pub rows: Vec<Cells<'a>>,
}

/// The one multi-line block that may be open at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OpenBlock<'a> {
    #[default]
    None,
    Code(CodeBlock<'a>),
    Table(TableBlock<'a>),
    Quote(Vec<&'a str>),
    Alert { kind: AlertKind, lines: Vec<&'a str> },
}

impl OpenBlock<'_> {
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Self::None => None,
            Self::Code(_) => Some(BlockKind::Code),
            Self::Table(_) => Some(BlockKind::Table),
            Self::Quote(_) => Some(BlockKind::Quote),
            Self::Alert { .. } => Some(BlockKind::Alert),
        }
    }

    pub fn is_quote_like(&self) -> bool {
        matches!(self, Self::Quote(_) | Self::Alert { .. })
    }
}

/// One level of list nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFrame {
    pub kind: ListKind,
    pub depth: usize,
}

/// Open lists, outermost first. Depth strictly increases towards the top.
pub type ListStack = SmallVec<[ListFrame; 8]>;

/// Whether a line accepted by `rule` closes an open block of kind `block`.
///
/// Quote-like blocks absorb blank lines and further quote lines; tables
/// absorb further rows. Indented code is written out immediately and leaves
/// a buffered table or quote open. Code blocks never reach this table
/// because the fence rule takes every line while one is open.
pub fn closes(block: BlockKind, rule: LineRule) -> bool {
    use BlockKind as B;
    use LineRule as R;

    match (block, rule) {
        (B::Code, _) => true,
        (_, R::IndentedCode) => false,
        (B::Table, R::TableRow) => false,
        (B::Quote | B::Alert, R::Blank | R::Quote) => false,
        _ => true,
    }
}

/// Whether a line accepted by `rule` closes the list stack.
///
/// List items manage the stack themselves.
pub fn closes_list(rule: LineRule) -> bool {
    rule != LineRule::ListItem
}
