//! Vocabulary shared by the block recognizers, state machine and writer.

/// Alert categories introduced by a `> [!KIND]` marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// Informational note.
    Note,
    /// Helpful tip.
    Tip,
    /// Important information.
    Important,
    /// Warning about potential issues.
    Warning,
    /// Critical caution about dangerous actions.
    Caution,
}

impl AlertKind {
    pub const ALL: [AlertKind; 5] = [
        Self::Note,
        Self::Tip,
        Self::Important,
        Self::Warning,
        Self::Caution,
    ];

    /// Title shown when a category has no entry in the title table.
    pub const FALLBACK_TITLE: &'static str = "Alert";

    /// Parse the marker name (`NOTE`, `tip`, …), ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.css_suffix().eq_ignore_ascii_case(name))
    }

    /// CSS class suffix (lowercase).
    pub fn css_suffix(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    /// Display title for the alert header.
    pub fn title(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
        }
    }
}

/// List type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `*` marker.
    Unordered,
    /// `1.` style or `-` marker.
    Ordered,
}

impl ListKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

/// Task list item state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    /// Not a task list item.
    #[default]
    None,
    /// `[ ]` or `[]`.
    Unchecked,
    /// `[x]` or `[X]`.
    Checked,
}

/// Line rules in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRule {
    Fence,
    Blank,
    IndentedCode,
    Heading,
    HorizontalRule,
    ListItem,
    TableRow,
    Quote,
    Image,
    Paragraph,
}

/// Kinds of multi-line block that buffer content until closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Code,
    Table,
    Quote,
    Alert,
}

/// One rendered heading, as recorded in the document outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for the document title, 2-6 for section headings.
    pub level: u8,
    /// Computed prefix such as `"2"` or `"2.1"`, when numbering applies.
    pub number: Option<String>,
    /// Heading text as written in the source.
    pub text: String,
}
