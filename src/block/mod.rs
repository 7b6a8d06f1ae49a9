//! Block-level parser.
//!
//! The block parser is line-oriented and handles:
//! - Fenced and indented code
//! - Document title with metadata, numbered section headings
//! - Horizontal rules
//! - Nested lists and task lists
//! - Pipe tables
//! - Blockquotes and alerts
//! - Standalone images (figures)
//! - Paragraphs

mod kind;
mod parser;
mod scan;
mod state;

pub use kind::{AlertKind, BlockKind, Heading, LineRule, ListKind, TaskState};
pub use parser::{dispatch_order, BlockParser};
pub use state::{closes, closes_list};
