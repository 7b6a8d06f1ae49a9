//! Loading documents from disk.
//!
//! The renderer itself never fails. Reading a document can, and a failed
//! read is turned into a small caution alert so callers can still render
//! something through the same pipeline.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Label used for documents read from standard input.
pub const STDIN_LABEL: &str = "stdin";

/// Errors raised while loading a document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },
    #[error("cannot read standard input: {0}")]
    Stdin(#[source] io::Error),
}

/// Read a UTF-8 document from `path`.
pub fn load(path: &Path) -> Result<String, SourceError> {
    let bytes = fs::read(path).map_err(|source| SourceError::Read {
        path: path.to_owned(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| SourceError::NotUtf8 {
        path: path.to_owned(),
    })
}

/// Read a UTF-8 document from standard input.
pub fn load_stdin() -> Result<String, SourceError> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(SourceError::Stdin)?;
    Ok(text)
}

/// Footer label for a document path: its file name, or the whole path when
/// it has none.
pub fn label_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Markdown shown in place of a document that could not be loaded.
///
/// # Example
/// ```
/// let md = paperdown::source::failure_document("a.md", "not found");
/// assert!(md.starts_with("> [!CAUTION]\n"));
/// assert!(paperdown::to_html(&md).contains("alert-caution"));
/// ```
pub fn failure_document(path: &str, error: impl std::fmt::Display) -> String {
    format!("> [!CAUTION]\n> Failed to load file: \"{path}\".\n>\n> **Error:** {error}")
}
