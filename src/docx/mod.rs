//! Minimal WordprocessingML document model.
//!
//! The merge logic only sees [`SourceDocument`] and [`TargetDocument`]; the
//! zip/XML handling lives in [`reader`] and [`writer`].

pub mod model;
pub mod reader;
pub mod styles;
pub mod writer;
mod xml;

use thiserror::Error;

pub use model::{Paragraph, Run, RunFormat};
pub use reader::DocxDocument;
pub use styles::{Style, StyleKind, StyleSheet};
pub use writer::DocxBuilder;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("invalid document package")]
    Zip(#[from] zip::result::ZipError),
    #[error("malformed XML in {part}")]
    Xml {
        part: &'static str,
        #[source]
        source: quick_xml::Error,
    },
    #[error("document package has no {0}")]
    MissingPart(&'static str),
}

/// Read side of a document: its body paragraphs in order and its styles.
pub trait SourceDocument {
    fn paragraphs(&self) -> &[Paragraph];
    fn styles(&self) -> &StyleSheet;
}

/// Write side of a document.
///
/// Style names that the target cannot resolve are dropped by the
/// implementation; text is always kept.
pub trait TargetDocument {
    /// Append a heading paragraph at `level` (1-based).
    fn add_heading(&mut self, text: &str, level: u32);

    /// Append a body paragraph with an optional paragraph style name.
    fn add_paragraph(&mut self, style: Option<&str>, runs: &[Run]);

    /// The target's style id for a display name, if it has one.
    fn resolve_style(&self, name: &str, kind: StyleKind) -> Option<&str>;
}
