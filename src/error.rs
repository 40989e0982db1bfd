use std::path::PathBuf;

use thiserror::Error;

use crate::docx::DocxError;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("failed to load {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: DocxError,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: DocxError,
    },
}

pub type Result<T, E = MergeError> = std::result::Result<T, E>;
