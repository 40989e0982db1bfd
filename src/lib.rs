//! Merge the section bodies of a source `.docx` into the heading outline of a
//! template `.docx`, pairing sections by normalized, fuzzy-matched titles.
//!
//! Built for Thai/English thesis chapters whose headings are either styled
//! (`Heading N`, `หัวเรื่อง N`) or numbered in the text (`1.2.3`, `บทที่ 1`).

pub mod assemble;
pub mod docx;
pub mod error;
pub mod heading;
pub mod matcher;
pub mod merge;
pub mod normalize;
pub mod section;
pub mod similarity;

pub use assemble::{merge_documents, MergeReport, MergeStats, SectionOutcome};
pub use error::{MergeError, Result};
pub use matcher::{find_best_match, TitleIndex, TitleMatch, DEFAULT_THRESHOLD};
pub use merge::{backup_path, merge_files, MergeOptions, MergeOutcome};
pub use normalize::normalize_title;
pub use section::{parse_sections, Section};
