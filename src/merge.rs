use std::fs;
use std::path::{Path, PathBuf};

use crate::assemble::{merge_documents, MergeReport};
use crate::docx::{DocxBuilder, DocxDocument};
use crate::error::{MergeError, Result};
use crate::matcher::DEFAULT_THRESHOLD;

/// Marker inserted before the extension of a backed-up target.
pub const BACKUP_MARKER: &str = " (backup)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Lowest similarity ratio accepted as a fuzzy title match.
    pub threshold: f64,
    /// Build the output on the template's style definitions instead of the
    /// built-in ones.
    pub inherit_styles: bool,
    /// Match and report without touching the target.
    pub dry_run: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            inherit_styles: false,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub report: MergeReport,
    /// Where the previous target was copied, if it existed and the copy worked.
    pub backup: Option<PathBuf>,
    pub written: bool,
}

/// `dir/name (backup).ext` next to `target`.
pub fn backup_path(target: &Path) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match target.extension() {
        Some(ext) => format!("{stem}{BACKUP_MARKER}.{}", ext.to_string_lossy()),
        None => format!("{stem}{BACKUP_MARKER}"),
    };
    target.with_file_name(name)
}

/// Copy an existing `target` aside. Failure is logged, not returned: a
/// missing backup must not stop the merge.
fn back_up(target: &Path) -> Option<PathBuf> {
    if !target.exists() {
        return None;
    }
    let backup = backup_path(target);
    match fs::copy(target, &backup) {
        Ok(_) => {
            tracing::info!(backup = %backup.display(), "backed up existing target");
            Some(backup)
        }
        Err(e) => {
            tracing::warn!(
                target = %target.display(),
                error = %e,
                "failed to back up target; continuing"
            );
            None
        }
    }
}

/// Merge `source`'s section bodies into `template`'s heading outline and
/// write the result to `target`.
pub fn merge_files(
    template: &Path,
    source: &Path,
    target: &Path,
    options: &MergeOptions,
) -> Result<MergeOutcome> {
    if !template.exists() {
        return Err(MergeError::TemplateNotFound(template.to_path_buf()));
    }
    if !source.exists() {
        return Err(MergeError::SourceNotFound(source.to_path_buf()));
    }

    let template_doc = DocxDocument::open(template).map_err(|e| MergeError::Load {
        path: template.to_path_buf(),
        source: e,
    })?;
    let source_doc = DocxDocument::open(source).map_err(|e| MergeError::Load {
        path: source.to_path_buf(),
        source: e,
    })?;

    let mut out = if options.inherit_styles {
        DocxBuilder::with_styles_of(&template_doc)
    } else {
        DocxBuilder::new()
    };
    let report = merge_documents(&template_doc, &source_doc, &mut out, options.threshold);

    if options.dry_run {
        return Ok(MergeOutcome {
            report,
            backup: None,
            written: false,
        });
    }

    let backup = back_up(target);
    out.save(target).map_err(|e| MergeError::Write {
        path: target.to_path_buf(),
        source: e,
    })?;
    tracing::info!(target = %target.display(), "wrote merged document");

    Ok(MergeOutcome {
        report,
        backup,
        written: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_marker_goes_before_the_extension() {
        assert_eq!(
            backup_path(Path::new("/work/5.บทที่ 1.docx")),
            PathBuf::from("/work/5.บทที่ 1 (backup).docx")
        );
        assert_eq!(backup_path(Path::new("out")), PathBuf::from("out (backup)"));
        assert_eq!(
            backup_path(Path::new("dir/chapter.v2.docx")),
            PathBuf::from("dir/chapter.v2 (backup).docx")
        );
    }

    #[test]
    fn missing_inputs_fail_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.docx");
        let existing = dir.path().join("present.docx");
        DocxBuilder::new().save(&existing).unwrap();

        let err = merge_files(
            &dir.path().join("missing.docx"),
            &existing,
            &target,
            &MergeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::TemplateNotFound(_)));
        assert_eq!(err.to_string(), format!("Template not found: {}", dir.path().join("missing.docx").display()));

        let err = merge_files(
            &existing,
            &dir.path().join("missing.docx"),
            &target,
            &MergeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::SourceNotFound(_)));
        assert!(!target.exists());
    }

    #[test]
    fn corrupt_input_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.docx");
        fs::write(&bad, b"plain text").unwrap();
        let err = merge_files(&bad, &bad, &dir.path().join("out.docx"), &MergeOptions::default())
            .unwrap_err();
        assert!(matches!(err, MergeError::Load { .. }));
    }

    #[test]
    fn failed_backup_still_writes_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        DocxBuilder::new().save(&input).unwrap();
        let target = dir.path().join("out.docx");
        fs::write(&target, b"previous").unwrap();
        fs::create_dir(backup_path(&target)).unwrap();

        let outcome = merge_files(&input, &input, &target, &MergeOptions::default()).unwrap();
        assert_eq!(outcome.backup, None);
        assert!(outcome.written);
        assert_ne!(fs::read(&target).unwrap(), b"previous");
        assert!(DocxDocument::open(&target).is_ok());
        assert!(backup_path(&target).is_dir());
    }

    #[test]
    fn dry_run_leaves_the_target_alone() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        DocxBuilder::new().save(&input).unwrap();
        let target = dir.path().join("out.docx");
        fs::write(&target, b"previous").unwrap();

        let options = MergeOptions {
            dry_run: true,
            ..MergeOptions::default()
        };
        let outcome = merge_files(&input, &input, &target, &options).unwrap();
        assert!(!outcome.written);
        assert_eq!(outcome.backup, None);
        assert_eq!(fs::read(&target).unwrap(), b"previous");
        assert!(!backup_path(&target).exists());
    }
}
