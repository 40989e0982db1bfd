use std::fmt;

use serde::Serialize;

use crate::docx::{SourceDocument, TargetDocument};
use crate::matcher::{find_best_match, TitleIndex};
use crate::section::{parse_sections, Section};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub matched_sections: usize,
    pub skipped_sections: usize,
    pub total_template_sections: usize,
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matched={} skipped={} total={}",
            self.matched_sections, self.skipped_sections, self.total_template_sections
        )
    }
}

/// What happened to one template section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionOutcome {
    pub title: String,
    pub level: u32,
    /// Title of the source section whose body was copied.
    pub source_title: Option<String>,
    pub score: Option<f64>,
    pub exact: bool,
    pub paragraphs: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    pub stats: MergeStats,
    pub outcomes: Vec<SectionOutcome>,
}

/// Rebuild `template`'s heading outline in `out`, filling each heading with
/// the body of the best-matching `source` section.
pub fn merge_documents(
    template: &impl SourceDocument,
    source: &impl SourceDocument,
    out: &mut impl TargetDocument,
    threshold: f64,
) -> MergeReport {
    let template_sections = parse_sections(template);
    let source_sections = parse_sections(source);
    tracing::info!(
        template = template_sections.len(),
        source = source_sections.len(),
        "parsed sections"
    );
    merge_sections(&template_sections, &source_sections, out, threshold)
}

pub fn merge_sections(
    template: &[Section],
    source: &[Section],
    out: &mut impl TargetDocument,
    threshold: f64,
) -> MergeReport {
    let index = TitleIndex::build(source);
    let mut report = MergeReport {
        stats: MergeStats {
            total_template_sections: template.len(),
            ..MergeStats::default()
        },
        outcomes: Vec::with_capacity(template.len()),
    };

    for section in template {
        out.add_heading(&section.title, section.level);

        let outcome = match find_best_match(&section.title, &index, threshold) {
            Some(found) => {
                let matched = &source[found.position];
                for p in &matched.paragraphs {
                    out.add_paragraph(p.style.as_deref(), &p.runs);
                }
                report.stats.matched_sections += 1;
                tracing::debug!(
                    template = %section.title,
                    source = %matched.title,
                    score = found.score,
                    exact = found.exact,
                    "matched section"
                );
                SectionOutcome {
                    title: section.title.clone(),
                    level: section.level,
                    source_title: Some(matched.title.clone()),
                    score: Some(found.score),
                    exact: found.exact,
                    paragraphs: matched.paragraphs.len(),
                }
            }
            None => {
                report.stats.skipped_sections += 1;
                tracing::debug!(template = %section.title, "no source section; left empty");
                SectionOutcome {
                    title: section.title.clone(),
                    level: section.level,
                    source_title: None,
                    score: None,
                    exact: false,
                    paragraphs: 0,
                }
            }
        };
        report.outcomes.push(outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{DocxBuilder, Paragraph, Run, RunFormat, StyleSheet};
    use crate::matcher::DEFAULT_THRESHOLD;

    struct Paragraphs(Vec<Paragraph>, StyleSheet);

    impl Paragraphs {
        fn new(paragraphs: Vec<Paragraph>) -> Self {
            Self(paragraphs, StyleSheet::default())
        }
    }

    impl SourceDocument for Paragraphs {
        fn paragraphs(&self) -> &[Paragraph] {
            &self.0
        }

        fn styles(&self) -> &StyleSheet {
            &self.1
        }
    }

    fn texts(out: &DocxBuilder) -> Vec<String> {
        out.paragraphs().iter().map(Paragraph::text).collect()
    }

    #[test]
    fn unmatched_headings_are_left_empty_and_counted() {
        let template = Paragraphs::new(vec![
            Paragraph::styled("Heading 1", "Introduction"),
            Paragraph::styled("Heading 2", "1.1 Zebra Migration Patterns"),
        ]);
        let source = Paragraphs::new(vec![
            Paragraph::styled("Heading 1", "1. Introduction"),
            Paragraph::plain("Intro body."),
            Paragraph::styled("Heading 2", "1.2 Budget"),
            Paragraph::plain("Budget body."),
        ]);

        let mut out = DocxBuilder::new();
        let report = merge_documents(&template, &source, &mut out, DEFAULT_THRESHOLD);

        assert_eq!(
            report.stats,
            MergeStats {
                matched_sections: 1,
                skipped_sections: 1,
                total_template_sections: 2,
            }
        );
        assert_eq!(
            texts(&out),
            vec!["Introduction", "Intro body.", "1.1 Zebra Migration Patterns"]
        );
        assert_eq!(report.outcomes[1].source_title, None);
        assert_eq!(report.outcomes[0].source_title.as_deref(), Some("1. Introduction"));
        assert!(report.outcomes[0].exact);
    }

    #[test]
    fn follows_template_order_not_source_order() {
        let template = Paragraphs::new(vec![
            Paragraph::styled("Heading 1", "Objectives"),
            Paragraph::styled("Heading 1", "Background"),
        ]);
        let source = Paragraphs::new(vec![
            Paragraph::styled("Heading 1", "Background"),
            Paragraph::plain("B."),
            Paragraph::styled("Heading 1", "Objectives"),
            Paragraph::plain("O."),
        ]);

        let mut out = DocxBuilder::new();
        merge_documents(&template, &source, &mut out, DEFAULT_THRESHOLD);
        assert_eq!(texts(&out), vec!["Objectives", "O.", "Background", "B."]);
    }

    #[test]
    fn copies_run_formatting_and_resolvable_styles() {
        let template = Paragraphs::new(vec![Paragraph::styled("Heading 1", "Scope")]);
        let bold = RunFormat {
            bold: Some(true),
            font: Some("TH SarabunPSK".to_string()),
            size: Some(32),
            ..RunFormat::default()
        };
        let source = Paragraphs::new(vec![
            Paragraph::styled("Heading 1", "Scope"),
            Paragraph {
                style: Some("List Paragraph".to_string()),
                runs: vec![Run::with_format("Bold ", bold.clone()), Run::new("plain")],
            },
            Paragraph {
                style: Some("Thesis Body".to_string()),
                runs: vec![Run::new("custom style")],
            },
            Paragraph::default(),
        ]);

        let mut out = DocxBuilder::new();
        let report = merge_documents(&template, &source, &mut out, DEFAULT_THRESHOLD);
        assert_eq!(report.outcomes[0].paragraphs, 3);

        let copied = &out.paragraphs()[1..];
        assert_eq!(copied[0].style.as_deref(), Some("List Paragraph"));
        assert_eq!(copied[0].runs[0].format, bold);
        assert_eq!(copied[0].text(), "Bold plain");
        assert_eq!(copied[1].style, None);
        assert_eq!(copied[1].text(), "custom style");
        assert!(copied[2].runs.is_empty());
    }

    #[test]
    fn empty_template_produces_empty_report() {
        let template = Paragraphs::new(vec![Paragraph::plain("no headings")]);
        let source = Paragraphs::new(vec![Paragraph::styled("Heading 1", "Anything")]);
        let mut out = DocxBuilder::new();
        let report = merge_documents(&template, &source, &mut out, DEFAULT_THRESHOLD);
        assert_eq!(report, MergeReport::default());
        assert!(out.paragraphs().is_empty());
    }

    #[test]
    fn stats_display() {
        let stats = MergeStats {
            matched_sections: 2,
            skipped_sections: 1,
            total_template_sections: 3,
        };
        assert_eq!(stats.to_string(), "matched=2 skipped=1 total=3");
    }
}
