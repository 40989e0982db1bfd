use crate::docx::{Paragraph, SourceDocument};
use crate::heading::heading_level;
use crate::normalize::normalize_title;

/// A heading and the body paragraphs that follow it up to the next heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Heading text as written, trimmed.
    pub title: String,
    pub normalized: String,
    pub level: u32,
    pub paragraphs: Vec<Paragraph>,
}

impl Section {
    pub fn new(title: &str, level: u32) -> Self {
        let title = title.trim().to_string();
        Self {
            normalized: normalize_title(&title),
            title,
            level,
            paragraphs: Vec::new(),
        }
    }
}

/// Split a document into sections. Paragraphs before the first heading
/// belong to no section and are dropped.
pub fn parse_sections(doc: &impl SourceDocument) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut preamble = 0usize;

    for p in doc.paragraphs() {
        let text = p.text();
        match heading_level(p.style_name(), &text) {
            Some(level) => sections.push(Section::new(&text, level)),
            None => match sections.last_mut() {
                Some(current) => current.paragraphs.push(p.clone()),
                None => preamble += 1,
            },
        }
    }

    if preamble > 0 {
        tracing::debug!(paragraphs = preamble, "dropped paragraphs before the first heading");
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::StyleSheet;

    struct Paragraphs(Vec<Paragraph>);

    impl SourceDocument for Paragraphs {
        fn paragraphs(&self) -> &[Paragraph] {
            &self.0
        }

        fn styles(&self) -> &StyleSheet {
            unimplemented!("section parsing reads style names from paragraphs")
        }
    }

    #[test]
    fn groups_body_paragraphs_under_headings() {
        let doc = Paragraphs(vec![
            Paragraph::plain("Cover page"),
            Paragraph::styled("Heading 1", "  บทที่ 1 บทนำ "),
            Paragraph::plain("Opening remarks."),
            Paragraph::plain("1.1 ความเป็นมา"),
            Paragraph::plain("First body."),
            Paragraph::plain("Second body."),
            Paragraph::styled("Heading 2", "Empty section"),
        ]);

        let sections = parse_sections(&doc);
        assert_eq!(sections.len(), 3);

        assert_eq!(sections[0].title, "บทที่ 1 บทนำ");
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].paragraphs, vec![Paragraph::plain("Opening remarks.")]);

        assert_eq!(sections[1].title, "1.1 ความเป็นมา");
        assert_eq!(sections[1].normalized, "ความเป็นมา");
        assert_eq!(sections[1].level, 2);
        assert_eq!(sections[1].paragraphs.len(), 2);

        assert_eq!(sections[2].level, 2);
        assert!(sections[2].paragraphs.is_empty());
    }

    #[test]
    fn document_without_headings_has_no_sections() {
        let doc = Paragraphs(vec![Paragraph::plain("just"), Paragraph::plain("text")]);
        assert!(parse_sections(&doc).is_empty());
    }
}
