use quick_xml::events::Event;
use quick_xml::Reader;

use super::xml::attr;
use super::DocxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleKind {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("character") => StyleKind::Character,
            Some("table") => StyleKind::Table,
            Some("numbering") => StyleKind::Numbering,
            _ => StyleKind::Paragraph,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub id: String,
    pub name: String,
    pub kind: StyleKind,
}

/// Style definitions of one document, as declared in `word/styles.xml`.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: Vec<Style>,
}

impl StyleSheet {
    pub fn new(styles: Vec<Style>) -> Self {
        Self { styles }
    }

    pub fn parse(xml: &str) -> Result<Self, DocxError> {
        let styles = parse_styles(xml).map_err(|source| DocxError::Xml {
            part: "word/styles.xml",
            source,
        })?;
        Ok(Self { styles })
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Display name for a style id.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }

    /// Look a style up by display name (case-insensitive), then by id.
    ///
    /// Word stores built-in names in lowercase (`heading 1`) but shows them
    /// capitalized, so both spellings must resolve.
    pub fn resolve(&self, name: &str, kind: StyleKind) -> Option<&Style> {
        let wanted = name.trim();
        if wanted.is_empty() {
            return None;
        }
        let lowered = wanted.to_lowercase();
        self.styles
            .iter()
            .filter(|s| s.kind == kind)
            .find(|s| s.name.to_lowercase() == lowered)
            .or_else(|| {
                self.styles
                    .iter()
                    .find(|s| s.kind == kind && s.id == wanted)
            })
    }
}

fn parse_styles(xml: &str) -> quick_xml::Result<Vec<Style>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut styles = Vec::new();
    let mut current: Option<Style> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.local_name().as_ref() == b"style" => {
                current = start_style(e);
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"style" => {
                if let Some(style) = start_style(e) {
                    styles.push(style);
                }
            }
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"name" => {
                if let (Some(style), Some(name)) = (current.as_mut(), attr(e, b"val")) {
                    style.name = name;
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"style" => {
                if let Some(style) = current.take() {
                    styles.push(style);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(styles)
}

fn start_style(e: &quick_xml::events::BytesStart) -> Option<Style> {
    let id = attr(e, b"styleId")?;
    let kind = StyleKind::from_attr(attr(e, b"type").as_deref());
    Some(Style {
        name: id.clone(),
        id,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="a3"><w:name w:val="หัวเรื่อง 2"/></w:style>
  <w:style w:type="character" w:styleId="Strong"><w:name w:val="Strong"/></w:style>
  <w:style w:type="paragraph" w:styleId="NoName"/>
</w:styles>"#;

    #[test]
    fn parses_ids_names_and_kinds() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        assert_eq!(sheet.len(), 5);
        assert_eq!(sheet.name_of("Heading1"), Some("heading 1"));
        assert_eq!(sheet.name_of("a3"), Some("หัวเรื่อง 2"));
        assert_eq!(sheet.name_of("NoName"), Some("NoName"));
        assert_eq!(sheet.name_of("Missing"), None);
    }

    #[test]
    fn resolves_by_name_case_insensitively_then_by_id() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        let heading = sheet.resolve("Heading 1", StyleKind::Paragraph).unwrap();
        assert_eq!(heading.id, "Heading1");
        assert_eq!(sheet.resolve("Heading1", StyleKind::Paragraph).unwrap().id, "Heading1");
        assert_eq!(sheet.resolve("หัวเรื่อง 2", StyleKind::Paragraph).unwrap().id, "a3");
    }

    #[test]
    fn resolve_respects_style_kind() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        assert!(sheet.resolve("Strong", StyleKind::Paragraph).is_none());
        assert!(sheet.resolve("Strong", StyleKind::Character).is_some());
        assert!(sheet.resolve("", StyleKind::Paragraph).is_none());
    }
}
