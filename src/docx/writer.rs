use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::model::{Paragraph, Run, RunFormat, COLUMN_BREAK, PAGE_BREAK};
use super::reader::{DocxDocument, DOCUMENT_PART, NUMBERING_PART, STYLES_PART};
use super::styles::{Style, StyleKind, StyleSheet};
use super::xml::xml_escape_text;
use super::{DocxError, TargetDocument};

/// Builds a new `.docx` package paragraph by paragraph.
#[derive(Debug, Clone)]
pub struct DocxBuilder {
    styles: StyleSheet,
    styles_xml: String,
    numbering_xml: Option<String>,
    paragraphs: Vec<Paragraph>,
}

impl Default for DocxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxBuilder {
    /// An empty document on the built-in stylesheet.
    pub fn new() -> Self {
        let builtins = builtin_styles();
        let styles = StyleSheet::new(
            builtins
                .iter()
                .map(|b| Style {
                    id: b.id.clone(),
                    name: b.name.clone(),
                    kind: b.kind,
                })
                .collect(),
        );
        Self {
            styles,
            styles_xml: styles_xml(&builtins),
            numbering_xml: None,
            paragraphs: Vec::new(),
        }
    }

    /// An empty document that reuses `doc`'s style and numbering parts, so
    /// its style names resolve in the output. Falls back to the built-in
    /// stylesheet when `doc` has no styles part or it declares no styles.
    pub fn with_styles_of(doc: &DocxDocument) -> Self {
        use super::SourceDocument;

        match doc.styles_xml() {
            Some(xml) if !doc.styles().is_empty() => Self {
                styles: doc.styles().clone(),
                styles_xml: xml.to_string(),
                numbering_xml: doc.numbering_xml().map(str::to_string),
                paragraphs: Vec::new(),
            },
            _ => {
                tracing::warn!("template has no style definitions; using built-in styles");
                Self::new()
            }
        }
    }

    /// Paragraphs added so far, with style names as the output stylesheet
    /// spells them.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    fn canonical_name(&self, name: &str, kind: StyleKind) -> Option<String> {
        self.styles.resolve(name, kind).map(|s| s.name.clone())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let has_numbering = self.numbering_xml.is_some();

        zip.start_file("[Content_Types].xml", opts)?;
        zip.write_all(content_types_xml(has_numbering).as_bytes())?;

        zip.start_file("_rels/.rels", opts)?;
        zip.write_all(rels_xml().as_bytes())?;

        zip.start_file(DOCUMENT_PART, opts)?;
        zip.write_all(self.document_xml().as_bytes())?;

        zip.start_file(STYLES_PART, opts)?;
        zip.write_all(self.styles_xml.as_bytes())?;

        if let Some(numbering) = &self.numbering_xml {
            zip.start_file(NUMBERING_PART, opts)?;
            zip.write_all(numbering.as_bytes())?;
        }

        zip.start_file("word/_rels/document.xml.rels", opts)?;
        zip.write_all(document_rels_xml(has_numbering).as_bytes())?;

        Ok(zip.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<(), DocxError> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    fn document_xml(&self) -> String {
        let mut body = String::new();
        for p in &self.paragraphs {
            body.push_str(&self.paragraph_xml(p));
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:wpc="http://schemas.microsoft.com/office/word/2010/wordprocessingCanvas"
 xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"
 xmlns:o="urn:schemas-microsoft-com:office:office"
 xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
 xmlns:m="http://schemas.openxmlformats.org/officeDocument/2006/math"
 xmlns:v="urn:schemas-microsoft-com:vml"
 xmlns:wp14="http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing"
 xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
 xmlns:w10="urn:schemas-microsoft-com:office:word"
 xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
 xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordprocessingml"
 xmlns:w15="http://schemas.microsoft.com/office/word/2012/wordprocessingml"
 xmlns:wpg="http://schemas.microsoft.com/office/word/2010/wordprocessingGroup"
 xmlns:wpi="http://schemas.microsoft.com/office/word/2010/wordprocessingInk"
 xmlns:wne="http://schemas.microsoft.com/office/word/2006/wordml"
 xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"
 mc:Ignorable="w14 w15 wp14">
  <w:body>
    {body}
    <w:sectPr>
      <w:pgSz w:w="11906" w:h="16838"/>
      <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>
      <w:cols w:space="708"/>
      <w:docGrid w:linePitch="360"/>
    </w:sectPr>
  </w:body>
</w:document>"#,
            body = body
        )
    }

    fn paragraph_xml(&self, p: &Paragraph) -> String {
        let mut out = String::new();
        out.push_str("<w:p>");

        let style_id = p
            .style
            .as_deref()
            .and_then(|name| self.styles.resolve(name, StyleKind::Paragraph));
        if let Some(style) = style_id {
            out.push_str(&format!(
                "<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>",
                xml_escape_text(&style.id)
            ));
        }

        for run in &p.runs {
            out.push_str(&self.run_xml(run));
        }

        out.push_str("</w:p>");
        out
    }

    fn run_xml(&self, run: &Run) -> String {
        if run.text.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        out.push_str("<w:r>");
        let props = if run.format.is_empty() {
            String::new()
        } else {
            self.run_properties_xml(&run.format)
        };
        if !props.is_empty() {
            out.push_str("<w:rPr>");
            out.push_str(&props);
            out.push_str("</w:rPr>");
        }

        let mut piece = String::new();
        for ch in run.text.chars() {
            let tag = match ch {
                '\n' => "<w:br/>",
                '\t' => "<w:tab/>",
                PAGE_BREAK => "<w:br w:type=\"page\"/>",
                COLUMN_BREAK => "<w:br w:type=\"column\"/>",
                _ => {
                    piece.push(ch);
                    continue;
                }
            };
            push_text_xml(&mut out, &mut piece);
            out.push_str(tag);
        }
        push_text_xml(&mut out, &mut piece);

        out.push_str("</w:r>");
        out
    }

    // Element order follows CT_RPr: rStyle, rFonts, b, i, sz, u.
    fn run_properties_xml(&self, format: &RunFormat) -> String {
        let mut out = String::new();
        if let Some(style) = format
            .style
            .as_deref()
            .and_then(|name| self.styles.resolve(name, StyleKind::Character))
        {
            out.push_str(&format!("<w:rStyle w:val=\"{}\"/>", xml_escape_text(&style.id)));
        }
        if format.font.is_some() || format.cs_font.is_some() {
            out.push_str("<w:rFonts");
            if let Some(font) = &format.font {
                let font = xml_escape_text(font);
                out.push_str(&format!(" w:ascii=\"{font}\" w:hAnsi=\"{font}\""));
            }
            if let Some(cs) = &format.cs_font {
                out.push_str(&format!(" w:cs=\"{}\"", xml_escape_text(cs)));
            }
            out.push_str("/>");
        }
        push_toggle(&mut out, "b", format.bold);
        push_toggle(&mut out, "i", format.italic);
        if let Some(size) = format.size {
            out.push_str(&format!("<w:sz w:val=\"{size}\"/>"));
        }
        if let Some(u) = &format.underline {
            out.push_str(&format!("<w:u w:val=\"{}\"/>", xml_escape_text(u)));
        }
        out
    }
}

/// Flush pending text as a `w:t` element.
fn push_text_xml(out: &mut String, piece: &mut String) {
    if piece.is_empty() {
        return;
    }
    out.push_str("<w:t xml:space=\"preserve\">");
    out.push_str(&xml_escape_text(piece));
    out.push_str("</w:t>");
    piece.clear();
}

fn push_toggle(out: &mut String, tag: &str, value: Option<bool>) {
    match value {
        Some(true) => out.push_str(&format!("<w:{tag}/>")),
        Some(false) => out.push_str(&format!("<w:{tag} w:val=\"0\"/>")),
        None => {}
    }
}

impl TargetDocument for DocxBuilder {
    fn add_heading(&mut self, text: &str, level: u32) {
        let style = self.canonical_name(&format!("Heading {level}"), StyleKind::Paragraph);
        if style.is_none() {
            tracing::debug!(level, "no heading style for level; writing a plain paragraph");
        }
        self.paragraphs.push(Paragraph {
            style,
            runs: vec![Run::new(text)],
        });
    }

    fn add_paragraph(&mut self, style: Option<&str>, runs: &[Run]) {
        let style = style.and_then(|name| {
            let resolved = self.canonical_name(name, StyleKind::Paragraph);
            if resolved.is_none() {
                tracing::debug!(style = name, "paragraph style not in output; dropped");
            }
            resolved
        });

        let runs = runs
            .iter()
            .map(|run| {
                let mut run = run.clone();
                if let Some(name) = run.format.style.take() {
                    run.format.style = self.canonical_name(&name, StyleKind::Character);
                    if run.format.style.is_none() {
                        tracing::debug!(style = %name, "character style not in output; dropped");
                    }
                }
                run
            })
            .collect();

        self.paragraphs.push(Paragraph { style, runs });
    }

    fn resolve_style(&self, name: &str, kind: StyleKind) -> Option<&str> {
        self.styles.resolve(name, kind).map(|s| s.id.as_str())
    }
}

fn content_types_xml(has_numbering: bool) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    out.push('\n');
    out.push_str(
        r#"  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    out.push('\n');
    out.push_str(r#"  <Default Extension="xml" ContentType="application/xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#);
    out.push('\n');
    if has_numbering {
        out.push_str(r#"  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#);
        out.push('\n');
    }
    out.push_str("</Types>");
    out
}

fn rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
}

fn document_rels_xml(has_numbering: bool) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    out.push('\n');
    out.push_str(r#"  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#);
    out.push('\n');
    if has_numbering {
        out.push_str(r#"  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#);
        out.push('\n');
    }
    out.push_str("</Relationships>");
    out
}

struct BuiltinStyle {
    id: String,
    name: String,
    kind: StyleKind,
    body: String,
}

impl BuiltinStyle {
    fn new(id: &str, name: &str, kind: StyleKind, body: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            body: body.to_string(),
        }
    }
}

fn builtin_styles() -> Vec<BuiltinStyle> {
    let mut styles = vec![
        BuiltinStyle::new("Normal", "Normal", StyleKind::Paragraph, "<w:qFormat/>"),
        BuiltinStyle::new(
            "Title",
            "Title",
            StyleKind::Paragraph,
            r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="10"/><w:qFormat/>
    <w:pPr><w:spacing w:after="300"/></w:pPr>
    <w:rPr><w:sz w:val="52"/></w:rPr>"#,
        ),
    ];

    // Sizes in half-points, level 1 first.
    let sizes = [32u32, 28, 26, 24, 24, 24, 22, 22, 22];
    for (i, size) in sizes.iter().enumerate() {
        let level = i + 1;
        styles.push(BuiltinStyle {
            id: format!("Heading{level}"),
            name: format!("heading {level}"),
            kind: StyleKind::Paragraph,
            body: format!(
                r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/><w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="{before}" w:after="120"/><w:outlineLvl w:val="{outline}"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="{size}"/></w:rPr>"#,
                before = if level == 1 { 360 } else { 240 },
                outline = i,
                size = size,
            ),
        });
    }

    styles.extend([
        BuiltinStyle::new(
            "ListParagraph",
            "List Paragraph",
            StyleKind::Paragraph,
            r#"<w:basedOn w:val="Normal"/><w:uiPriority w:val="34"/><w:qFormat/>
    <w:pPr><w:ind w:left="720"/></w:pPr>"#,
        ),
        BuiltinStyle::new(
            "Quote",
            "Quote",
            StyleKind::Paragraph,
            r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="29"/><w:qFormat/>
    <w:rPr><w:i/></w:rPr>"#,
        ),
        BuiltinStyle::new(
            "Caption",
            "Caption",
            StyleKind::Paragraph,
            r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="35"/><w:qFormat/>
    <w:rPr><w:b/><w:sz w:val="18"/></w:rPr>"#,
        ),
        BuiltinStyle::new(
            "DefaultParagraphFont",
            "Default Paragraph Font",
            StyleKind::Character,
            r#"<w:uiPriority w:val="1"/><w:semiHidden/>"#,
        ),
        BuiltinStyle::new(
            "Strong",
            "Strong",
            StyleKind::Character,
            r#"<w:basedOn w:val="DefaultParagraphFont"/><w:uiPriority w:val="22"/><w:qFormat/>
    <w:rPr><w:b/></w:rPr>"#,
        ),
        BuiltinStyle::new(
            "Emphasis",
            "Emphasis",
            StyleKind::Character,
            r#"<w:basedOn w:val="DefaultParagraphFont"/><w:uiPriority w:val="20"/><w:qFormat/>
    <w:rPr><w:i/></w:rPr>"#,
        ),
    ]);

    styles
}

fn styles_xml(styles: &[BuiltinStyle]) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#);
    out.push('\n');
    for style in styles {
        let (kind, default) = match style.kind {
            StyleKind::Paragraph => ("paragraph", style.id == "Normal"),
            StyleKind::Character => ("character", style.id == "DefaultParagraphFont"),
            StyleKind::Table => ("table", false),
            StyleKind::Numbering => ("numbering", false),
        };
        out.push_str(&format!(
            r#"  <w:style w:type="{kind}"{default} w:styleId="{id}">
    <w:name w:val="{name}"/>
    {body}
  </w:style>"#,
            kind = kind,
            default = if default { r#" w:default="1""# } else { "" },
            id = style.id,
            name = style.name,
            body = style.body,
        ));
        out.push('\n');
    }
    out.push_str("</w:styles>");
    out
}
