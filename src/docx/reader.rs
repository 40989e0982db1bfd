use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::model::{Paragraph, Run, COLUMN_BREAK, PAGE_BREAK};
use super::styles::StyleSheet;
use super::xml::{attr, toggle};
use super::{DocxError, SourceDocument};

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const STYLES_PART: &str = "word/styles.xml";
pub(crate) const NUMBERING_PART: &str = "word/numbering.xml";

/// A `.docx` package loaded into memory: its body-level paragraphs and the
/// style definitions needed to name them.
#[derive(Debug, Clone)]
pub struct DocxDocument {
    paragraphs: Vec<Paragraph>,
    styles: StyleSheet,
    styles_xml: Option<String>,
    numbering_xml: Option<String>,
}

impl DocxDocument {
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        let document_xml =
            read_part(&mut archive, DOCUMENT_PART)?.ok_or(DocxError::MissingPart(DOCUMENT_PART))?;
        let styles_xml = read_part(&mut archive, STYLES_PART)?;
        let numbering_xml = read_part(&mut archive, NUMBERING_PART)?;

        let styles = match &styles_xml {
            Some(xml) => StyleSheet::parse(xml)?,
            None => StyleSheet::default(),
        };
        let paragraphs = parse_body(&document_xml, &styles).map_err(|source| DocxError::Xml {
            part: DOCUMENT_PART,
            source,
        })?;

        tracing::debug!(
            paragraphs = paragraphs.len(),
            styles = styles.len(),
            "parsed document package"
        );

        Ok(Self {
            paragraphs,
            styles,
            styles_xml,
            numbering_xml,
        })
    }

    /// Raw `word/styles.xml`, if the package has one.
    pub fn styles_xml(&self) -> Option<&str> {
        self.styles_xml.as_deref()
    }

    /// Raw `word/numbering.xml`, if the package has one.
    pub fn numbering_xml(&self) -> Option<&str> {
        self.numbering_xml.as_deref()
    }
}

impl SourceDocument for DocxDocument {
    fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    fn styles(&self) -> &StyleSheet {
        &self.styles
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, DocxError> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut buffer = Vec::new();
            entry.read_to_end(&mut buffer)?;
            Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Walks `word/document.xml` collecting the paragraphs that are direct
/// children of `w:body`. Table cells and text boxes are not body paragraphs.
/// Tracked-change property blocks hold the previous formatting and are
/// skipped along with text boxes.
struct BodyParser<'s> {
    styles: &'s StyleSheet,
    stack: Vec<Vec<u8>>,
    skip_depth: Option<usize>,
    paragraphs: Vec<Paragraph>,
    current: Option<Paragraph>,
    run: Option<Run>,
    in_ppr: bool,
    in_rpr: bool,
    in_text: bool,
}

impl<'s> BodyParser<'s> {
    fn new(styles: &'s StyleSheet) -> Self {
        Self {
            styles,
            stack: Vec::new(),
            skip_depth: None,
            paragraphs: Vec::new(),
            current: None,
            run: None,
            in_ppr: false,
            in_rpr: false,
            in_text: false,
        }
    }

    fn style_name(&self, id: String) -> String {
        self.styles.name_of(&id).map(str::to_string).unwrap_or(id)
    }

    fn open(&mut self, e: &BytesStart) {
        let name = e.local_name();
        let name = name.as_ref();

        if name == b"p" {
            if self.stack.last().map(Vec::as_slice) == Some(b"body".as_slice()) {
                self.current = Some(Paragraph::default());
            }
            return;
        }
        if self.current.is_none() {
            return;
        }

        match name {
            b"pPr" => self.in_ppr = true,
            b"pStyle" if self.in_ppr => {
                if let Some(id) = attr(e, b"val") {
                    let style = self.style_name(id);
                    if let Some(p) = self.current.as_mut() {
                        p.style = Some(style);
                    }
                }
            }
            b"r" if !self.in_ppr => self.run = Some(Run::default()),
            b"rPr" if self.run.is_some() => self.in_rpr = true,
            _ if self.in_rpr => self.run_property(name, e),
            b"t" if self.run.is_some() => self.in_text = true,
            b"tab" if self.run.is_some() && !self.in_ppr => self.push_text("\t"),
            b"br" if self.run.is_some() => match attr(e, b"type").as_deref() {
                Some("page") => self.push_char(PAGE_BREAK),
                Some("column") => self.push_char(COLUMN_BREAK),
                _ => self.push_char('\n'),
            },
            b"cr" if self.run.is_some() => self.push_char('\n'),
            _ => {}
        }
    }

    fn run_property(&mut self, name: &[u8], e: &BytesStart) {
        let style = match name {
            b"rStyle" => attr(e, b"val").map(|id| self.style_name(id)),
            _ => None,
        };
        let Some(run) = self.run.as_mut() else { return };
        let format = &mut run.format;
        match name {
            b"rStyle" => format.style = style,
            b"b" => format.bold = Some(toggle(e)),
            b"i" => format.italic = Some(toggle(e)),
            b"u" => format.underline = Some(attr(e, b"val").unwrap_or_else(|| "single".to_string())),
            b"rFonts" => {
                format.font = attr(e, b"ascii").or_else(|| attr(e, b"hAnsi"));
                format.cs_font = attr(e, b"cs");
            }
            b"sz" => format.size = attr(e, b"val").and_then(|v| v.parse().ok()),
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }

    fn push_char(&mut self, ch: char) {
        if let Some(run) = self.run.as_mut() {
            run.text.push(ch);
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"rPr" => self.in_rpr = false,
            b"pPr" => self.in_ppr = false,
            b"r" => {
                if let (Some(run), Some(p)) = (self.run.take(), self.current.as_mut()) {
                    p.runs.push(run);
                }
                self.in_rpr = false;
                self.in_text = false;
            }
            b"p" if self.stack.last().map(Vec::as_slice) == Some(b"body".as_slice()) => {
                if let Some(p) = self.current.take() {
                    self.paragraphs.push(p);
                }
                self.run = None;
                self.in_ppr = false;
            }
            _ => {}
        }
    }
}

const SKIPPED: [&[u8]; 3] = [b"txbxContent", b"pPrChange", b"rPrChange"];

fn parse_body(xml: &str, styles: &StyleSheet) -> quick_xml::Result<Vec<Paragraph>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut parser = BodyParser::new(styles);

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = e.local_name().as_ref().to_vec();
                if parser.skip_depth.is_none() {
                    if SKIPPED.contains(&name.as_slice()) {
                        parser.skip_depth = Some(parser.stack.len());
                    } else {
                        parser.open(e);
                    }
                }
                parser.stack.push(name);
            }
            Event::Empty(ref e) => {
                if parser.skip_depth.is_none() {
                    parser.open(e);
                    parser.close(e.local_name().as_ref());
                }
            }
            Event::Text(ref t) => {
                if parser.skip_depth.is_none() && parser.in_text {
                    let text = t.unescape()?;
                    parser.push_text(&text);
                }
            }
            Event::End(ref e) => {
                parser.stack.pop();
                match parser.skip_depth {
                    Some(depth) if parser.stack.len() == depth => parser.skip_depth = None,
                    Some(_) => {}
                    None => parser.close(e.local_name().as_ref()),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(parser.paragraphs)
}
