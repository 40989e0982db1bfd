/// Stands for `<w:br w:type="page"/>` in run text.
pub const PAGE_BREAK: char = '\u{000C}';
/// Stands for `<w:br w:type="column"/>` in run text.
pub const COLUMN_BREAK: char = '\u{000E}';

/// Character formatting carried by a run. `None` means "not set on this run"
/// (inherited from the style), which is different from an explicit `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFormat {
    /// Character style display name.
    pub style: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Raw `w:u/@w:val`, e.g. `single`, `double`, `none`.
    pub underline: Option<String>,
    /// Latin font (`w:rFonts/@w:ascii`, falling back to `@w:hAnsi`).
    pub font: Option<String>,
    /// Complex-script font (`w:rFonts/@w:cs`), which Thai text renders with.
    pub cs_font: Option<String>,
    /// Size in half-points (`w:sz`).
    pub size: Option<u32>,
}

impl RunFormat {
    pub fn is_empty(&self) -> bool {
        *self == RunFormat::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    /// Text with tabs as `\t`, line breaks as `\n` and page or column
    /// breaks as [`PAGE_BREAK`] / [`COLUMN_BREAK`].
    pub text: String,
    pub format: RunFormat,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: RunFormat::default(),
        }
    }

    pub fn with_format(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Paragraph style display name; `None` for the default paragraph style.
    pub style: Option<String>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            style: None,
            runs: vec![Run::new(text)],
        }
    }

    pub fn styled(style: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            runs: vec![Run::new(text)],
        }
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn style_name(&self) -> &str {
        self.style.as_deref().unwrap_or("")
    }
}
