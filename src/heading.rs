//! Heading detection for thesis documents.
//!
//! A paragraph is a heading when its style says so (`Heading N`, or the Thai
//! localized `หัวเรื่อง N`), or, failing that, when its text opens with a
//! chapter marker or a dotted section number. The style check always runs
//! first: documents with custom heading styles still number their text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TRAILING_DIGITS: Regex = Regex::new(r"([0-9]+)$").unwrap();
    static ref FIRST_DIGITS: Regex = Regex::new(r"([0-9]+)").unwrap();
    static ref CHAPTER_MARKER: Regex = Regex::new(r"^(?:บทที่|(?i:chapter))\s*[0-9]+").unwrap();
    static ref DOTTED_NUMBER: Regex = Regex::new(r"^[0-9]+(?:\.[0-9]+)*[.)\s]").unwrap();
    static ref NUMBER_GROUP: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// Localized name Thai Word uses for its built-in heading styles.
const THAI_HEADING_STYLE: &str = "หัวเรื่อง";

/// Heading level of a paragraph, or `None` for body text.
pub fn heading_level(style_name: &str, text: &str) -> Option<u32> {
    level_from_style(style_name).or_else(|| level_from_text(text))
}

pub fn level_from_style(style_name: &str) -> Option<u32> {
    let name = style_name.trim();
    if name.to_lowercase().starts_with("heading") {
        if let Some(level) = TRAILING_DIGITS
            .captures(name)
            .and_then(|c| c[1].parse::<u32>().ok())
            .filter(|&level| level > 0)
        {
            return Some(level);
        }
    }
    if name.contains(THAI_HEADING_STYLE) {
        let name = thai_digits_to_arabic(name);
        return FIRST_DIGITS
            .captures(&name)
            .and_then(|c| c[1].parse::<u32>().ok())
            .filter(|&level| level > 0);
    }
    None
}

pub fn level_from_text(text: &str) -> Option<u32> {
    let raw = thai_digits_to_arabic(text.trim());
    if raw.is_empty() {
        return None;
    }
    if CHAPTER_MARKER.is_match(&raw) {
        return Some(1);
    }
    if DOTTED_NUMBER.is_match(&raw) {
        let token = raw.split_whitespace().next()?;
        let parts = NUMBER_GROUP.find_iter(token).count() as u32;
        return Some(parts.max(1));
    }
    None
}

/// Maps Thai numerals `๐`..`๙` to ASCII digits, leaving everything else alone.
pub fn thai_digits_to_arabic(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\u{0E50}'..='\u{0E59}' => {
                char::from(b'0' + (ch as u32 - 0x0E50) as u8)
            }
            _ => ch,
        })
        .collect()
}
