use quick_xml::events::BytesStart;

pub(crate) fn xml_escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Value of the attribute whose local name is `name`, ignoring the prefix
/// (`w:val` and `val` both match `b"val"`).
pub(crate) fn attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// OOXML on/off property: a missing `w:val` means on.
pub(crate) fn toggle(e: &BytesStart) -> bool {
    match attr(e, b"val") {
        None => true,
        Some(v) => !matches!(v.as_str(), "0" | "false" | "off" | "none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(xml_escape_text("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(xml_escape_text("บทที่ ๑"), "บทที่ ๑");
    }

    #[test]
    fn reads_prefixed_attributes_and_toggles() {
        let on = BytesStart::from_content(r#"w:b"#, 3);
        let off = BytesStart::from_content(r#"w:b w:val="0""#, 3);
        let styled = BytesStart::from_content(r#"w:pStyle w:val="Heading1""#, 8);
        assert!(toggle(&on));
        assert!(!toggle(&off));
        assert_eq!(attr(&styled, b"val").as_deref(), Some("Heading1"));
        assert_eq!(attr(&styled, b"missing"), None);
    }
}
