use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Unicode `\d` also covers Thai numerals, so "๑.๒ " is a prefix too.
    static ref NUMBER_PREFIX: Regex = Regex::new(r"\b\d+(?:[.\-]\d+)*\.?\s*").unwrap();
    static ref THAI_DIGIT: Regex = Regex::new(r"[\u{0E50}-\u{0E59}]").unwrap();
    static ref PUNCTUATION: Regex = Regex::new(r"[\-–—•·()\[\]{}:;,.]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Canonical form of a heading title used as the matching key.
///
/// Section numbers are removed wherever they start a word, not only at the
/// front, so that a number exposed by punctuation removal ("(1) Scope") is
/// already gone and normalizing twice gives the same string.
pub fn normalize_title(text: &str) -> String {
    let text = text.trim().to_lowercase();
    let text = NUMBER_PREFIX.replace_all(&text, "");
    let text = THAI_DIGIT.replace_all(&text, "");
    let text = PUNCTUATION.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numbering_case_and_punctuation() {
        assert_eq!(normalize_title("1.1 Background"), "background");
        assert_eq!(normalize_title("  1. INTRODUCTION "), "introduction");
        assert_eq!(normalize_title("2.3.1 Scope: Limits (Part A)"), "scope limits part a");
        assert_eq!(normalize_title("1-2 Data – Collection"), "data collection");
        assert_eq!(normalize_title("Objectives;  goals,\tand\nmethods."), "objectives goals and methods");
    }

    #[test]
    fn handles_thai_titles() {
        assert_eq!(normalize_title("๑.๑ ความเป็นมา"), "ความเป็นมา");
        assert_eq!(normalize_title("1.2 วัตถุประสงค์ของโครงงาน"), "วัตถุประสงค์ของโครงงาน");
        assert_eq!(normalize_title("บทที่ ๑ บทนำ"), "บทที่ บทนำ");
        assert_eq!(normalize_title("บทที่ 1 บทนำ"), normalize_title("บทที่ ๑ บทนำ"));
    }

    #[test]
    fn empty_and_number_only_titles_normalize_to_empty() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("   "), "");
        assert_eq!(normalize_title("1.2.3"), "");
        assert_eq!(normalize_title("( - )"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let titles = [
            "1.1 Background",
            "(1) Scope of the Study",
            "Chapter 2: Literature Review",
            "๑.๒ ขอบเขตของโครงงาน",
            "A.1 Appendix",
            "x.5 value",
            "ab1 2cd",
            "2019–2020 Results • Summary",
            "ÉTUDE [Draft] {v2}",
            "ก๑1 mixed",
        ];
        for title in titles {
            let once = normalize_title(title);
            assert_eq!(normalize_title(&once), once, "not idempotent for {title:?}");
        }
    }
}
