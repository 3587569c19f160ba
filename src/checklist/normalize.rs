use regex::Regex;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("static regex"));

/// Canonical form of a site address, used as the prefix of every file name.
///
/// Uppercases, turns punctuation into spaces, collapses whitespace and trims.
/// Only ASCII letters, digits and underscores survive as word characters.
pub fn normalize_address(raw: &str) -> String {
    let upper = raw.to_uppercase();
    let spaced = NON_WORD.replace_all(&upper, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive containment check of an upper-case trigger phrase.
///
/// Page text is only case-folded here, punctuation is left alone.
pub fn matches_phrase(text: &str, phrase: &str) -> bool {
    text.to_uppercase().contains(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_trailing_punctuation() {
        assert_eq!(normalize_address("123 Main St.!!"), "123 MAIN ST");
    }

    #[test]
    fn test_punctuation_becomes_single_space() {
        assert_eq!(normalize_address("Flat 2/14, Oak-Lane"), "FLAT 2 14 OAK LANE");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(normalize_address("  10\t Elm \n Rd  "), "10 ELM RD");
    }

    #[test]
    fn test_underscore_kept() {
        assert_eq!(normalize_address("unit_4 block"), "UNIT_4 BLOCK");
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(normalize_address(""), "");
        assert_eq!(normalize_address(" .,;!? "), "");
    }

    #[test]
    fn test_phrase_match_ignores_case() {
        assert!(matches_phrase("note: bmd works required here", "BMD WORKS REQUIRED"));
        assert!(matches_phrase("Recharge Work Needed", "RECHARGE WORK"));
    }

    #[test]
    fn test_phrase_match_keeps_punctuation() {
        assert!(!matches_phrase("BMD-WORKS REQUIRED", "BMD WORKS REQUIRED"));
        assert!(!matches_phrase("RECHARGE  WORK", "RECHARGE WORK"));
    }
}
