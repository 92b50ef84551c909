//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! normalization so names and filters are compared the same way everywhere.

use unicode_normalization::UnicodeNormalization;

/// Trim an optional text, turning blank values into `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Key used for case-insensitive comparisons and searches.
///
/// NFKC folds compatibility forms (full-width letters, ligatures) before
/// lowercasing.
pub(crate) fn normalize_key(value: &str) -> String {
    value.trim().nfkc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_text_drops_blanks() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" Bank ")),
            Some("Bank".to_string())
        );
    }

    #[test]
    fn key_folds_case_and_width() {
        assert_eq!(normalize_key("  Checking "), "checking");
        assert_eq!(normalize_key("ＣＡＳＨ"), "cash");
    }
}
