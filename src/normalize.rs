//! Token normalization: lowercase, then strip accents.
//!
//! Accents are removed by NFD decomposition and dropping nonspacing marks
//! (general category `Mn`), so `"Zürich"` becomes `"zurich"` and `"São"`
//! becomes `"sao"`. Letters with no decomposition (`ø`, `ß`, `ł`) are kept
//! as-is, and so are spacing marks (`Mc`) such as Devanagari vowel signs.

use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

/// Lowercase `token` and strip nonspacing marks.
///
/// ```rust
/// use polyspan::normalize::normalize_token;
///
/// assert_eq!(normalize_token("Zürich"), "zurich");
/// assert_eq!(normalize_token("CAFÉ"), "cafe");
/// ```
#[must_use]
pub fn normalize_token(token: &str) -> String {
    token
        .to_lowercase()
        .nfd()
        .filter(|&c| !matches!(get_general_category(c), GeneralCategory::NonspacingMark))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents() {
        assert_eq!(normalize_token("São Paulo"), "sao paulo");
        assert_eq!(normalize_token("Ångström"), "angstrom");
    }

    #[test]
    fn undecomposable_letters_kept() {
        assert_eq!(normalize_token("Øresund"), "øresund");
        assert_eq!(normalize_token("Straße"), "straße");
    }

    #[test]
    fn spacing_marks_kept() {
        // virama (Mn) goes, the vowel signs (Mc) stay
        assert_eq!(normalize_token("हिन्दी"), "हिनदी");
        assert_eq!(normalize_token("हिन्दी").chars().count(), 5);
    }

    #[test]
    fn ascii_lowercased() {
        assert_eq!(normalize_token("NASA"), "nasa");
        assert_eq!(normalize_token(""), "");
    }

    #[test]
    fn emoji_untouched() {
        assert_eq!(normalize_token("🎉"), "🎉");
    }
}
