//! Emoji detection.
//!
//! [`UnicodeEmoji`] classifies by code point range. A token is an emoji when
//! it has at least one pictographic code point and every other code point is
//! an emoji component (ZWJ, variation selector, skin tone, keycap, tag).
//! That covers ZWJ sequences like 👨‍👩‍👧 and flags like 🇫🇷 without a name
//! table.
//!
//! Names and coarse categories come from the `emojis` registry:
//!
//! ```rust
//! use polyspan::emoji::{categorize, describe, EmojiCategory};
//!
//! assert_eq!(describe("😀"), Some("grinning face"));
//! assert_eq!(categorize("🇫🇷"), Some(EmojiCategory::Flag));
//! assert_eq!(categorize("Paris"), None);
//! ```

use crate::EmojiDetector;
use emojis::Group;
use serde::{Deserialize, Serialize};

/// Code-point range emoji detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeEmoji;

impl EmojiDetector for UnicodeEmoji {
    fn is_emoji(&self, token: &str) -> bool {
        let mut pictographic = false;
        for c in token.chars() {
            if is_pictographic(c) {
                pictographic = true;
            } else if !is_component(c) {
                return false;
            }
        }
        pictographic
    }
}

/// Every pictographic character in `text`, in order.
///
/// ```rust
/// use polyspan::emoji::extract_emojis;
///
/// assert_eq!(extract_emojis("I ❤ Paris 🗼!"), vec!['❤', '🗼']);
/// ```
#[must_use]
pub fn extract_emojis(text: &str) -> Vec<char> {
    text.chars().filter(|&c| is_pictographic(c)).collect()
}

/// Coarse emoji category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmojiCategory {
    /// Faces and expressions.
    Face,
    /// Hands, fingers, arms.
    Hand,
    /// Hearts.
    Heart,
    /// Flags.
    Flag,
    /// Animals.
    Animal,
    /// Food and drink.
    Food,
    /// Anything else.
    Other,
}

impl EmojiCategory {
    /// Stable lowercase name, matching the serde representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EmojiCategory::Face => "face",
            EmojiCategory::Hand => "hand",
            EmojiCategory::Heart => "heart",
            EmojiCategory::Flag => "flag",
            EmojiCategory::Animal => "animal",
            EmojiCategory::Food => "food",
            EmojiCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for EmojiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// checked in order; the first keyword found in the name wins
const KEYWORDS: &[(EmojiCategory, &[&str])] = &[
    (EmojiCategory::Face, &["face", "smile", "laugh", "wink"]),
    (EmojiCategory::Hand, &["hand", "finger", "arm"]),
    (EmojiCategory::Heart, &["heart", "love"]),
    (EmojiCategory::Flag, &["flag"]),
    (EmojiCategory::Animal, &["animal", "cat", "dog", "bird"]),
    (EmojiCategory::Food, &["food", "fruit", "drink"]),
];

/// CLDR short name of `token`, e.g. `"red heart"` for ❤️. `None` if the
/// registry does not know it.
#[must_use]
pub fn describe(token: &str) -> Option<&'static str> {
    emojis::get(token).map(|e| e.name())
}

/// Category of `token`, or `None` if the registry does not know it.
///
/// The name is matched against keywords first; otherwise the registry group
/// decides flags and food, and everything else is [`EmojiCategory::Other`].
#[must_use]
pub fn categorize(token: &str) -> Option<EmojiCategory> {
    let emoji = emojis::get(token)?;
    let name = emoji.name().to_lowercase();

    let by_keyword = KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| name.contains(w)))
        .map(|(category, _)| *category);

    Some(by_keyword.unwrap_or(match emoji.group() {
        Group::Flags => EmojiCategory::Flag,
        Group::FoodAndDrink => EmojiCategory::Food,
        _ => EmojiCategory::Other,
    }))
}

fn is_pictographic(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF   // mahjong .. pictographs ext-A, incl. regional indicators
            | 0x2600..=0x27BF   // misc symbols, dingbats
            | 0x2B00..=0x2BFF   // arrows, stars
            | 0x2300..=0x23FF   // misc technical (⌚, ⏰)
            | 0x00A9
            | 0x00AE
            | 0x203C
            | 0x2049
            | 0x2122
            | 0x2139
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
    )
}

fn is_component(c: char) -> bool {
    matches!(
        c as u32,
        0x200D                  // zero width joiner
            | 0xFE0E..=0xFE0F   // variation selectors
            | 0x1F3FB..=0x1F3FF // skin tones
            | 0x20E3            // combining keycap
            | 0xE0020..=0xE007F // tags
    ) || c.is_ascii_digit()
        || c == '#'
        || c == '*'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_emoji() {
        let d = UnicodeEmoji;
        assert!(d.is_emoji("😀"));
        assert!(d.is_emoji("❤️"));
        assert!(d.is_emoji("🗼"));
    }

    #[test]
    fn sequences() {
        let d = UnicodeEmoji;
        assert!(d.is_emoji("👨‍👩‍👧"));
        assert!(d.is_emoji("👍🏽"));
        assert!(d.is_emoji("🇫🇷"));
    }

    #[test]
    fn not_emoji() {
        let d = UnicodeEmoji;
        assert!(!d.is_emoji(""));
        assert!(!d.is_emoji("Paris"));
        assert!(!d.is_emoji("1"));
        assert!(!d.is_emoji("hi😀"));
        assert!(!d.is_emoji("é"));
    }

    #[test]
    fn descriptions() {
        assert_eq!(describe("❤️"), Some("red heart"));
        assert_eq!(describe("👋"), Some("waving hand"));
        assert_eq!(describe("hello"), None);
        assert_eq!(describe(""), None);
    }

    #[test]
    fn categories() {
        assert_eq!(categorize("😂"), Some(EmojiCategory::Face));
        assert_eq!(categorize("👋"), Some(EmojiCategory::Hand));
        assert_eq!(categorize("❤️"), Some(EmojiCategory::Heart));
        assert_eq!(categorize("🇯🇵"), Some(EmojiCategory::Flag));
        assert_eq!(categorize("🐕"), Some(EmojiCategory::Animal));
        assert_eq!(categorize("🍕"), Some(EmojiCategory::Food));
        assert_eq!(categorize("🚀"), Some(EmojiCategory::Other));
        assert_eq!(categorize("Paris"), None);
    }

    #[test]
    fn extract() {
        assert!(extract_emojis("no emoji here").is_empty());
        assert_eq!(extract_emojis("😀 and 🎉"), vec!['😀', '🎉']);
    }
}
