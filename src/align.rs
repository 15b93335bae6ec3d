//! Token alignment: project resolved spans onto tokens.
//!
//! A token inherits a span's label only when it lies entirely inside it
//! (containment). Token positions are recovered from the text:
//!
//! 1. the tokenizer's offset hint, if the text really has the token there;
//! 2. otherwise the next occurrence after the previous token's match;
//! 3. otherwise the first occurrence anywhere;
//! 4. otherwise the position is unknown and the token gets no entity.
//!
//! Step 2 is what keeps repeated tokens apart:
//!
//! ```text
//! "Paris is not Paris, Texas"
//!                ├───┤          span: LOCATION (13..18)
//!  tokens: Paris  is  not  Paris  ,  Texas
//!          0..5               13..18  ← found after "not", inherits LOCATION
//! ```

use crate::emoji::UnicodeEmoji;
use crate::lang::CachedClassifier;
use crate::normalize::normalize_token;
use crate::offset::SpanConverter;
use crate::{AnnotatedToken, EmojiDetector, EntitySpan, Token};
use std::sync::Arc;

/// Aligns tokens with spans and annotates them.
#[derive(Clone)]
pub struct TokenAligner {
    classifier: Option<CachedClassifier>,
    emoji: Arc<dyn EmojiDetector>,
    normalize: bool,
}

impl std::fmt::Debug for TokenAligner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAligner")
            .field("classifier", &self.classifier)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl Default for TokenAligner {
    fn default() -> Self {
        Self {
            classifier: None,
            emoji: Arc::new(UnicodeEmoji),
            normalize: true,
        }
    }
}

impl TokenAligner {
    /// Aligner with Unicode emoji detection, normalization on, and no
    /// language detection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect per-token language with `classifier`.
    #[must_use]
    pub fn with_classifier(mut self, classifier: CachedClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Use a different emoji detector.
    #[must_use]
    pub fn with_emoji_detector(mut self, emoji: Arc<dyn EmojiDetector>) -> Self {
        self.emoji = emoji;
        self
    }

    /// Turn `normalized_token` generation on or off.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Annotate every token, in order. Empty `text` yields no annotations
    /// and no classifier calls.
    ///
    /// ```rust
    /// use polyspan::{EntitySpan, SpanSource, Token, TokenAligner};
    ///
    /// let text = "I love New York";
    /// let spans = vec![EntitySpan::from_original(text, 7, 15, "LOC", SpanSource::Dictionary).unwrap()];
    /// let tokens: Vec<Token> = ["I", "love", "New", "York"].into_iter().map(Token::from).collect();
    ///
    /// let annotated = TokenAligner::new().align(text, &tokens, &spans);
    /// assert_eq!(annotated[1].entity_label, None);
    /// assert_eq!(annotated[2].entity_label.as_deref(), Some("LOC"));
    /// assert_eq!(annotated[3].entity_text.as_deref(), Some("New York"));
    /// ```
    #[must_use]
    pub fn align(&self, text: &str, tokens: &[Token], spans: &[EntitySpan]) -> Vec<AnnotatedToken> {
        if text.is_empty() {
            return Vec::new();
        }

        let converter = SpanConverter::new(text);
        let mut cursor = 0;

        tokens
            .iter()
            .map(|token| {
                let is_emoji = self.emoji.is_emoji(&token.text);
                let position = locate(text, &converter, token, &mut cursor);

                let containing = if is_emoji {
                    None
                } else {
                    position.and_then(|(start, end)| {
                        spans.iter().find(|s| s.contains_range(start, end))
                    })
                };

                let language = if is_emoji {
                    None
                } else {
                    self.classifier
                        .as_ref()
                        .and_then(|c| c.detect(&token.text))
                };

                let normalized_token = if self.normalize && !is_emoji {
                    normalize_token(&token.text)
                } else {
                    token.text.clone()
                };

                AnnotatedToken {
                    token: token.text.clone(),
                    language,
                    is_emoji,
                    normalized_token,
                    entity_label: containing.map(|s| s.label.clone()),
                    entity_score: containing.and_then(|s| s.score),
                    entity_text: containing.map(|s| s.text.clone()),
                }
            })
            .collect()
    }
}

/// Char range of `token` in `text`; advances `cursor` (a char offset) past
/// each match.
fn locate(
    text: &str,
    converter: &SpanConverter,
    token: &Token,
    cursor: &mut usize,
) -> Option<(usize, usize)> {
    if token.text.is_empty() {
        return None;
    }
    let len = token.text.chars().count();

    let hinted = token
        .offset_hint
        .filter(|&h| h.checked_add(len).is_some_and(|end| end <= converter.char_len()))
        .filter(|&h| converter.slice(text, h, h + len) == token.text);

    let start = hinted
        .or_else(|| {
            let from = converter.char_to_byte(*cursor);
            text[from..]
                .find(&token.text)
                .map(|rel| converter.byte_to_char(from + rel))
        })
        .or_else(|| text.find(&token.text).map(|b| converter.byte_to_char(b)))?;

    *cursor = start + len;
    Some((start, start + len))
}
