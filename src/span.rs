//! Span types: candidate and resolved entity spans, segments, tokens.

use crate::offset::SpanConverter;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which producer a span came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanSource {
    /// Literal dictionary match.
    Dictionary,
    /// High-capacity external labeler (cascade step 1).
    ExternalLabeler,
    /// Explicitly configured local labeler (cascade step 2).
    Local,
    /// Per-segment labeler chosen by detected language (cascade step 3).
    LanguageRouted,
    /// Last-resort default labeler (cascade step 4).
    Fallback,
}

impl SpanSource {
    /// Stable lowercase name, matching the serde representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanSource::Dictionary => "dictionary",
            SpanSource::ExternalLabeler => "external-labeler",
            SpanSource::Local => "local",
            SpanSource::LanguageRouted => "language-routed",
            SpanSource::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for SpanSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled `[start, end)` character range of some source text.
///
/// Invariant: `start < end`. Enforced by [`EntitySpan::new`]; fields are
/// public for reading and pattern matching, like the rest of the data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Surface form, equal to `original[start..end]` in char offsets.
    pub text: String,
    /// Start (char offset, inclusive).
    pub start: usize,
    /// End (char offset, exclusive).
    pub end: usize,
    /// Entity label, e.g. `"LOCATION"`.
    pub label: String,
    /// Confidence in `[0, 1]`, when the producer reports one.
    pub score: Option<f64>,
    /// Language code of the text the span was found in.
    pub language: Option<String>,
    /// Producer.
    pub source: SpanSource,
}

impl EntitySpan {
    /// Create a span, rejecting `start >= end`.
    ///
    /// ```rust
    /// use polyspan::{EntitySpan, SpanSource};
    ///
    /// let span = EntitySpan::new("New York", 7, 15, "LOCATION", SpanSource::Dictionary).unwrap();
    /// assert_eq!(span.len(), 8);
    /// assert!(EntitySpan::new("", 3, 3, "LOCATION", SpanSource::Dictionary).is_err());
    /// ```
    pub fn new(
        text: impl Into<String>,
        start: usize,
        end: usize,
        label: impl Into<String>,
        source: SpanSource,
    ) -> Result<Self> {
        if start >= end {
            return Err(Error::invalid_span(format!(
                "start ({start}) must be less than end ({end})"
            )));
        }
        Ok(Self {
            text: text.into(),
            start,
            end,
            label: label.into(),
            score: None,
            language: None,
            source,
        })
    }

    /// Create a span whose text is sliced from `original` by char offsets.
    ///
    /// Also rejects spans reaching past the end of `original`.
    pub fn from_original(
        original: &str,
        start: usize,
        end: usize,
        label: impl Into<String>,
        source: SpanSource,
    ) -> Result<Self> {
        Self::from_converter(original, &SpanConverter::new(original), start, end, label, source)
    }

    pub(crate) fn from_converter(
        original: &str,
        converter: &SpanConverter,
        start: usize,
        end: usize,
        label: impl Into<String>,
        source: SpanSource,
    ) -> Result<Self> {
        if end > converter.char_len() {
            return Err(Error::invalid_span(format!(
                "end ({end}) exceeds text length ({})",
                converter.char_len()
            )));
        }
        let text = converter.slice(original, start, end);
        Self::new(text, start, end, label, source)
    }

    /// Attach a confidence score, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score.clamp(0.0, 1.0));
        self
    }

    /// Attach an optional confidence score, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_optional_score(mut self, score: Option<f64>) -> Self {
        self.score = score.map(|s| s.clamp(0.0, 1.0));
        self
    }

    /// Attach a language code.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false for a validly constructed span.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open interval intersection.
    #[must_use]
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether `[start, end)` lies entirely inside this span.
    #[must_use]
    pub fn contains_range(&self, start: usize, end: usize) -> bool {
        start >= self.start && end <= self.end
    }

    /// Shift both offsets right by `offset` characters.
    #[must_use]
    pub fn shifted(mut self, offset: usize) -> Self {
        self.start += offset;
        self.end += offset;
        self
    }
}

/// Raw output of a [`crate::SpanLabeler`], before validation.
///
/// Offsets are char offsets into the text the labeler was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSpan {
    /// Surface form as reported by the labeler.
    pub text: String,
    /// Start (char offset, inclusive).
    pub start: usize,
    /// End (char offset, exclusive).
    pub end: usize,
    /// Entity label.
    pub label: String,
    /// Confidence, if the labeler provides one.
    pub score: Option<f64>,
}

impl LabeledSpan {
    /// Create a labeled span without a score.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            label: label.into(),
            score: None,
        }
    }

    /// Attach a score.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// A sentence-like piece of text with its language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSegment {
    /// Segment text, equal to `original[start..end]`.
    pub text: String,
    /// Start (char offset).
    pub start: usize,
    /// End (char offset, exclusive).
    pub end: usize,
    /// Detected language, `None` for short or unclassifiable segments.
    pub language: Option<String>,
}

/// A token produced by an external tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Token text.
    pub text: String,
    /// Char offset where the tokenizer believes the token starts.
    pub offset_hint: Option<usize>,
}

impl Token {
    /// Token with no offset hint.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset_hint: None,
        }
    }

    /// Token with an offset hint.
    #[must_use]
    pub fn at(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset_hint: Some(offset),
        }
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::new(text)
    }
}

/// Per-token annotation produced by alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    /// Token text.
    pub token: String,
    /// Detected language (never set for emoji).
    pub language: Option<String>,
    /// Whether the token is an emoji.
    pub is_emoji: bool,
    /// Lowercased, accent-stripped form (or the token itself).
    pub normalized_token: String,
    /// Label of the containing span.
    pub entity_label: Option<String>,
    /// Score of the containing span.
    pub entity_score: Option<f64>,
    /// Text of the containing span.
    pub entity_text: Option<String>,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            s1 in 0usize..100,
            len1 in 1usize..50,
            s2 in 0usize..100,
            len2 in 1usize..50,
        ) {
            let a = EntitySpan::new("a", s1, s1 + len1, "A", SpanSource::Dictionary).unwrap();
            let b = EntitySpan::new("b", s2, s2 + len2, "B", SpanSource::Dictionary).unwrap();
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn score_always_clamped(score in -10.0f64..10.0) {
            let s = EntitySpan::new("a", 0, 1, "A", SpanSource::Fallback).unwrap().with_score(score);
            let v = s.score.unwrap();
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }
}
