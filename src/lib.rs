//! # polyspan
//!
//! Entity-span resolution for multilingual text.
//!
//! - **Dictionaries**: literal term lists per entity type, case-sensitive or not
//! - **Overlap resolution**: longest span wins, output never overlaps
//! - **Recognition cascade**: external → local → language-routed → fallback labeler
//! - **Token alignment**: per-token entity, language and emoji annotations
//!
//! The crate does not tokenize, identify languages, or run models. Those are
//! collaborators supplied through [`SpanLabeler`], [`LanguageClassifier`] and
//! [`Tokenizer`].
//!
//! ## Quick Start
//!
//! ```rust
//! use polyspan::{resolve_overlaps, DictionaryRegistry};
//!
//! let mut registry = DictionaryRegistry::new();
//! registry.register_dictionary("LOCATION", ["New York", "York", "New York City"], true)?;
//!
//! let spans = resolve_overlaps(registry.match_text("I love New York City."));
//! assert_eq!(spans[0].text, "New York City");
//! # Ok::<(), polyspan::Error>(())
//! ```
//!
//! ## Full Pipeline
//!
//! ```rust
//! use polyspan::{MockClassifier, MockLabeler, Recognizer, WhitespaceTokenizer};
//! use std::sync::Arc;
//!
//! let recognizer = Recognizer::builder()
//!     .external(Arc::new(
//!         MockLabeler::new("ner").with_term("Paris", "LOCATION", Some(0.9)),
//!     ))
//!     .classifier(Arc::new(MockClassifier::new().with_default("en")))
//!     .tokenizer(Arc::new(WhitespaceTokenizer))
//!     .build()?;
//!
//! let tokens = recognizer.process("I love Paris");
//! assert_eq!(tokens[2].entity_label.as_deref(), Some("LOCATION"));
//! # Ok::<(), polyspan::Error>(())
//! ```
//!
//! ## Offsets
//!
//! Every `start`/`end` in this crate is a **character** offset (Unicode
//! scalar values), half-open. See [`offset`] for conversions.

#![warn(missing_docs)]

pub mod align;
pub mod backends;
pub mod config;
pub mod dictionary;
pub mod emoji;
mod error;
pub mod lang;
pub mod normalize;
pub mod offset;
pub mod recognizer;
pub mod resolve;
pub mod segment;
mod span;
pub mod sync;
pub mod types;

pub use align::TokenAligner;
pub use backends::cascade::{
    AttemptRecord, AttemptStatus, CascadeOutcome, RecognitionCascade, RecognitionCascadeBuilder,
    Strategy,
};
pub use backends::registry::LabelerRegistry;
pub use config::{DictionaryConfig, RecognizerConfig, RoutedLabelerConfig};
pub use dictionary::{DictionaryEntry, DictionaryRegistry};
pub use emoji::{EmojiCategory, UnicodeEmoji};
pub use error::{Error, Result};
pub use lang::{CachedClassifier, LanguageCache, LanguageRouter};
pub use recognizer::{Recognizer, RecognizerBuilder};
pub use resolve::resolve_overlaps;
pub use span::{AnnotatedToken, EntitySpan, LabeledSpan, SentenceSegment, SpanSource, Token};
pub use types::{AnnotatedTokenSliceExt, EntitySpanSliceExt};

use crate::sync::{lock, Mutex};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// Collaborators
// =============================================================================

/// Anything that maps text to candidate entity spans.
///
/// Offsets in the returned spans are char offsets into `text`. Spans that
/// fall outside `text` or have `start >= end` are discarded by the caller.
pub trait SpanLabeler: Send + Sync {
    /// Label spans in `text`.
    fn label(&self, text: &str) -> Result<Vec<LabeledSpan>>;

    /// Identifier used in logs and outcome traces.
    fn name(&self) -> &str;

    /// Whether the labeler is loaded and usable. Checked once when a
    /// cascade is built.
    fn is_available(&self) -> bool {
        true
    }
}

/// Maps text to a language code (e.g. `"en"`), or `None` when unsure.
///
/// Must be deterministic: answers are memoized by [`LanguageCache`].
pub trait LanguageClassifier: Send + Sync {
    /// Classify `text`.
    fn classify(&self, text: &str) -> Option<String>;
}

/// Splits text into ordered tokens. Must keep emoji as their own tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text`.
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Decides whether a token is an emoji.
pub trait EmojiDetector: Send + Sync {
    /// Whether `token` is an emoji.
    fn is_emoji(&self, token: &str) -> bool;
}

/// Splits on Unicode whitespace and records each token's char offset.
///
/// Enough for tests and examples; production callers bring their own
/// [`Tokenizer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut current_start = 0;

        for (idx, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    tokens.push(Token::at(std::mem::take(&mut current), current_start));
                }
            } else {
                if current.is_empty() {
                    current_start = idx;
                }
                current.push(c);
            }
        }
        if !current.is_empty() {
            tokens.push(Token::at(current, current_start));
        }

        tokens
    }
}

// =============================================================================
// Test doubles
// =============================================================================

/// A scripted [`SpanLabeler`] for tests.
///
/// Returns fixed spans plus every occurrence of its configured terms,
/// counts calls, and can be made to fail or report itself unavailable.
///
/// ```rust
/// use polyspan::{MockLabeler, SpanLabeler};
///
/// let mock = MockLabeler::new("mock").with_term("Paris", "LOCATION", Some(0.9));
/// let spans = mock.label("Paris, je t'aime. Paris!").unwrap();
/// assert_eq!(spans.len(), 2);
/// assert_eq!((spans[1].start, spans[1].end), (18, 23));
/// assert_eq!(mock.calls(), 1);
/// ```
#[derive(Debug)]
pub struct MockLabeler {
    name: String,
    spans: Vec<LabeledSpan>,
    terms: Vec<(String, String, Option<f64>)>,
    failure: Option<String>,
    available: bool,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl MockLabeler {
    /// A labeler that returns nothing.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spans: Vec::new(),
            terms: Vec::new(),
            failure: None,
            available: true,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Return these spans on every call, whatever the input.
    #[must_use]
    pub fn with_spans(mut self, spans: Vec<LabeledSpan>) -> Self {
        self.spans = spans;
        self
    }

    /// Report every occurrence of `term` in the input.
    #[must_use]
    pub fn with_term(
        mut self,
        term: impl Into<String>,
        label: impl Into<String>,
        score: Option<f64>,
    ) -> Self {
        self.terms.push((term.into(), label.into(), score));
        self
    }

    /// Fail every call with [`Error::Labeler`].
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Report `is_available() == false`.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Number of `label` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts passed to `label`, in call order.
    #[must_use]
    pub fn inputs(&self) -> Vec<String> {
        lock(&self.inputs).clone()
    }
}

impl SpanLabeler for MockLabeler {
    fn label(&self, text: &str) -> Result<Vec<LabeledSpan>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.inputs).push(text.to_string());

        if let Some(message) = &self.failure {
            return Err(Error::labeler(format!("{}: {}", self.name, message)));
        }

        let mut spans = self.spans.clone();
        for (term, label, score) in &self.terms {
            for (byte_idx, matched) in text.match_indices(term.as_str()) {
                let start = offset::char_len(&text[..byte_idx]);
                let end = start + offset::char_len(matched);
                spans.push(LabeledSpan {
                    text: matched.to_string(),
                    start,
                    end,
                    label: label.clone(),
                    score: *score,
                });
            }
        }
        Ok(spans)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// A lookup-table [`LanguageClassifier`] for tests.
///
/// ```rust
/// use polyspan::{LanguageClassifier, MockClassifier};
///
/// let mock = MockClassifier::new().with("Bonjour", "fr").with_default("en");
/// assert_eq!(mock.classify("Bonjour").as_deref(), Some("fr"));
/// assert_eq!(mock.classify("Hello").as_deref(), Some("en"));
/// assert_eq!(mock.calls(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockClassifier {
    table: HashMap<String, String>,
    default: Option<String>,
    calls: AtomicUsize,
}

impl MockClassifier {
    /// A classifier that answers `None` for everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `language` for exactly `text`.
    #[must_use]
    pub fn with(mut self, text: impl Into<String>, language: impl Into<String>) -> Self {
        self.table.insert(text.into(), language.into());
        self
    }

    /// Answer `language` for anything not in the table.
    #[must_use]
    pub fn with_default(mut self, language: impl Into<String>) -> Self {
        self.default = Some(language.into());
        self
    }

    /// Number of `classify` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LanguageClassifier for MockClassifier {
    fn classify(&self, text: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .get(text)
            .cloned()
            .or_else(|| self.default.clone())
    }
}

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use polyspan::prelude::*;
    //!
    //! let mut registry = DictionaryRegistry::new();
    //! registry.register_dictionary("ORG", ["Acme"], false).unwrap();
    //! let spans = resolve_overlaps(registry.match_text("ACME and acme"));
    //! assert_eq!(spans.len(), 2);
    //! ```
    pub use crate::error::{Error, Result};
    pub use crate::span::{
        AnnotatedToken, EntitySpan, LabeledSpan, SentenceSegment, SpanSource, Token,
    };
    pub use crate::types::{AnnotatedTokenSliceExt, EntitySpanSliceExt};
    pub use crate::{
        resolve_overlaps, DictionaryRegistry, EmojiDetector, LanguageClassifier, MockClassifier,
        MockLabeler, RecognitionCascade, Recognizer, RecognizerConfig, SpanLabeler, Tokenizer,
        WhitespaceTokenizer,
    };
}
