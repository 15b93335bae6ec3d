//! Recognition cascade: ordered labeler strategies, first non-empty wins.
//!
//! # Priority
//!
//! | Step | Strategy | Input | Filter | Source |
//! |------|----------|-------|--------|--------|
//! | 1 | External | full text | `score > threshold`, not punctuation | `ExternalLabeler` |
//! | 2 | Local | full text | not punctuation | `Local` |
//! | 3 | LanguageRouted | each sentence | not punctuation | `LanguageRouted` |
//! | 4 | Fallback | full text | not punctuation | `Fallback` |
//!
//! A strategy that errors is logged and treated as empty, so the next one
//! runs. A [`crate::Error::CollaboratorUnavailable`] error is traced as
//! [`AttemptStatus::Unavailable`], any other error as
//! [`AttemptStatus::Failed`]. Only configured strategies take part, and
//! labelers that report themselves unavailable are left out when the
//! cascade is built.
//!
//! # Example
//!
//! ```rust
//! use polyspan::{MockLabeler, RecognitionCascade, SpanSource};
//! use std::sync::Arc;
//!
//! let external = Arc::new(MockLabeler::new("ner").with_term("Paris", "LOC", Some(0.4)));
//! let fallback = Arc::new(MockLabeler::new("default").with_term("Paris", "GPE", None));
//!
//! let cascade = RecognitionCascade::builder()
//!     .external(external.clone())
//!     .fallback(fallback.clone())
//!     .build();
//!
//! // 0.4 is below the threshold, so the fallback answers
//! let outcome = cascade.recognize("I love Paris", 0.5);
//! assert_eq!(outcome.source, Some(SpanSource::Fallback));
//! assert_eq!(outcome.spans[0].label, "GPE");
//! assert_eq!((external.calls(), fallback.calls()), (1, 1));
//! ```

use crate::lang::{CachedClassifier, LanguageRouter};
use crate::offset::SpanConverter;
use crate::segment::{segment, segment_with_languages};
use crate::{EntitySpan, LabeledSpan, Result, SpanLabeler, SpanSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default confidence threshold for the external labeler.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// One step of the cascade.
#[derive(Clone)]
#[non_exhaustive]
pub enum Strategy {
    /// High-capacity labeler on the full text, confidence-filtered.
    External(Arc<dyn SpanLabeler>),
    /// Explicitly configured local labeler on the full text.
    Local(Arc<dyn SpanLabeler>),
    /// Per-sentence labeler chosen by detected language.
    LanguageRouted {
        /// Language → labeler table.
        router: LanguageRouter,
        /// Sentence language detection; without one every sentence routes
        /// to the default language.
        classifier: Option<CachedClassifier>,
    },
    /// Last-resort labeler on the full text.
    Fallback(Arc<dyn SpanLabeler>),
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

impl Strategy {
    /// Source tag given to spans from this strategy.
    #[must_use]
    pub fn source(&self) -> SpanSource {
        match self {
            Strategy::External(_) => SpanSource::ExternalLabeler,
            Strategy::Local(_) => SpanSource::Local,
            Strategy::LanguageRouted { .. } => SpanSource::LanguageRouted,
            Strategy::Fallback(_) => SpanSource::Fallback,
        }
    }

    /// Display name, e.g. `external-labeler(gliner)` or `language-routed(en+fr)`.
    #[must_use]
    pub fn name(&self) -> String {
        let inner = match self {
            Strategy::External(l) | Strategy::Local(l) | Strategy::Fallback(l) => {
                l.name().to_string()
            }
            Strategy::LanguageRouted { router, .. } => {
                router.languages().collect::<Vec<_>>().join("+")
            }
        };
        format!("{}({})", self.source(), inner)
    }

    /// Run this strategy on `text`.
    ///
    /// `threshold` only applies to [`Strategy::External`]; spans there need
    /// a score strictly above it.
    ///
    /// # Errors
    ///
    /// Whatever the underlying labeler returns.
    pub fn attempt(&self, text: &str, threshold: f64) -> Result<Vec<EntitySpan>> {
        let source = self.source();
        match self {
            Strategy::External(labeler) => {
                let raw = labeler.label(text)?;
                Ok(validate(text, raw, source)
                    .into_iter()
                    .filter(|s| s.score.is_some_and(|score| score > threshold))
                    .filter(|s| !is_punctuation_only(&s.text))
                    .collect())
            }
            Strategy::Local(labeler) | Strategy::Fallback(labeler) => {
                let raw = labeler.label(text)?;
                Ok(validate(text, raw, source)
                    .into_iter()
                    .filter(|s| !is_punctuation_only(&s.text))
                    .collect())
            }
            Strategy::LanguageRouted { router, classifier } => {
                let segments = match classifier {
                    Some(c) => segment_with_languages(text, c),
                    None => segment(text),
                };

                let mut spans = Vec::new();
                for seg in segments {
                    let Some((key, labeler)) = router.select(seg.language.as_deref()) else {
                        continue;
                    };
                    let language = seg.language.clone().unwrap_or_else(|| key.to_string());
                    log::trace!(
                        "[cascade] segment {}..{} ({}) -> {}",
                        seg.start,
                        seg.end,
                        language,
                        labeler.name()
                    );

                    let raw = labeler.label(&seg.text)?;
                    spans.extend(
                        validate(&seg.text, raw, source)
                            .into_iter()
                            .filter(|s| !is_punctuation_only(&s.text))
                            .map(|s| s.shifted(seg.start).with_language(language.clone())),
                    );
                }
                spans.sort_by_key(|s| s.start);
                Ok(spans)
            }
        }
    }
}

/// Turn raw labeler output into checked spans over `text`.
///
/// Spans with `start >= end` or reaching past the text are dropped. Text is
/// re-sliced from `text`, so a labeler's own surface form is not trusted.
fn validate(text: &str, raw: Vec<LabeledSpan>, source: SpanSource) -> Vec<EntitySpan> {
    let converter = SpanConverter::new(text);
    raw.into_iter()
        .filter_map(|l| {
            match EntitySpan::from_converter(text, &converter, l.start, l.end, l.label, source) {
                Ok(span) => Some(span.with_optional_score(l.score)),
                Err(e) => {
                    log::debug!("[cascade] discarding malformed {} span: {}", source, e);
                    None
                }
            }
        })
        .collect()
}

/// Whether `text`, trimmed, has nothing but punctuation (or nothing at all).
fn is_punctuation_only(text: &str) -> bool {
    text.trim().chars().all(is_punctuation)
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{00A1}'
                | '\u{00A7}'
                | '\u{00AB}'
                | '\u{00B6}'
                | '\u{00B7}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{3001}'..='\u{3003}'
                | '\u{3008}'..='\u{3011}'
                | '\u{FF01}'..='\u{FF0F}'
        )
}

/// What happened to one strategy during a [`RecognitionCascade::recognize`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum AttemptStatus {
    /// Returned this many spans after filtering; the cascade stopped here.
    Answered {
        /// Span count.
        spans: usize,
    },
    /// Ran but produced nothing after filtering.
    Empty,
    /// Errored; treated as empty.
    Failed {
        /// Error message.
        error: String,
    },
    /// Could not be invoked at call time; treated as empty.
    Unavailable {
        /// Error message.
        error: String,
    },
}

/// One entry of a cascade trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Strategy display name.
    pub strategy: String,
    /// Source tag of the strategy.
    pub source: SpanSource,
    /// Result.
    pub status: AttemptStatus,
}

/// Result of a cascade run, with its trace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CascadeOutcome {
    /// Spans from the first strategy that produced any.
    pub spans: Vec<EntitySpan>,
    /// Which strategy answered, `None` if all came back empty.
    pub source: Option<SpanSource>,
    /// Every strategy that ran, in order.
    pub attempts: Vec<AttemptRecord>,
}

/// Ordered strategies; see the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct RecognitionCascade {
    strategies: Vec<Strategy>,
}

impl RecognitionCascade {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> RecognitionCascadeBuilder {
        RecognitionCascadeBuilder::default()
    }

    /// The strategies, in the order they run.
    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Strategy display names, in the order they run.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies.iter().map(Strategy::name).collect()
    }

    /// Whether no strategy is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run strategies in order until one returns spans.
    ///
    /// Blank text returns immediately without calling any labeler.
    #[must_use]
    pub fn recognize(&self, text: &str, threshold: f64) -> CascadeOutcome {
        let mut outcome = CascadeOutcome::default();
        if text.trim().is_empty() {
            return outcome;
        }

        for strategy in &self.strategies {
            let name = strategy.name();
            let status = match strategy.attempt(text, threshold) {
                Ok(spans) if !spans.is_empty() => {
                    log::debug!("[cascade] {} answered with {} spans", name, spans.len());
                    outcome.attempts.push(AttemptRecord {
                        strategy: name,
                        source: strategy.source(),
                        status: AttemptStatus::Answered { spans: spans.len() },
                    });
                    outcome.spans = spans;
                    outcome.source = Some(strategy.source());
                    return outcome;
                }
                Ok(_) => {
                    log::debug!("[cascade] {} found nothing, trying next", name);
                    AttemptStatus::Empty
                }
                Err(e) if e.is_unavailable() => {
                    log::warn!("[cascade] {} unavailable, trying next: {}", name, e);
                    AttemptStatus::Unavailable {
                        error: e.to_string(),
                    }
                }
                Err(e) => {
                    log::warn!("[cascade] {} failed, trying next: {}", name, e);
                    AttemptStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            outcome.attempts.push(AttemptRecord {
                strategy: name,
                source: strategy.source(),
                status,
            });
        }

        log::debug!("[cascade] no strategy produced spans");
        outcome
    }

    /// [`RecognitionCascade::recognize`] without the trace.
    #[must_use]
    pub fn recognize_multilingual(&self, text: &str, threshold: f64) -> Vec<EntitySpan> {
        self.recognize(text, threshold).spans
    }
}

/// Builder for [`RecognitionCascade`].
///
/// Strategies always run in the fixed order External → Local →
/// LanguageRouted → Fallback, whatever order the setters are called in.
#[derive(Default)]
pub struct RecognitionCascadeBuilder {
    external: Option<Arc<dyn SpanLabeler>>,
    local: Option<Arc<dyn SpanLabeler>>,
    router: Option<LanguageRouter>,
    classifier: Option<CachedClassifier>,
    fallback: Option<Arc<dyn SpanLabeler>>,
}

impl RecognitionCascadeBuilder {
    /// Set the external labeler (step 1).
    #[must_use]
    pub fn external(mut self, labeler: Arc<dyn SpanLabeler>) -> Self {
        self.external = Some(labeler);
        self
    }

    /// Set the local labeler (step 2).
    #[must_use]
    pub fn local(mut self, labeler: Arc<dyn SpanLabeler>) -> Self {
        self.local = Some(labeler);
        self
    }

    /// Set the per-language labelers (step 3).
    #[must_use]
    pub fn router(mut self, router: LanguageRouter) -> Self {
        self.router = Some(router);
        self
    }

    /// Set the sentence language classifier used by step 3.
    #[must_use]
    pub fn classifier(mut self, classifier: CachedClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the fallback labeler (step 4).
    #[must_use]
    pub fn fallback(mut self, labeler: Arc<dyn SpanLabeler>) -> Self {
        self.fallback = Some(labeler);
        self
    }

    /// Build the cascade, leaving out unavailable labelers.
    #[must_use]
    pub fn build(self) -> RecognitionCascade {
        let mut strategies = Vec::new();

        if let Some(labeler) = available(self.external, "external") {
            strategies.push(Strategy::External(labeler));
        }
        if let Some(labeler) = available(self.local, "local") {
            strategies.push(Strategy::Local(labeler));
        }
        if let Some(mut router) = self.router {
            router.retain_available();
            if router.is_empty() {
                log::warn!("[cascade] no available language-routed labelers, skipping step");
            } else {
                strategies.push(Strategy::LanguageRouted {
                    router,
                    classifier: self.classifier,
                });
            }
        }
        if let Some(labeler) = available(self.fallback, "fallback") {
            strategies.push(Strategy::Fallback(labeler));
        }

        let cascade = RecognitionCascade { strategies };
        log::info!("[cascade] strategies: [{}]", cascade.strategy_names().join(", "));
        cascade
    }
}

fn available(labeler: Option<Arc<dyn SpanLabeler>>, step: &str) -> Option<Arc<dyn SpanLabeler>> {
    let labeler = labeler?;
    if labeler.is_available() {
        Some(labeler)
    } else {
        let err = crate::Error::unavailable(labeler.name());
        log::warn!("[cascade] skipping {} step: {}", step, err);
        None
    }
}
