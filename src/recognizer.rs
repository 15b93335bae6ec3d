//! The [`Recognizer`] facade: dictionaries, cascade and alignment in one place.
//!
//! ```text
//!  text ─┬─► DictionaryRegistry ─┐
//!        ├─► RecognitionCascade ─┴─► resolve_overlaps ─┐
//!        └─► Tokenizer ────────────────────────────────┴─► TokenAligner ─► Vec<AnnotatedToken>
//! ```

use crate::align::TokenAligner;
use crate::backends::cascade::{CascadeOutcome, RecognitionCascade};
use crate::backends::registry::LabelerRegistry;
use crate::config::RecognizerConfig;
use crate::dictionary::DictionaryRegistry;
use crate::lang::{CachedClassifier, LanguageCache, LanguageRouter};
use crate::{
    AnnotatedToken, EmojiDetector, EntitySpan, LanguageClassifier, Result, SpanLabeler, Token,
    Tokenizer, WhitespaceTokenizer,
};
use std::sync::Arc;

/// Entity recognizer over multilingual, emoji-bearing text.
///
/// Cheap to share: every collaborator is behind an `Arc`, and the only
/// interior mutability is the language cache.
pub struct Recognizer {
    config: RecognizerConfig,
    dictionaries: DictionaryRegistry,
    cascade: RecognitionCascade,
    tokenizer: Arc<dyn Tokenizer>,
    aligner: TokenAligner,
    classifier: Option<CachedClassifier>,
    cache: Arc<LanguageCache>,
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer")
            .field("dictionaries", &self.dictionaries.len())
            .field("cascade", &self.cascade.strategy_names())
            .field("threshold", &self.config.confidence_threshold)
            .finish_non_exhaustive()
    }
}

impl Recognizer {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> RecognizerBuilder {
        RecognizerBuilder::default()
    }

    /// Build from configuration, resolving labeler identifiers in `labelers`.
    ///
    /// # Errors
    ///
    /// See [`RecognizerBuilder::build`].
    pub fn from_config(config: RecognizerConfig, labelers: LabelerRegistry) -> Result<Self> {
        Self::builder().config(config).labelers(labelers).build()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// The cascade.
    #[must_use]
    pub fn cascade(&self) -> &RecognitionCascade {
        &self.cascade
    }

    /// Registered dictionaries.
    #[must_use]
    pub fn dictionaries(&self) -> &DictionaryRegistry {
        &self.dictionaries
    }

    /// Language cache shared by sentence routing and token annotation.
    #[must_use]
    pub fn language_cache(&self) -> &Arc<LanguageCache> {
        &self.cache
    }

    /// Add or replace a dictionary. See
    /// [`DictionaryRegistry::register_dictionary`].
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidDictionary`]; nothing changes on error.
    pub fn register_dictionary<I, S>(
        &mut self,
        entity_type: impl Into<String>,
        terms: I,
        case_sensitive: bool,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dictionaries
            .register_dictionary(entity_type, terms, case_sensitive)
    }

    /// Raw (possibly overlapping) dictionary matches.
    #[must_use]
    pub fn match_dictionary(&self, text: &str) -> Vec<EntitySpan> {
        self.dictionaries.match_text(text)
    }

    /// See [`crate::resolve_overlaps`].
    #[must_use]
    pub fn resolve_overlaps(&self, spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
        crate::resolve_overlaps(spans)
    }

    /// Cascade spans for `text` with an explicit threshold.
    #[must_use]
    pub fn recognize_multilingual(&self, text: &str, threshold: f64) -> Vec<EntitySpan> {
        self.cascade.recognize_multilingual(text, threshold)
    }

    /// Cascade run with the configured threshold, including its trace.
    #[must_use]
    pub fn recognize(&self, text: &str) -> CascadeOutcome {
        self.cascade
            .recognize(text, self.config.confidence_threshold)
    }

    /// Language of `text`, through the cache. `None` without a classifier.
    #[must_use]
    pub fn detect_language(&self, text: &str) -> Option<String> {
        self.classifier.as_ref().and_then(|c| c.detect(text))
    }

    /// Annotate `tokens` against `spans`.
    #[must_use]
    pub fn align(&self, text: &str, tokens: &[Token], spans: &[EntitySpan]) -> Vec<AnnotatedToken> {
        self.aligner.align(text, tokens, spans)
    }

    /// Resolved entity spans for `text`.
    ///
    /// Dictionary matches (when enabled) come before cascade spans, so on an
    /// equal-length tie at the same start the dictionary span is kept.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<EntitySpan> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut spans = if self.config.use_dictionaries {
            self.match_dictionary(text)
        } else {
            Vec::new()
        };
        spans.extend(self.recognize(text).spans);

        crate::resolve_overlaps(spans)
    }

    /// Tokenize, extract and align.
    #[must_use]
    pub fn process(&self, text: &str) -> Vec<AnnotatedToken> {
        if text.is_empty() {
            return Vec::new();
        }
        let tokens = self.tokenizer.tokenize(text);
        let spans = self.extract(text);
        self.align(text, &tokens, &spans)
    }

    /// [`Recognizer::process`] over each text.
    #[must_use]
    pub fn process_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<AnnotatedToken>> {
        texts.iter().map(|t| self.process(t.as_ref())).collect()
    }
}

/// Builder for [`Recognizer`].
///
/// Labelers set directly take precedence over identifiers in the config.
#[derive(Default)]
pub struct RecognizerBuilder {
    config: RecognizerConfig,
    labelers: LabelerRegistry,
    external: Option<Arc<dyn SpanLabeler>>,
    local: Option<Arc<dyn SpanLabeler>>,
    fallback: Option<Arc<dyn SpanLabeler>>,
    routed: Vec<(String, Arc<dyn SpanLabeler>)>,
    classifier: Option<Arc<dyn LanguageClassifier>>,
    cache: Option<Arc<LanguageCache>>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    emoji: Option<Arc<dyn EmojiDetector>>,
}

impl RecognizerBuilder {
    /// Use this configuration.
    #[must_use]
    pub fn config(mut self, config: RecognizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Labelers available to config identifiers.
    #[must_use]
    pub fn labelers(mut self, labelers: LabelerRegistry) -> Self {
        self.labelers = labelers;
        self
    }

    /// Cascade step 1.
    #[must_use]
    pub fn external(mut self, labeler: Arc<dyn SpanLabeler>) -> Self {
        self.external = Some(labeler);
        self
    }

    /// Cascade step 2.
    #[must_use]
    pub fn local(mut self, labeler: Arc<dyn SpanLabeler>) -> Self {
        self.local = Some(labeler);
        self
    }

    /// Add a cascade step 3 labeler for `language`.
    #[must_use]
    pub fn routed(mut self, language: impl Into<String>, labeler: Arc<dyn SpanLabeler>) -> Self {
        self.routed.push((language.into(), labeler));
        self
    }

    /// Cascade step 4.
    #[must_use]
    pub fn fallback(mut self, labeler: Arc<dyn SpanLabeler>) -> Self {
        self.fallback = Some(labeler);
        self
    }

    /// Language classifier for sentences and tokens.
    #[must_use]
    pub fn classifier(mut self, classifier: Arc<dyn LanguageClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Share an existing language cache instead of creating one.
    #[must_use]
    pub fn language_cache(mut self, cache: Arc<LanguageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Tokenizer for [`Recognizer::process`]; defaults to
    /// [`WhitespaceTokenizer`].
    #[must_use]
    pub fn tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Emoji detector; defaults to [`crate::UnicodeEmoji`].
    #[must_use]
    pub fn emoji_detector(mut self, emoji: Arc<dyn EmojiDetector>) -> Self {
        self.emoji = Some(emoji);
        self
    }

    /// Validate the config, resolve labelers and register dictionaries.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Config`] for invalid values or unknown labeler identifiers
    /// - [`crate::Error::InvalidDictionary`] for a bad configured dictionary
    pub fn build(self) -> Result<Recognizer> {
        let config = self.config;
        config.validate()?;

        let resolve = |explicit: Option<Arc<dyn SpanLabeler>>, id: &Option<String>| {
            match (explicit, id) {
                (Some(labeler), _) => Ok(Some(labeler)),
                (None, Some(id)) => self.labelers.resolve(id).map(Some),
                (None, None) => Ok(None),
            }
        };
        let external = resolve(self.external, &config.external)?;
        let local = resolve(self.local, &config.local_model)?;
        let fallback = resolve(self.fallback, &config.fallback)?;

        let mut router = LanguageRouter::new(config.default_language.as_str());
        for routed in &config.routed {
            router.register(routed.language.as_str(), self.labelers.resolve(&routed.labeler)?);
        }
        for (language, labeler) in self.routed {
            router.register(language, labeler);
        }

        let cache = self.cache.unwrap_or_default();
        let classifier = self.classifier.map(|c| {
            CachedClassifier::new(c)
                .with_cache(cache.clone())
                .with_min_length(config.min_language_length)
        });

        let mut cascade = RecognitionCascade::builder();
        if let Some(labeler) = external {
            cascade = cascade.external(labeler);
        }
        if let Some(labeler) = local {
            cascade = cascade.local(labeler);
        }
        if !router.is_empty() {
            cascade = cascade.router(router);
        }
        if let Some(c) = &classifier {
            cascade = cascade.classifier(c.clone());
        }
        if let Some(labeler) = fallback {
            cascade = cascade.fallback(labeler);
        }
        let cascade = cascade.build();

        let mut aligner = TokenAligner::new().with_normalize(config.normalize);
        if let Some(emoji) = self.emoji {
            aligner = aligner.with_emoji_detector(emoji);
        }
        if let Some(c) = &classifier {
            aligner = aligner.with_classifier(c.clone());
        }

        let mut dictionaries = DictionaryRegistry::new();
        dictionaries.extend_from_config(&config.dictionaries)?;

        Ok(Recognizer {
            config,
            dictionaries,
            cascade,
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Arc::new(WhitespaceTokenizer)),
            aligner,
            classifier,
            cache,
        })
    }
}
