//! Language classification plumbing: memoization and minimum-length gating.
//!
//! This crate does not identify languages itself. It consumes a
//! [`LanguageClassifier`](crate::LanguageClassifier) and adds two things on
//! top:
//!
//! - inputs are trimmed, and anything shorter than a minimum length
//!   (default 3 chars) is not classified at all;
//! - results are memoized in a [`LanguageCache`] keyed by the exact
//!   trimmed input, since classification is deterministic.
//!
//! # Thread safety
//!
//! [`LanguageCache`] is `Send + Sync`. Lookups and inserts each take the
//! internal lock briefly; the classifier itself runs **outside** the lock,
//! so two threads may classify the same string concurrently and both insert
//! the same answer. Entries are never evicted.

use crate::sync::{lock, Mutex};
use crate::{LanguageClassifier, SpanLabeler};
use std::collections::HashMap;
use std::sync::Arc;

/// Default minimum trimmed length (in chars) before a string is classified.
pub const DEFAULT_MIN_LANGUAGE_LENGTH: usize = 3;

/// Append-only memo of classifier answers, keyed by exact input.
///
/// Owned by a [`crate::Recognizer`] by default; share one between
/// recognizers by passing the same `Arc<LanguageCache>` to each.
///
/// ```rust
/// use polyspan::lang::LanguageCache;
///
/// let cache = LanguageCache::new();
/// assert_eq!(cache.get("bonjour tout le monde"), None);
/// cache.put("bonjour tout le monde", Some("fr".to_string()));
/// assert_eq!(cache.get("bonjour tout le monde"), Some(Some("fr".to_string())));
/// ```
#[derive(Debug, Default)]
pub struct LanguageCache {
    entries: Mutex<HashMap<String, Option<String>>>,
}

impl LanguageCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached answer for `text`. The outer `Option` is the cache hit; the
    /// inner one is the classifier's answer (which may itself be `None`).
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Option<String>> {
        lock(&self.entries).get(text).cloned()
    }

    /// Record the classifier's answer for `text`.
    pub fn put(&self, text: impl Into<String>, language: Option<String>) {
        lock(&self.entries).insert(text.into(), language);
    }

    /// Number of cached strings.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A classifier wrapped with trimming, a length gate and memoization.
#[derive(Clone)]
pub struct CachedClassifier {
    classifier: Arc<dyn LanguageClassifier>,
    cache: Arc<LanguageCache>,
    min_length: usize,
}

impl std::fmt::Debug for CachedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedClassifier")
            .field("cached", &self.cache.len())
            .field("min_length", &self.min_length)
            .finish()
    }
}

impl CachedClassifier {
    /// Wrap `classifier` with a fresh cache and the default length gate.
    #[must_use]
    pub fn new(classifier: Arc<dyn LanguageClassifier>) -> Self {
        Self {
            classifier,
            cache: Arc::new(LanguageCache::new()),
            min_length: DEFAULT_MIN_LANGUAGE_LENGTH,
        }
    }

    /// Use an existing (possibly shared) cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<LanguageCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Change the minimum trimmed length.
    #[must_use]
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// The cache backing this classifier.
    #[must_use]
    pub fn cache(&self) -> &Arc<LanguageCache> {
        &self.cache
    }

    /// Minimum trimmed length.
    #[must_use]
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Detect the language of `text`.
    ///
    /// Returns `None` without calling the classifier when the trimmed text
    /// is shorter than the minimum length.
    #[must_use]
    pub fn detect(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_length {
            return None;
        }

        if let Some(hit) = self.cache.get(trimmed) {
            return hit;
        }

        let language = self.classifier.classify(trimmed);
        log::trace!("[lang] classified {:?} as {:?}", trimmed, language);
        self.cache.put(trimmed, language.clone());
        language
    }
}

/// Per-language labeler table.
///
/// Selection for a detected language falls back in a fixed order:
/// the labeler registered for that language, then the one registered for the
/// default language, then the first one registered.
#[derive(Clone)]
pub struct LanguageRouter {
    labelers: Vec<(String, Arc<dyn SpanLabeler>)>,
    default_language: String,
}

impl std::fmt::Debug for LanguageRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageRouter")
            .field("languages", &self.languages().collect::<Vec<_>>())
            .field("default_language", &self.default_language)
            .finish()
    }
}

impl LanguageRouter {
    /// Empty router with the given default language.
    #[must_use]
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            labelers: Vec::new(),
            default_language: default_language.into(),
        }
    }

    /// Register (or replace) the labeler for `language`.
    pub fn register(&mut self, language: impl Into<String>, labeler: Arc<dyn SpanLabeler>) {
        let language = language.into();
        match self.labelers.iter_mut().find(|(l, _)| *l == language) {
            Some(slot) => slot.1 = labeler,
            None => self.labelers.push((language, labeler)),
        }
    }

    /// Builder-style [`LanguageRouter::register`].
    #[must_use]
    pub fn with_labeler(mut self, language: impl Into<String>, labeler: Arc<dyn SpanLabeler>) -> Self {
        self.register(language, labeler);
        self
    }

    /// The default language key.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Registered language keys, in registration order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.labelers.iter().map(|(l, _)| l.as_str())
    }

    /// Number of registered labelers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labelers.len()
    }

    /// Whether no labeler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labelers.is_empty()
    }

    /// Drop labelers that report themselves unavailable.
    pub(crate) fn retain_available(&mut self) {
        self.labelers.retain(|(language, labeler)| {
            let available = labeler.is_available();
            if !available {
                log::warn!(
                    "[router] {} labeler '{}' unavailable, not routing to it",
                    language,
                    labeler.name()
                );
            }
            available
        });
    }

    /// Pick the labeler for `language`, returning its language key too.
    ///
    /// ```rust
    /// use polyspan::lang::LanguageRouter;
    /// use polyspan::MockLabeler;
    /// use std::sync::Arc;
    ///
    /// let router = LanguageRouter::new("en")
    ///     .with_labeler("fr", Arc::new(MockLabeler::new("fr-model")))
    ///     .with_labeler("en", Arc::new(MockLabeler::new("en-model")));
    ///
    /// assert_eq!(router.select(Some("fr")).map(|(l, _)| l), Some("fr"));
    /// assert_eq!(router.select(Some("de")).map(|(l, _)| l), Some("en"));
    /// assert_eq!(router.select(None).map(|(l, _)| l), Some("en"));
    /// ```
    #[must_use]
    pub fn select(&self, language: Option<&str>) -> Option<(&str, &Arc<dyn SpanLabeler>)> {
        let find = |key: &str| self.labelers.iter().find(|(l, _)| l == key);

        language
            .and_then(find)
            .or_else(|| find(&self.default_language))
            .or_else(|| self.labelers.first())
            .map(|(l, labeler)| (l.as_str(), labeler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockClassifier, MockLabeler};

    fn cached(mock: &Arc<MockClassifier>) -> CachedClassifier {
        CachedClassifier::new(mock.clone())
    }

    #[test]
    fn short_text_not_classified() {
        let mock = Arc::new(MockClassifier::new().with_default("en"));
        let classifier = cached(&mock);
        assert_eq!(classifier.detect("  hi "), None);
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn cache_hit_skips_classifier() {
        let mock = Arc::new(MockClassifier::new().with("Bonjour le monde", "fr"));
        let classifier = cached(&mock);
        assert_eq!(classifier.detect("Bonjour le monde"), Some("fr".to_string()));
        assert_eq!(classifier.detect("  Bonjour le monde  "), Some("fr".to_string()));
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn none_answers_are_cached_too() {
        let mock = Arc::new(MockClassifier::new());
        let classifier = cached(&mock);
        assert_eq!(classifier.detect("zzzz"), None);
        assert_eq!(classifier.detect("zzzz"), None);
        assert_eq!(mock.calls(), 1);
        assert_eq!(classifier.cache().get("zzzz"), Some(None));
    }

    #[test]
    fn shared_cache_between_wrappers() {
        let mock = Arc::new(MockClassifier::new().with_default("en"));
        let cache = Arc::new(LanguageCache::new());
        let a = cached(&mock).with_cache(cache.clone());
        let b = cached(&mock).with_cache(cache.clone());
        let _ = a.detect("hello there");
        let _ = b.detect("hello there");
        assert_eq!(mock.calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn min_length_is_configurable() {
        let mock = Arc::new(MockClassifier::new().with_default("en"));
        let classifier = cached(&mock).with_min_length(1);
        assert_eq!(classifier.detect("a"), Some("en".to_string()));
    }

    #[test]
    fn router_falls_back_to_default_then_first() {
        let router = LanguageRouter::new("en")
            .with_labeler("es", Arc::new(MockLabeler::new("es-model")))
            .with_labeler("fr", Arc::new(MockLabeler::new("fr-model")));

        // no "en" registered, so first registered wins
        let (lang, labeler) = router.select(Some("de")).unwrap();
        assert_eq!(lang, "es");
        assert_eq!(labeler.name(), "es-model");

        let (lang, _) = router.select(Some("fr")).unwrap();
        assert_eq!(lang, "fr");
    }

    #[test]
    fn router_empty_selects_nothing() {
        let router = LanguageRouter::new("en");
        assert!(router.select(Some("en")).is_none());
        assert!(router.is_empty());
    }

    #[test]
    fn router_register_replaces_in_place() {
        let mut router = LanguageRouter::new("en");
        router.register("en", Arc::new(MockLabeler::new("old")));
        router.register("fr", Arc::new(MockLabeler::new("fr")));
        router.register("en", Arc::new(MockLabeler::new("new")));
        assert_eq!(router.languages().collect::<Vec<_>>(), vec!["en", "fr"]);
        assert_eq!(router.select(Some("en")).unwrap().1.name(), "new");
    }

    #[test]
    fn router_drops_unavailable() {
        let mut router = LanguageRouter::new("en")
            .with_labeler("en", Arc::new(MockLabeler::new("en").unavailable()))
            .with_labeler("fr", Arc::new(MockLabeler::new("fr")));
        router.retain_available();
        assert_eq!(router.select(Some("en")).unwrap().0, "fr");
    }
}
