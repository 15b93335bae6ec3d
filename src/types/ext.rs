//! Extension traits for span and token collections.

use crate::emoji::{categorize, EmojiCategory};
use crate::{AnnotatedToken, EntitySpan, SpanSource};
use std::collections::{BTreeMap, HashMap};

/// Extension methods for slices of entity spans.
///
/// # Example
///
/// ```rust
/// use polyspan::{EntitySpan, SpanSource};
/// use polyspan::types::EntitySpanSliceExt;
///
/// let spans = vec![
///     EntitySpan::new("John", 0, 4, "PER", SpanSource::ExternalLabeler).unwrap().with_score(0.9),
///     EntitySpan::new("Acme", 10, 14, "ORG", SpanSource::Dictionary).unwrap(),
///     EntitySpan::new("Paris", 20, 25, "LOC", SpanSource::ExternalLabeler).unwrap().with_score(0.7),
/// ];
///
/// assert_eq!(spans.above_score(0.8).count(), 1);
/// assert_eq!(spans.by_source(SpanSource::Dictionary).count(), 1);
/// assert!(!spans.has_overlaps());
/// ```
pub trait EntitySpanSliceExt {
    /// Spans with a score of at least `min`. Unscored spans are skipped.
    fn above_score(&self, min: f64) -> impl Iterator<Item = &EntitySpan>;

    /// Spans with this label.
    fn with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a EntitySpan>;

    /// Spans from this source.
    fn by_source(&self, source: SpanSource) -> impl Iterator<Item = &EntitySpan>;

    /// Whether any two spans overlap.
    fn has_overlaps(&self) -> bool;

    /// Every overlapping pair.
    fn overlapping_pairs(&self) -> Vec<(&EntitySpan, &EntitySpan)>;

    /// Spans sorted by `(start, end)`.
    fn sorted_by_position(&self) -> Vec<&EntitySpan>;

    /// Mean score over scored spans.
    fn mean_score(&self) -> Option<f64>;

    /// Spans grouped by label.
    fn group_by_label(&self) -> HashMap<String, Vec<&EntitySpan>>;

    /// First span covering char offset `pos`.
    fn at_position(&self, pos: usize) -> Option<&EntitySpan>;
}

impl EntitySpanSliceExt for [EntitySpan] {
    fn above_score(&self, min: f64) -> impl Iterator<Item = &EntitySpan> {
        self.iter()
            .filter(move |s| s.score.is_some_and(|score| score >= min))
    }

    fn with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a EntitySpan> {
        self.iter().filter(move |s| s.label == label)
    }

    fn by_source(&self, source: SpanSource) -> impl Iterator<Item = &EntitySpan> {
        self.iter().filter(move |s| s.source == source)
    }

    fn has_overlaps(&self) -> bool {
        !crate::resolve::is_non_overlapping(self)
    }

    fn overlapping_pairs(&self) -> Vec<(&EntitySpan, &EntitySpan)> {
        let mut pairs = Vec::new();
        for i in 0..self.len() {
            for j in (i + 1)..self.len() {
                if self[i].overlaps(&self[j]) {
                    pairs.push((&self[i], &self[j]));
                }
            }
        }
        pairs
    }

    fn sorted_by_position(&self) -> Vec<&EntitySpan> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by_key(|s| (s.start, s.end));
        sorted
    }

    fn mean_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self.iter().filter_map(|s| s.score).collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    fn group_by_label(&self) -> HashMap<String, Vec<&EntitySpan>> {
        let mut groups: HashMap<String, Vec<&EntitySpan>> = HashMap::new();
        for span in self {
            groups.entry(span.label.clone()).or_default().push(span);
        }
        groups
    }

    fn at_position(&self, pos: usize) -> Option<&EntitySpan> {
        self.iter().find(|s| s.start <= pos && pos < s.end)
    }
}

/// Filters and counts over annotated tokens.
///
/// Distributions are `BTreeMap`s so iteration order is stable.
///
/// ```rust
/// use polyspan::{Recognizer, MockClassifier, MockLabeler};
/// use polyspan::types::AnnotatedTokenSliceExt;
/// use std::sync::Arc;
///
/// let recognizer = Recognizer::builder()
///     .classifier(Arc::new(MockClassifier::new().with("Paris", "fr").with_default("en")))
///     .fallback(Arc::new(MockLabeler::new("ner").with_term("Paris", "LOC", None)))
///     .build()
///     .unwrap();
///
/// let tokens = recognizer.process("Loving Paris 🥐 🥐");
/// assert_eq!(tokens.emoji_distribution()["🥐"], 2);
/// assert_eq!(tokens.entity_distribution()["LOC"], 1);
/// assert_eq!(tokens.with_language("fr").count(), 1);
/// ```
pub trait AnnotatedTokenSliceExt {
    /// Tokens detected as `language`.
    fn with_language<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a AnnotatedToken>;

    /// Tokens with entity label `label`, or with any label when `None`.
    fn with_entity<'a>(&'a self, label: Option<&'a str>)
        -> impl Iterator<Item = &'a AnnotatedToken>;

    /// Emoji tokens.
    fn emojis(&self) -> impl Iterator<Item = &AnnotatedToken>;

    /// Token count per language, ignoring emoji and unclassified tokens.
    fn language_distribution(&self) -> BTreeMap<String, usize>;

    /// Token count per entity label.
    fn entity_distribution(&self) -> BTreeMap<String, usize>;

    /// Count per distinct emoji.
    fn emoji_distribution(&self) -> BTreeMap<String, usize>;

    /// Count per emoji category. Emoji tokens the registry does not know
    /// count as [`EmojiCategory::Other`].
    fn emoji_category_distribution(&self) -> BTreeMap<EmojiCategory, usize>;
}

fn count<'a>(keys: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
    counts
}

impl AnnotatedTokenSliceExt for [AnnotatedToken] {
    fn with_language<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a AnnotatedToken> {
        self.iter()
            .filter(move |t| t.language.as_deref() == Some(language))
    }

    fn with_entity<'a>(
        &'a self,
        label: Option<&'a str>,
    ) -> impl Iterator<Item = &'a AnnotatedToken> {
        self.iter().filter(move |t| match label {
            Some(label) => t.entity_label.as_deref() == Some(label),
            None => t.entity_label.is_some(),
        })
    }

    fn emojis(&self) -> impl Iterator<Item = &AnnotatedToken> {
        self.iter().filter(|t| t.is_emoji)
    }

    fn language_distribution(&self) -> BTreeMap<String, usize> {
        count(
            self.iter()
                .filter(|t| !t.is_emoji)
                .filter_map(|t| t.language.as_deref()),
        )
    }

    fn entity_distribution(&self) -> BTreeMap<String, usize> {
        count(self.iter().filter_map(|t| t.entity_label.as_deref()))
    }

    fn emoji_distribution(&self) -> BTreeMap<String, usize> {
        count(self.emojis().map(|t| t.token.as_str()))
    }

    fn emoji_category_distribution(&self) -> BTreeMap<EmojiCategory, usize> {
        let mut counts = BTreeMap::new();
        for token in self.emojis() {
            let category = categorize(&token.token).unwrap_or(EmojiCategory::Other);
            *counts.entry(category).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, label: &str, score: Option<f64>) -> EntitySpan {
        EntitySpan::new("x", start, end, label, SpanSource::ExternalLabeler)
            .unwrap()
            .with_optional_score(score)
    }

    fn token(text: &str, language: Option<&str>, label: Option<&str>) -> AnnotatedToken {
        AnnotatedToken {
            token: text.to_string(),
            language: language.map(String::from),
            is_emoji: false,
            normalized_token: text.to_lowercase(),
            entity_label: label.map(String::from),
            entity_score: None,
            entity_text: None,
        }
    }

    fn emoji(text: &str) -> AnnotatedToken {
        AnnotatedToken {
            is_emoji: true,
            ..token(text, None, None)
        }
    }

    #[test]
    fn span_filters() {
        let spans = vec![
            span(0, 4, "PER", Some(0.75)),
            span(10, 14, "ORG", None),
            span(20, 25, "PER", Some(0.25)),
        ];
        assert_eq!(spans.above_score(0.5).count(), 1);
        assert_eq!(spans.with_label("PER").count(), 2);
        assert_eq!(spans.mean_score(), Some(0.5));
        assert_eq!(spans.group_by_label()["PER"].len(), 2);
        assert_eq!(spans.at_position(12).map(|s| s.label.as_str()), Some("ORG"));
        assert!(spans.at_position(14).is_none());
    }

    #[test]
    fn span_overlaps_and_sorting() {
        let spans = vec![span(5, 9, "A", None), span(0, 6, "B", None), span(20, 22, "C", None)];
        assert!(spans.has_overlaps());
        assert_eq!(spans.overlapping_pairs().len(), 1);
        let labels: Vec<_> = spans.sorted_by_position().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A", "C"]);
    }

    #[test]
    fn token_distributions() {
        let tokens = vec![
            token("I", None, None),
            token("love", Some("en"), None),
            token("Paris", Some("fr"), Some("LOC")),
            token("and", Some("en"), None),
            token("Texas", Some("en"), Some("LOC")),
            emoji("🎉"),
            emoji("🎉"),
            emoji("🥐"),
        ];

        let langs = tokens.language_distribution();
        assert_eq!(langs.get("en"), Some(&3));
        assert_eq!(langs.get("fr"), Some(&1));
        assert_eq!(tokens.entity_distribution().get("LOC"), Some(&2));
        assert_eq!(
            tokens.emoji_distribution().into_iter().collect::<Vec<_>>(),
            vec![("🎉".to_string(), 2), ("🥐".to_string(), 1)]
        );
        assert_eq!(tokens.with_entity(None).count(), 2);
        assert_eq!(tokens.with_entity(Some("LOC")).count(), 2);
        assert_eq!(tokens.with_entity(Some("PER")).count(), 0);
        assert_eq!(tokens.with_language("en").count(), 3);
        assert_eq!(tokens.emojis().count(), 3);
        assert_eq!(
            tokens.emoji_category_distribution().into_iter().collect::<Vec<_>>(),
            vec![(EmojiCategory::Food, 1), (EmojiCategory::Other, 2)]
        );
    }

    #[test]
    fn empty_slices() {
        let spans: Vec<EntitySpan> = Vec::new();
        assert!(!spans.has_overlaps());
        assert_eq!(spans.mean_score(), None);
        let tokens: Vec<AnnotatedToken> = Vec::new();
        assert!(tokens.language_distribution().is_empty());
    }
}
