//! Dictionary-based span matching.
//!
//! A [`DictionaryRegistry`] holds one [`DictionaryEntry`] per entity type.
//! Matching is literal: no tokenization, no word boundaries. Every
//! occurrence of every term is reported, including overlapping occurrences
//! of the same term, and overlap between different matches is left to
//! [`crate::resolve_overlaps`].
//!
//! ```rust
//! use polyspan::{resolve_overlaps, DictionaryRegistry};
//!
//! let mut registry = DictionaryRegistry::new();
//! registry
//!     .register_dictionary("LOCATION", ["New York", "York", "New York City"], true)
//!     .unwrap();
//!
//! let text = "I love New York City.";
//! let resolved = resolve_overlaps(registry.match_text(text));
//! assert_eq!(resolved.len(), 1);
//! assert_eq!(resolved[0].text, "New York City");
//! assert_eq!((resolved[0].start, resolved[0].end), (7, 20));
//! ```

use crate::config::DictionaryConfig;
use crate::offset::SpanConverter;
use crate::{EntitySpan, Error, Result, SpanSource};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Terms registered for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Label assigned to every match.
    pub entity_type: String,
    /// Terms, longest first (stable for equal lengths).
    pub terms: Vec<String>,
    /// Whether matching respects case.
    pub case_sensitive: bool,
}

impl DictionaryEntry {
    fn new(entity_type: String, mut terms: Vec<String>, case_sensitive: bool) -> Self {
        // stable: equal-length terms keep their registration order
        terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
        Self {
            entity_type,
            terms,
            case_sensitive,
        }
    }
}

/// Literal-term store and matcher.
///
/// Entity types are matched in registration order. Re-registering a type
/// replaces its entry in place, keeping its original position.
#[derive(Debug, Clone, Default)]
pub struct DictionaryRegistry {
    entries: Vec<DictionaryEntry>,
}

impl DictionaryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the dictionary for `entity_type`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDictionary`] if `entity_type` is blank or any term is
    /// empty. The registry is unchanged on error.
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
        let entity_type = entity_type.into();
        if entity_type.trim().is_empty() {
            return Err(Error::invalid_dictionary("entity type must not be empty"));
        }

        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        if let Some(idx) = terms.iter().position(String::is_empty) {
            return Err(Error::invalid_dictionary(format!(
                "term #{idx} for {entity_type} is empty"
            )));
        }

        let entry = DictionaryEntry::new(entity_type, terms, case_sensitive);
        log::debug!(
            "[dictionary] registered {} ({} terms, case_sensitive={})",
            entry.entity_type,
            entry.terms.len(),
            entry.case_sensitive
        );

        match self
            .entries
            .iter_mut()
            .find(|e| e.entity_type == entry.entity_type)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// Register every dictionary from configuration, in order.
    ///
    /// # Errors
    ///
    /// The first [`Error::InvalidDictionary`]; dictionaries before it stay
    /// registered.
    pub fn extend_from_config(&mut self, dictionaries: &[DictionaryConfig]) -> Result<()> {
        for d in dictionaries {
            self.register_dictionary(
                d.entity_type.as_str(),
                d.terms.iter().cloned(),
                d.case_sensitive,
            )?;
        }
        Ok(())
    }

    /// Entry for `entity_type`, if registered.
    #[must_use]
    pub fn entry(&self, entity_type: &str) -> Option<&DictionaryEntry> {
        self.entries.iter().find(|e| e.entity_type == entity_type)
    }

    /// Registered entity types, in registration order.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.entity_type.as_str())
    }

    /// Number of registered entity types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find every occurrence of every registered term.
    ///
    /// Output is in insertion order (entity type, then term, then position)
    /// and may overlap; pass it to [`crate::resolve_overlaps`].
    #[must_use]
    pub fn match_text(&self, text: &str) -> Vec<EntitySpan> {
        if text.is_empty() || self.entries.is_empty() {
            return Vec::new();
        }

        let converter = SpanConverter::new(text);
        let folded = self.entries.iter().any(|e| !e.case_sensitive).then(|| {
            let folded = fold_case(text);
            let folded_converter = SpanConverter::new(&folded);
            (folded, folded_converter)
        });
        let mut spans = Vec::new();

        for entry in &self.entries {
            let (haystack, haystack_converter) = match (&folded, entry.case_sensitive) {
                (Some((f, c)), false) => (f.as_str(), c),
                _ => (text, &converter),
            };

            for term in &entry.terms {
                let needle: Cow<'_, str> = if entry.case_sensitive {
                    Cow::Borrowed(term.as_str())
                } else {
                    Cow::Owned(fold_case(term))
                };
                let term_chars = needle.chars().count();

                for byte_pos in find_all(haystack, &needle) {
                    // folding preserves char counts, so char offsets carry over
                    let start = haystack_converter.byte_to_char(byte_pos);
                    match EntitySpan::from_converter(
                        text,
                        &converter,
                        start,
                        start + term_chars,
                        entry.entity_type.clone(),
                        SpanSource::Dictionary,
                    ) {
                        Ok(span) => spans.push(span),
                        Err(e) => log::debug!("[dictionary] skipping match: {e}"),
                    }
                }
            }
        }

        spans
    }
}

/// Byte position of each occurrence of `needle`, restarting one character
/// after each match start so overlapping occurrences are all found.
fn find_all(haystack: &str, needle: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut from = 0;

    while from <= haystack.len() {
        let Some(rel) = haystack[from..].find(needle) else {
            break;
        };
        let pos = from + rel;
        positions.push(pos);
        // advance past the first char of the match
        let step = haystack[pos..].chars().next().map_or(1, char::len_utf8);
        from = pos + step;
    }

    positions
}

/// Lowercase one char at a time, keeping chars whose lowercase form is not
/// a single char (e.g. 'İ'), so folded text has the same char count.
fn fold_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        })
        .collect()
}
