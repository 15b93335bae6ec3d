//! Identifier → labeler lookup.
//!
//! Configuration names labelers by identifier (`local_model = "custom-ner"`).
//! The caller registers concrete [`SpanLabeler`]s under those identifiers
//! once, and the recognizer resolves them when it is built.

use crate::{Error, Result, SpanLabeler};
use std::collections::HashMap;
use std::sync::Arc;

/// Labelers addressable by identifier.
#[derive(Clone, Default)]
pub struct LabelerRegistry {
    labelers: HashMap<String, Arc<dyn SpanLabeler>>,
}

impl std::fmt::Debug for LabelerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelerRegistry")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

impl LabelerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `labeler` under `identifier`, replacing any previous one.
    pub fn register(&mut self, identifier: impl Into<String>, labeler: Arc<dyn SpanLabeler>) {
        let identifier = identifier.into();
        log::debug!("[registry] {} -> {}", identifier, labeler.name());
        self.labelers.insert(identifier, labeler);
    }

    /// Builder-style [`LabelerRegistry::register`].
    #[must_use]
    pub fn with(mut self, identifier: impl Into<String>, labeler: Arc<dyn SpanLabeler>) -> Self {
        self.register(identifier, labeler);
        self
    }

    /// Labeler for `identifier`, if registered.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<Arc<dyn SpanLabeler>> {
        self.labelers.get(identifier).cloned()
    }

    /// Labeler for `identifier`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if nothing is registered under `identifier`.
    pub fn resolve(&self, identifier: &str) -> Result<Arc<dyn SpanLabeler>> {
        self.get(identifier).ok_or_else(|| {
            Error::config(format!(
                "unknown labeler '{identifier}' (registered: {})",
                self.identifiers().join(", ")
            ))
        })
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.labelers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered labelers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labelers.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labelers.is_empty()
    }
}
