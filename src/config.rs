//! Recognizer configuration, loadable from TOML.
//!
//! ```toml
//! confidence_threshold = 0.6
//! default_language = "en"
//! external = "multilingual-ner"
//! local_model = "custom-ner"
//! fallback = "en-ner"
//!
//! [[routed]]
//! language = "en"
//! labeler = "en-ner"
//!
//! [[routed]]
//! language = "fr"
//! labeler = "fr-ner"
//!
//! [[dictionaries]]
//! entity_type = "PRODUCT"
//! terms = ["iPhone", "MacBook Pro"]
//! case_sensitive = true
//! ```
//!
//! Labelers are named by identifier and resolved against a
//! [`crate::LabelerRegistry`] when the recognizer is built. Every key is
//! optional; omitted keys take the defaults below.
//!
//! | Key | Default |
//! |-----|---------|
//! | `confidence_threshold` | `0.5` |
//! | `min_language_length` | `3` |
//! | `normalize` | `true` |
//! | `default_language` | `"en"` |
//! | `use_dictionaries` | `true` |

use crate::backends::cascade::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::lang::DEFAULT_MIN_LANGUAGE_LENGTH;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Terms for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictionaryConfig {
    /// Label for matches.
    pub entity_type: String,
    /// Literal terms.
    pub terms: Vec<String>,
    /// Whether matching respects case.
    #[serde(default)]
    pub case_sensitive: bool,
}

/// A language → labeler-identifier pair for the routed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutedLabelerConfig {
    /// Language code.
    pub language: String,
    /// Labeler identifier.
    pub labeler: String,
}

/// Settings for a [`crate::Recognizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecognizerConfig {
    /// External labeler spans need a score strictly above this.
    pub confidence_threshold: f64,
    /// Minimum trimmed length before text is language-classified.
    pub min_language_length: usize,
    /// Fill `normalized_token` with the lowercased, accent-stripped form.
    pub normalize: bool,
    /// Routing fallback language.
    pub default_language: String,
    /// Include dictionary matches in `extract`.
    pub use_dictionaries: bool,
    /// External labeler identifier (cascade step 1).
    pub external: Option<String>,
    /// Local labeler identifier (cascade step 2).
    pub local_model: Option<String>,
    /// Fallback labeler identifier (cascade step 4).
    pub fallback: Option<String>,
    /// Per-language labelers (cascade step 3), in priority order.
    pub routed: Vec<RoutedLabelerConfig>,
    /// Dictionaries to register at build time.
    pub dictionaries: Vec<DictionaryConfig>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            min_language_length: DEFAULT_MIN_LANGUAGE_LENGTH,
            normalize: true,
            default_language: "en".to_string(),
            use_dictionaries: true,
            external: None,
            local_model: None,
            fallback: None,
            routed: Vec::new(),
            dictionaries: Vec::new(),
        }
    }
}

impl RecognizerConfig {
    /// Parse and validate TOML.
    ///
    /// # Errors
    ///
    /// [`Error::Toml`] for syntax or unknown keys, [`Error::Config`] for
    /// out-of-range values.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, otherwise as
    /// [`RecognizerConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        log::debug!("[config] loaded {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config(format!("failed to serialize: {e}")))
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::config(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.default_language.trim().is_empty() {
            return Err(Error::config("default_language must not be empty"));
        }
        if let Some(r) = self.routed.iter().find(|r| r.language.trim().is_empty()) {
            return Err(Error::config(format!(
                "routed labeler '{}' has an empty language",
                r.labeler
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = RecognizerConfig::from_toml_str("").unwrap();
        assert_eq!(config, RecognizerConfig::default());
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.min_language_length, 3);
        assert_eq!(config.default_language, "en");
        assert!(config.normalize && config.use_dictionaries);
    }

    #[test]
    fn full_config_parses() {
        let config = RecognizerConfig::from_toml_str(
            r#"
            confidence_threshold = 0.7
            local_model = "custom-ner"
            fallback = "en-ner"

            [[routed]]
            language = "fr"
            labeler = "fr-ner"

            [[dictionaries]]
            entity_type = "PRODUCT"
            terms = ["iPhone"]
            case_sensitive = true

            [[dictionaries]]
            entity_type = "COMPANY"
            terms = ["Apple"]
            "#,
        )
        .unwrap();

        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.local_model.as_deref(), Some("custom-ner"));
        assert_eq!(config.external, None);
        assert_eq!(config.routed[0].language, "fr");
        assert_eq!(config.dictionaries.len(), 2);
        assert!(config.dictionaries[0].case_sensitive);
        assert!(!config.dictionaries[1].case_sensitive);
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let err = RecognizerConfig::from_toml_str("confidence_threshold = 1.5").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = RecognizerConfig::from_toml_str("treshold = 0.5").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn blank_default_language_rejected() {
        assert!(RecognizerConfig::from_toml_str("default_language = \" \"").is_err());
    }

    #[test]
    fn toml_round_trip() {
        let mut config = RecognizerConfig {
            fallback: Some("en-ner".to_string()),
            ..Default::default()
        };
        config.dictionaries.push(DictionaryConfig {
            entity_type: "CITY".to_string(),
            terms: vec!["Zürich".to_string()],
            case_sensitive: false,
        });
        let s = config.to_toml_string().unwrap();
        assert_eq!(RecognizerConfig::from_toml_str(&s).unwrap(), config);
    }
}
