//! Span-producing sources and how they are combined.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ RecognitionCascade (first non-empty result wins)    │
//! │                                                     │
//! │  1. External      full text, score > threshold      │
//! │  2. Local         full text, configured identifier  │
//! │  3. LanguageRouted  per sentence, by language       │
//! │  4. Fallback      full text, default labeler        │
//! ├─────────────────────────────────────────────────────┤
//! │ LabelerRegistry                                     │
//! │   identifier → SpanLabeler, resolved at build time  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Dictionary matching is not a cascade step; [`crate::Recognizer`]
//! concatenates dictionary spans with the cascade answer and resolves
//! overlaps across both.

pub mod cascade;
pub mod registry;

pub use cascade::{
    AttemptRecord, AttemptStatus, CascadeOutcome, RecognitionCascade, RecognitionCascadeBuilder,
    Strategy,
};
pub use registry::LabelerRegistry;
