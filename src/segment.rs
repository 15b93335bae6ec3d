//! Sentence segmentation.
//!
//! Text is split after every run of `.`, `!` or `?` that is followed by
//! whitespace. Segments are trimmed, empty ones are dropped, and offsets are
//! char offsets into the original text, so `original[start..end]` (in chars)
//! is exactly the segment text.
//!
//! ```text
//! "Hello world. Bonjour le monde!  Hola"
//!  ├──────────┤ ├───────────────┤  ├──┤
//!  0         12 13             30  32  36
//! ```

use crate::lang::CachedClassifier;
use crate::offset::SpanConverter;
use crate::SentenceSegment;
use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s+").expect("valid sentence-break regex"));

/// Split `text` into trimmed, non-empty segments with `language = None`.
///
/// ```rust
/// use polyspan::segment::segment;
///
/// let segments = segment("Hello world. Bonjour le monde!");
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[1].text, "Bonjour le monde!");
/// assert_eq!((segments[1].start, segments[1].end), (13, 30));
/// ```
#[must_use]
pub fn segment(text: &str) -> Vec<SentenceSegment> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let converter = SpanConverter::new(text);
    let mut segments = Vec::new();
    let mut piece_start = 0;

    for m in SENTENCE_BREAK.find_iter(text) {
        // the punctuation stays with its sentence; the whitespace is dropped
        let punct_end = m.start() + m.as_str().trim_end().len();
        push_trimmed(text, &converter, piece_start, punct_end, &mut segments);
        piece_start = m.end();
    }
    push_trimmed(text, &converter, piece_start, text.len(), &mut segments);

    segments
}

/// Segment `text` and assign each segment a language through `classifier`.
#[must_use]
pub fn segment_with_languages(text: &str, classifier: &CachedClassifier) -> Vec<SentenceSegment> {
    let mut segments = segment(text);
    for seg in &mut segments {
        seg.language = classifier.detect(&seg.text);
    }
    segments
}

fn push_trimmed(
    text: &str,
    converter: &SpanConverter,
    byte_start: usize,
    byte_end: usize,
    out: &mut Vec<SentenceSegment>,
) {
    let piece = &text[byte_start..byte_end];
    let trimmed = piece.trim();
    if trimmed.is_empty() {
        return;
    }

    let lead = piece.len() - piece.trim_start().len();
    let start_byte = byte_start + lead;
    let end_byte = start_byte + trimmed.len();

    out.push(SentenceSegment {
        text: trimmed.to_string(),
        start: converter.byte_to_char(start_byte),
        end: converter.byte_to_char(end_byte),
        language: None,
    });
}
