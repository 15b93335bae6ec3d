//! Overlap resolution: reduce candidate spans to a non-overlapping set.
//!
//! # Longest Span Wins
//!
//! ```text
//! Text:  "I love New York City."
//!                ├──────┤            New York       (7..15)
//!                    ├──┤            York           (11..15)
//!                ├───────────┤       New York City  (7..20)  ← kept
//! ```
//!
//! Candidates are stably sorted by `start`, then scanned once. Each
//! candidate is compared against the **first** accepted span it overlaps:
//! strictly longer replaces it in place, anything else is dropped.
//!
//! Because candidates arrive sorted by `start`, at most one accepted span
//! can contain a candidate's start point, so the result never overlaps. The
//! single greedy pass is still not an optimal interval selection: a chain
//! of replacements can drop a span that could have coexisted with the
//! final winner.
//!
//! ```text
//!   A: 0..4    accepted
//!   C: 2..7    overlaps A, longer → replaces A
//!   B: 5..12   overlaps C, longer → replaces C
//!   result: [B]    (A and B were compatible)
//! ```
//!
//! The scan is linear in the number of accepted spans per candidate, which
//! is fine for dictionary output that is small relative to text length.

use crate::EntitySpan;

#[derive(Debug)]
enum Resolution {
    KeepExisting,
    Replace,
}

fn longest_span(existing: &EntitySpan, candidate: &EntitySpan) -> Resolution {
    if candidate.len() > existing.len() {
        Resolution::Replace
    } else {
        Resolution::KeepExisting
    }
}

/// Resolve overlapping spans, preferring the longest.
///
/// Takes the candidates by value and returns a new list sorted by `start`.
/// Ties (equal length) keep whichever span sorted first, so for equal
/// starts the earlier candidate in the input wins.
///
/// ```rust
/// use polyspan::{resolve_overlaps, EntitySpan, SpanSource};
///
/// let spans = vec![
///     EntitySpan::new("New York", 0, 8, "LOC", SpanSource::Dictionary).unwrap(),
///     EntitySpan::new("New York City", 0, 13, "LOC", SpanSource::Dictionary).unwrap(),
/// ];
/// let resolved = resolve_overlaps(spans);
/// assert_eq!(resolved.len(), 1);
/// assert_eq!(resolved[0].text, "New York City");
/// ```
#[must_use]
pub fn resolve_overlaps(mut spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
    // sort_by_key is stable
    spans.sort_by_key(|s| s.start);

    let mut accepted: Vec<EntitySpan> = Vec::with_capacity(spans.len());

    for candidate in spans {
        let overlap_idx = accepted.iter().position(|e| candidate.overlaps(e));

        match overlap_idx {
            None => accepted.push(candidate),
            Some(idx) => match longest_span(&accepted[idx], &candidate) {
                Resolution::KeepExisting => {}
                Resolution::Replace => accepted[idx] = candidate,
            },
        }
    }

    accepted
}

/// Whether no two spans in the slice overlap.
#[must_use]
pub fn is_non_overlapping(spans: &[EntitySpan]) -> bool {
    for i in 0..spans.len() {
        for j in (i + 1)..spans.len() {
            if spans[i].overlaps(&spans[j]) {
                return false;
            }
        }
    }
    true
}
