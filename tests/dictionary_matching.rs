//! Dictionary registration, matching and overlap resolution end to end.

use polyspan::{resolve_overlaps, DictionaryRegistry, EntitySpanSliceExt, Error, SpanSource};

fn registry(entries: &[(&str, &[&str], bool)]) -> DictionaryRegistry {
    let mut registry = DictionaryRegistry::new();
    for (entity_type, terms, case_sensitive) in entries {
        registry
            .register_dictionary(*entity_type, terms.iter().copied(), *case_sensitive)
            .unwrap();
    }
    registry
}

// =============================================================================
// Matching
// =============================================================================

#[test]
fn longest_location_wins() {
    let registry = registry(&[("LOCATION", &["New York", "York", "New York City"], true)]);
    let text = "I love New York City.";

    let raw = registry.match_text(text);
    assert_eq!(raw.len(), 3);
    assert!(raw.has_overlaps());

    let resolved = resolve_overlaps(raw);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].text, "New York City");
    assert_eq!((resolved[0].start, resolved[0].end), (7, 20));
    assert_eq!(resolved[0].label, "LOCATION");
    assert_eq!(resolved[0].source, SpanSource::Dictionary);
    assert_eq!(resolved[0].score, None);
}

#[test]
fn case_sensitivity_is_per_entity_type() {
    let registry = registry(&[
        ("PRODUCT", &["iPhone"], true),
        ("COMPANY", &["apple"], false),
    ]);
    let text = "IPHONE by APPLE, iPhone by Apple";

    let spans = resolve_overlaps(registry.match_text(text));
    let got: Vec<_> = spans
        .iter()
        .map(|s| (s.text.as_str(), s.label.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("APPLE", "COMPANY"),
            ("iPhone", "PRODUCT"),
            ("Apple", "COMPANY"),
        ]
    );
}

#[test]
fn matched_text_keeps_original_casing() {
    let registry = registry(&[("CITY", &["zürich"], false)]);
    let spans = registry.match_text("Flights to ZÜRICH and Zürich");
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].text, "ZÜRICH");
    assert_eq!((spans[0].start, spans[0].end), (11, 17));
    assert_eq!(spans[1].text, "Zürich");
}

#[test]
fn offsets_are_chars_not_bytes() {
    let registry = registry(&[("FOOD", &["croissant"], true)]);
    let text = "🥐🥐 croissant";
    let spans = registry.match_text(text);
    assert_eq!((spans[0].start, spans[0].end), (3, 12));
}

#[test]
fn repeated_occurrences_all_reported() {
    let registry = registry(&[("ORG", &["UN"], true)]);
    let spans = registry.match_text("UN meets UN");
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[1].start, 9);
}

#[test]
fn nothing_registered_or_empty_text() {
    assert!(DictionaryRegistry::new().match_text("anything").is_empty());
    let registry = registry(&[("ORG", &["UN"], true)]);
    assert!(registry.match_text("").is_empty());
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn reregistering_replaces_terms() {
    let mut registry = registry(&[("ORG", &["Acme"], true)]);
    registry.register_dictionary("ORG", ["Globex"], true).unwrap();

    assert_eq!(registry.len(), 1);
    assert!(registry.match_text("Acme").is_empty());
    assert_eq!(registry.match_text("Globex").len(), 1);
}

#[test]
fn invalid_registration_leaves_registry_unchanged() {
    let mut registry = registry(&[("ORG", &["Acme"], true)]);

    let err = registry.register_dictionary("ORG", ["Globex", ""], true).unwrap_err();
    assert!(matches!(err, Error::InvalidDictionary(_)));
    assert!(registry
        .register_dictionary("  ", ["x"], true)
        .is_err());

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.match_text("Acme").len(), 1);
}

#[test]
fn empty_term_list_is_allowed() {
    let mut registry = DictionaryRegistry::new();
    registry
        .register_dictionary("EMPTY", Vec::<String>::new(), true)
        .unwrap();
    assert_eq!(registry.len(), 1);
    assert!(registry.match_text("anything").is_empty());
}
