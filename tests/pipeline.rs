//! Full `Recognizer` runs: dictionaries, cascade, token alignment.

use polyspan::{
    AnnotatedTokenSliceExt, MockClassifier, MockLabeler, Recognizer, SpanSource, Token,
    WhitespaceTokenizer,
};
use std::sync::Arc;

fn labels(tokens: &[polyspan::AnnotatedToken]) -> Vec<(&str, Option<&str>)> {
    tokens
        .iter()
        .map(|t| (t.token.as_str(), t.entity_label.as_deref()))
        .collect()
}

// =============================================================================
// Dictionary + alignment
// =============================================================================

#[test]
fn new_york_city_end_to_end() {
    let mut recognizer = Recognizer::builder().build().unwrap();
    recognizer
        .register_dictionary("LOCATION", ["New York", "York", "New York City"], true)
        .unwrap();

    let text = "I love New York City.";
    let spans = recognizer.extract(text);
    assert_eq!(spans.len(), 1);
    assert_eq!((spans[0].start, spans[0].end), (7, 20));

    let tokens: Vec<Token> = ["I", "love", "New", "York", "City", "."]
        .into_iter()
        .map(Token::from)
        .collect();
    let annotated = recognizer.align(text, &tokens, &spans);
    assert_eq!(
        labels(&annotated),
        vec![
            ("I", None),
            ("love", None),
            ("New", Some("LOCATION")),
            ("York", Some("LOCATION")),
            ("City", Some("LOCATION")),
            (".", None),
        ]
    );
    assert!(annotated[2..5]
        .iter()
        .all(|t| t.entity_text.as_deref() == Some("New York City")));
}

#[test]
fn whitespace_token_glued_to_punctuation_is_not_contained() {
    let mut recognizer = Recognizer::builder()
        .tokenizer(Arc::new(WhitespaceTokenizer))
        .build()
        .unwrap();
    recognizer
        .register_dictionary("LOCATION", ["New York City"], true)
        .unwrap();

    // "City." reaches one char past the span
    let tokens = recognizer.process("I love New York City.");
    assert_eq!(tokens[2].entity_label.as_deref(), Some("LOCATION"));
    assert_eq!(tokens[3].entity_label.as_deref(), Some("LOCATION"));
    assert_eq!(tokens[4].token, "City.");
    assert_eq!(tokens[4].entity_label, None);
}

// =============================================================================
// Cascade + alignment
// =============================================================================

#[test]
fn multilingual_text_with_emoji() {
    let classifier = Arc::new(
        MockClassifier::new()
            .with("Paris", "fr")
            .with("Berlin", "de")
            .with_default("en"),
    );
    let fallback = Arc::new(
        MockLabeler::new("ner")
            .with_term("Paris", "LOCATION", Some(0.8))
            .with_term("Berlin", "LOCATION", Some(0.7)),
    );
    let recognizer = Recognizer::builder()
        .classifier(classifier)
        .fallback(fallback)
        .build()
        .unwrap();

    let tokens = recognizer.process("Paris and Berlin 🎉");
    assert_eq!(tokens.len(), 4);

    assert_eq!(tokens[0].entity_label.as_deref(), Some("LOCATION"));
    assert_eq!(tokens[0].entity_score, Some(0.8));
    assert_eq!(tokens[0].language.as_deref(), Some("fr"));
    assert_eq!(tokens[1].entity_label, None);
    assert_eq!(tokens[1].language.as_deref(), Some("en"));
    assert_eq!(tokens[2].language.as_deref(), Some("de"));

    assert!(tokens[3].is_emoji);
    assert_eq!(tokens[3].language, None);
    assert_eq!(tokens[3].entity_label, None);

    assert_eq!(tokens.entity_distribution()["LOCATION"], 2);
    assert_eq!(tokens.emojis().count(), 1);
}

#[test]
fn extract_merges_dictionary_and_cascade() {
    let external = Arc::new(
        MockLabeler::new("ner")
            .with_term("Apple", "ORG", Some(0.9))
            .with_term("Tim Cook", "PER", Some(0.9)),
    );
    let mut recognizer = Recognizer::builder().external(external).build().unwrap();
    recognizer
        .register_dictionary("PRODUCT", ["Apple Watch"], true)
        .unwrap();

    let spans = recognizer.extract("Tim Cook wears an Apple Watch");
    let got: Vec<_> = spans
        .iter()
        .map(|s| (s.text.as_str(), s.label.as_str(), s.source))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Tim Cook", "PER", SpanSource::ExternalLabeler),
            ("Apple Watch", "PRODUCT", SpanSource::Dictionary),
        ]
    );
}

#[test]
fn normalized_tokens() {
    let recognizer = Recognizer::builder().build().unwrap();
    let tokens = recognizer.process("Café MÜNCHEN naïve 😀");
    let normalized: Vec<_> = tokens.iter().map(|t| t.normalized_token.as_str()).collect();
    assert_eq!(normalized, vec!["cafe", "munchen", "naive", "😀"]);
}

// =============================================================================
// Empty input
// =============================================================================

#[test]
fn empty_input_makes_no_collaborator_calls() {
    let external = Arc::new(MockLabeler::new("ext"));
    let fallback = Arc::new(MockLabeler::new("fb"));
    let classifier = Arc::new(MockClassifier::new().with_default("en"));
    let recognizer = Recognizer::builder()
        .external(external.clone())
        .routed("en", Arc::new(MockLabeler::new("en")))
        .fallback(fallback.clone())
        .classifier(classifier.clone())
        .build()
        .unwrap();

    assert!(recognizer.process("").is_empty());
    assert!(recognizer.extract("").is_empty());
    assert!(recognizer.recognize_multilingual("", 0.5).is_empty());
    assert!(recognizer.recognize("   ").spans.is_empty());

    assert_eq!(external.calls(), 0);
    assert_eq!(fallback.calls(), 0);
    assert_eq!(classifier.calls(), 0);
}

#[test]
fn no_strategies_yields_only_dictionary_spans() {
    let mut recognizer = Recognizer::builder().build().unwrap();
    assert!(recognizer.cascade().is_empty());
    recognizer.register_dictionary("ORG", ["ACME"], false).unwrap();

    let tokens = recognizer.process("acme rocks");
    assert_eq!(tokens[0].entity_label.as_deref(), Some("ORG"));
    assert_eq!(tokens[1].entity_label, None);
}
