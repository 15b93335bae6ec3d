//! Benchmarks for dictionary matching and overlap resolution.
//!
//! ```bash
//! cargo bench --bench resolve
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polyspan::{resolve_overlaps, DictionaryRegistry, EntitySpan, SpanSource};

/// Spans of varying length packed so that roughly `overlap_ratio` of them
/// collide with their predecessor.
fn generate_spans(count: usize, overlap_ratio: f64) -> Vec<EntitySpan> {
    let mut spans = Vec::with_capacity(count);
    let mut cursor = 0;
    for i in 0..count {
        let len = 3 + (i * 7) % 11;
        let overlapping = (i as f64 * overlap_ratio).fract() + overlap_ratio >= 1.0;
        let start = if overlapping && cursor > 2 {
            cursor - 2
        } else {
            cursor
        };
        spans.push(
            EntitySpan::new("x", start, start + len, "LABEL", SpanSource::Dictionary)
                .expect("generated span is non-empty"),
        );
        cursor = start + len + 1;
    }
    spans
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_overlaps");
    for &count in &[10usize, 100, 1_000] {
        for &ratio in &[0.0, 0.5] {
            let spans = generate_spans(count, ratio);
            group.bench_with_input(
                BenchmarkId::new(format!("overlap_{ratio}"), count),
                &spans,
                |b, spans| b.iter(|| resolve_overlaps(black_box(spans.clone()))),
            );
        }
    }
    group.finish();
}

fn bench_dictionary(c: &mut Criterion) {
    let mut registry = DictionaryRegistry::new();
    registry
        .register_dictionary(
            "LOCATION",
            ["New York", "York", "New York City", "Paris", "São Paulo"],
            true,
        )
        .expect("valid dictionary");
    registry
        .register_dictionary("ORG", ["acme", "acme corp", "globex"], false)
        .expect("valid dictionary");

    let sentence = "Acme Corp opened offices in New York City, Paris and São Paulo. ";
    let mut group = c.benchmark_group("dictionary");
    for &repeat in &[1usize, 10, 100] {
        let text = sentence.repeat(repeat);
        group.bench_with_input(BenchmarkId::new("match_and_resolve", repeat), &text, |b, text| {
            b.iter(|| resolve_overlaps(registry.match_text(black_box(text))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_dictionary);
criterion_main!(benches);
