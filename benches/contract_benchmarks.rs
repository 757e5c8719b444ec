//! Benchmarks for verdict derivation, validation and summarizing.

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use std::hint::black_box;

use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use credibility_analyzer::contract::{
    summarize, validate_input, validate_result, AnalysisResult, Document, InputType, Verdict,
};
use credibility_analyzer::providers::{high_credibility, HeuristicProvider};

fn bench_verdict(c: &mut Criterion) {
    c.bench_function("verdict_from_score", |b| {
        b.iter(|| {
            for i in 0..=100 {
                black_box(Verdict::from_score(black_box(f64::from(i) / 100.0)));
            }
        });
    });
}

fn bench_validation(c: &mut Criterion) {
    let result = AnalysisResult::from_assessment(high_credibility());
    c.bench_function("validate_result", |b| {
        b.iter(|| validate_result(black_box(&result)));
    });

    c.bench_function("validate_input_url", |b| {
        b.iter(|| {
            validate_input(
                black_box("https://example.com/news/2024/local-election"),
                InputType::Url,
            )
        });
    });
}

fn bench_summarize(c: &mut Criterion) {
    let text = "Scientists at the national laboratory published a peer-reviewed study ".repeat(40);
    let document = Document::from_text(text);
    let result = AnalysisResult::from_assessment(high_credibility());
    let now = Utc::now();

    c.bench_function("summarize_text", |b| {
        b.iter(|| summarize("bench".to_string(), now, black_box(&document), &result));
    });
}

fn bench_heuristic(c: &mut Criterion) {
    let text = "Shocking secret the experts don't want you to know, according to a study ".repeat(50);
    c.bench_function("heuristic_score_text", |b| {
        b.iter(|| HeuristicProvider::score_text(black_box(&text)));
    });
}

criterion_group!(
    benches,
    bench_verdict,
    bench_validation,
    bench_summarize,
    bench_heuristic
);
criterion_main!(benches);
