use bardsearch_core::scoring::{Bm25, QueryLikelihood, Scorer};
use bardsearch_core::tokenizer::tokenize;
use bardsearch_core::{build_index, Document, QueryTerms};
use criterion::{criterion_group, criterion_main, Criterion};

fn corpus() -> Vec<Document> {
    let text = include_str!("../src/scoring/mod.rs");
    text.lines()
        .collect::<Vec<_>>()
        .chunks(4)
        .enumerate()
        .map(|(i, lines)| Document::new(format!("chunk:{i}"), lines.join(" ")))
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let text = include_str!("../src/index.rs");
    c.bench_function("tokenize_source", |b| b.iter(|| tokenize(text)));
}

fn bench_build(c: &mut Criterion) {
    let docs = corpus();
    c.bench_function("build_index", |b| b.iter(|| build_index(&docs).unwrap()));
}

fn bench_score(c: &mut Criterion) {
    let (index, stats) = build_index(&corpus()).unwrap();
    let query: QueryTerms = ["score", "index", "query", "fn"].into_iter().collect();
    c.bench_function("bm25", |b| b.iter(|| Bm25::default().score(&index, &stats, &query).unwrap()));
    c.bench_function("ql", |b| b.iter(|| QueryLikelihood::default().score(&index, &stats, &query).unwrap()));
}

criterion_group!(benches, bench_tokenize, bench_build, bench_score);
criterion_main!(benches);
