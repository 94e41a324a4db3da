//! Performance benchmarks for graph processing
//!
//! Measures the stages over a synthetic corpus with redirect chains:
//! - Link extraction from markup
//! - Sequential vs. parallel graph builds
//! - Depth-limited query extraction and induced subgraphs
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use wikigraph::{
    config::GraphConfig,
    document::Document,
    graph::{GraphBuilder, LinkGraph},
    markup::MarkupParser,
    query::{induce_subgraph, induce_subgraph_parallel, QueryExtractor, TraversalOptions},
    redirect::RedirectResolver,
};

const DOCUMENTS: usize = 5_000;

// Every tenth title is a redirect to its successor, so builds exercise expansion.
fn synthetic_corpus(size: usize) -> Vec<Document> {
    (0..size)
        .map(|i| {
            let title = format!("문서 {i}");
            if i % 10 == 0 {
                return Document::new(title, format!("#redirect 문서 {}", (i + 1) % size));
            }
            let text = format!(
                "'''{title}'''는 [[문서 {}]]와 [[문서 {}|관련 문서]]를 참고한다.\n\
                 [[파일:image{i}.png]] [[분류:분류 {}]] [[https://example.com/{i}|링크]]\n\
                 || 표 || [[문서 {}]] ||",
                (i * 7 + 3) % size,
                (i * 13 + 10) % size,
                i % 50,
                (i + 100) % size,
            );
            Document::new(title, text)
        })
        .collect()
}

fn setup() -> (MarkupParser, Vec<Document>, RedirectResolver) {
    let parser = MarkupParser::new(&GraphConfig::default()).unwrap();
    let docs = synthetic_corpus(DOCUMENTS);
    let (redirects, _) =
        RedirectResolver::from_documents(docs.iter().cloned().map(Ok), &parser).unwrap();
    (parser, docs, redirects)
}

fn bench_extract_links(c: &mut Criterion) {
    let (parser, docs, _) = setup();
    c.bench_function("extract_links", |b| {
        b.iter(|| {
            docs.iter()
                .map(|doc| parser.extract_links(&doc.text).len())
                .sum::<usize>()
        });
    });
}

fn bench_graph_build(c: &mut Criterion) {
    let (parser, docs, redirects) = setup();
    let builder = GraphBuilder::new(&parser, &redirects);

    c.bench_function("graph_build_sequential", |b| {
        b.iter(|| {
            let (graph, _) = builder.build(docs.iter().cloned().map(Ok)).unwrap();
            graph.edge_count()
        });
    });
    c.bench_function("graph_build_parallel", |b| {
        b.iter(|| {
            let (graph, _) = builder
                .build_parallel(docs.clone().into_iter().map(Ok))
                .unwrap();
            graph.edge_count()
        });
    });
}

fn bench_queries(c: &mut Criterion) {
    let (parser, docs, redirects) = setup();
    let (graph, _): (LinkGraph, _) = GraphBuilder::new(&parser, &redirects)
        .build(docs.into_iter().map(Ok))
        .unwrap();

    let mut group = c.benchmark_group("query");
    for depth in [1, 2, 3] {
        let extractor = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(depth));
        group.bench_with_input(BenchmarkId::new("extract", depth), &depth, |b, _| {
            b.iter(|| extractor.extract("문서 0").visited.len());
        });

        let nodes = extractor.extract("문서 0").tree.node_set();
        group.bench_with_input(BenchmarkId::new("induce", depth), &depth, |b, _| {
            b.iter(|| induce_subgraph(&nodes, &graph).edge_count());
        });
        group.bench_with_input(BenchmarkId::new("induce_parallel", depth), &depth, |b, _| {
            b.iter(|| induce_subgraph_parallel(&nodes, &graph).edge_count());
        });
    }
    group.finish();
}

// Benchmark group configuration
criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20);
    targets =
        bench_extract_links,
        bench_graph_build,
        bench_queries
}

criterion_main!(benches);
