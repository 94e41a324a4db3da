//! Shared fixtures for unit tests

use crate::{
    config::GraphConfig,
    document::Document,
    error::WikiGraphError,
    graph::{GraphBuilder, LinkGraph},
    markup::MarkupParser,
    redirect::RedirectResolver,
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn default_parser() -> MarkupParser {
    MarkupParser::new(&GraphConfig::default()).expect("default config compiles")
}

pub fn ok_docs(docs: &[Document]) -> Vec<Result<Document, WikiGraphError>> {
    docs.iter().cloned().map(Ok).collect()
}

/// Runs the redirect scan and a sequential build over the same documents.
pub fn build_pipeline(docs: &[Document]) -> (RedirectResolver, LinkGraph) {
    init_logging();
    let parser = default_parser();
    let (redirects, _) =
        RedirectResolver::from_documents(ok_docs(docs), &parser).expect("redirect scan");
    let (graph, _) = GraphBuilder::new(&parser, &redirects)
        .build(ok_docs(docs))
        .expect("graph build");
    (redirects, graph)
}

/// A small namuwiki-flavoured corpus with a redirect chain, a media page and a category.
pub fn sample_corpus() -> Vec<Document> {
    vec![
        Document::new(
            "아이오아이",
            "[include(틀:아이오아이)]\n'''아이오아이'''는 [[프로듀스 101]]에서 결성된 [[걸그룹]]이다.\n\
             [[파일:ioi.jpg]]\n[[분류:한국의 걸그룹]]\n[[https://example.com|공식 사이트]]",
        ),
        Document::new("I.O.I", "#redirect 아이오아이"),
        Document::new("IOI", "#redirect I.O.I"),
        Document::new(
            "프로듀스 101",
            "[[IOI]] 를 배출한 [[서바이벌 프로그램]]. [[Mnet|엠넷]] 방영.",
        ),
        Document::new("걸그룹", "여성 [[아이돌]] 그룹. [[IOI]]"),
        Document::new("ioi.jpg", "[[아이오아이]]"),
        Document::new("서바이벌 프로그램", "경쟁 형식의 방송."),
        Document::new("", "[[고아 링크]]"),
    ]
}
