//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::{Path, PathBuf};
use wikigraph::document::Document;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A small dump: a redirect chain into `아이오아이`, a media page, a category link and an
/// untitled record.
#[allow(dead_code)]
pub fn fixture_documents() -> Vec<Document> {
    vec![
        Document::new(
            "아이오아이",
            " * 상위 문서 : [[프로듀스 101]]\n'''아이오아이'''는 [[걸그룹]]이다.\n[[분류:한국의 걸그룹]]",
        ),
        Document::new("I.O.I", "#redirect 아이오아이"),
        Document::new("IOI", "#redirect I.O.I"),
        Document::new("프로듀스 101", "[[IOI]] 를 배출한 [[서바이벌 프로그램]]."),
        Document::new("걸그룹", "여성 [[아이돌]] 그룹. [[IOI]]"),
        Document::new("아이돌", "[[걸그룹]] 과 보이그룹."),
        Document::new("ioi.jpg", "[[아이오아이]]"),
        Document::new("", "[[고아 링크]]"),
    ]
}

/// Writes documents as a single JSON array dump.
#[allow(dead_code)]
pub fn write_json_array(dir: &Path, name: &str, docs: &[Document]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(docs).unwrap()).unwrap();
    path
}

/// Writes documents as a JSON Lines dump.
#[allow(dead_code)]
pub fn write_json_lines(dir: &Path, name: &str, docs: &[Document]) -> PathBuf {
    let path = dir.join(name);
    let lines: Vec<String> = docs
        .iter()
        .map(|doc| serde_json::to_string(doc).unwrap())
        .collect();
    std::fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}
