//! Tests for query traversal and induced subgraphs

use super::helpers::*;
use crate::{
    diagnostic::Diagnostic,
    document::Document,
    graph::LinkGraph,
    query::{
        induce_subgraph, induce_subgraph_parallel, query_graph_path, query_tree_path,
        QueryExtractor, TraversalOptions,
    },
    redirect::RedirectResolver,
};
use std::{collections::BTreeSet, path::Path};
use test_log::test;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn xyz() -> (RedirectResolver, LinkGraph) {
    build_pipeline(&[
        Document::new("X", "[[Y]] [[Z|alias]]"),
        Document::new("Y", "#redirect Z"),
        Document::new("Z", "[[X]]"),
    ])
}

#[test]
fn test_extract_follows_redirects() {
    let (redirects, graph) = xyz();
    let result = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(2)).extract("X");

    assert_eq!(result.root.as_deref(), Some("X"));
    assert_eq!(result.visited, vec!["X", "Y", "Z"]);
    assert_eq!(result.depth_counts.as_slice(), &[1, 2]);
    assert_eq!(result.tree.get("X"), Some(&vec!["Y".to_string(), "Z".to_string()]));
    // Y dereferences to Z, whose entry gains the alias as an extra edge
    assert_eq!(result.tree.get("Z"), Some(&vec!["X".to_string(), "Y".to_string()]));
    assert!(!result.tree.contains("Y"));
    assert!(!result.truncated);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_depth_counts_sum_to_visited() {
    let (redirects, graph) = build_pipeline(&sample_corpus());
    for max_depth in 0..5 {
        let extractor = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(max_depth));
        for query in ["아이오아이", "IOI", "걸그룹", "없는 문서", "ioi.jpg"] {
            let result = extractor.extract(query);
            assert_eq!(
                result.depth_counts.total(),
                result.visited.len(),
                "query {query} at depth {max_depth}"
            );
            let unique: BTreeSet<&String> = result.visited.iter().collect();
            assert_eq!(unique.len(), result.visited.len());
        }
    }
}

#[test]
fn test_shallow_depths_expand_only_the_root() {
    let (redirects, graph) = xyz();
    for max_depth in [0, 1] {
        let result =
            QueryExtractor::new(&graph, &redirects, TraversalOptions::new(max_depth)).extract("X");
        assert_eq!(result.tree.node_set(), set(&["X"]));
        assert_eq!(result.visited, vec!["X"]);
        assert_eq!(result.depth_counts.as_slice(), &[1]);
        assert_eq!(result.root_scope(), set(&["Y", "Z"]));
    }
}

#[test]
fn test_extract_redirect_query() {
    let (redirects, graph) = build_pipeline(&sample_corpus());
    let result = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(2)).extract("IOI");

    assert_eq!(result.root.as_deref(), Some("아이오아이"));
    assert_eq!(result.depth_counts.as_slice(), &[1, 4]);
    let root_neighbors = result.tree.get("아이오아이").expect("root expanded");
    assert!(root_neighbors.contains(&"IOI".to_string()));
    assert!(root_neighbors.contains(&"I.O.I".to_string()));
    assert!(root_neighbors.contains(&"프로듀스 101".to_string()));
    assert_eq!(
        result.tree.node_set(),
        set(&["걸그룹", "아이오아이", "프로듀스 101"])
    );
    // categories never become graph keys, so they stay leaves
    assert!(result.visited.contains(&"한국의 걸그룹".to_string()));
    assert!(!result.tree.contains("한국의 걸그룹"));
}

#[test]
fn test_resolved_root_is_not_rediscovered() {
    let (redirects, graph) = build_pipeline(&[
        Document::new("Alias", "#redirect T"),
        Document::new("T", "[[N]]"),
        Document::new("N", "[[T]]"),
    ]);
    let result =
        QueryExtractor::new(&graph, &redirects, TraversalOptions::new(3)).extract("Alias");
    assert_eq!(result.root.as_deref(), Some("T"));
    assert_eq!(result.visited, vec!["Alias", "N"]);
    assert_eq!(result.depth_counts.as_slice(), &[1, 1]);
    assert_eq!(result.tree.node_set(), set(&["N", "T"]));
}

#[test]
fn test_extract_unknown_query() {
    let (redirects, graph) = xyz();
    let result =
        QueryExtractor::new(&graph, &redirects, TraversalOptions::new(3)).extract("nowhere");
    assert_eq!(result.root, None);
    assert!(result.tree.is_empty());
    assert_eq!(result.visited, vec!["nowhere"]);
    assert_eq!(result.depth_counts.total(), 1);
    assert!(result.root_scope().is_empty());
}

#[test]
fn test_extract_is_deterministic() {
    let (redirects, graph) = build_pipeline(&sample_corpus());
    let extractor = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(3));
    assert_eq!(extractor.extract("걸그룹"), extractor.extract("걸그룹"));

    let queries = ["걸그룹", "IOI", "프로듀스 101"];
    let batch = extractor.extract_many(&queries);
    let single: Vec<_> = queries.iter().map(|q| extractor.extract(q)).collect();
    assert_eq!(batch, single);
}

#[test]
fn test_extract_respects_node_budget() {
    let graph = LinkGraph::from_edges((0..10).map(|i| ("Hub".to_string(), format!("N{i}"))));
    let redirects = RedirectResolver::new();
    let options = TraversalOptions::new(2).with_max_nodes(4);
    let result = QueryExtractor::new(&graph, &redirects, options).extract("Hub");

    assert!(result.truncated);
    assert_eq!(result.visited, vec!["Hub", "N0", "N1", "N2"]);
    assert_eq!(result.depth_counts.as_slice(), &[1, 3]);
    assert_eq!(result.depth_counts.total(), result.visited.len());
    assert_eq!(result.diagnostics, vec![Diagnostic::BudgetExhausted { limit: 4 }]);
    // the root's own neighbor list is still complete
    assert_eq!(result.tree.get("Hub").map(Vec::len), Some(10));
}

#[test]
fn test_extract_reports_redirect_cycles() {
    let (redirects, graph) = build_pipeline(&[
        Document::new("Hub", "[[Loop]] [[B]]"),
        Document::new("Loop", "#redirect Back"),
        Document::new("Back", "#redirect Loop"),
        Document::new("B", "[[Hub]]"),
    ]);
    let result = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(3)).extract("Hub");
    assert_eq!(result.depth_counts.total(), result.visited.len());
    assert!(result
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::RedirectCycle { .. })));
}

#[test]
fn test_depth_counts_display() {
    let (redirects, graph) = xyz();
    let result = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(2)).extract("X");
    assert_eq!(
        result.depth_counts.to_string(),
        "depth: 0 in nodes 1\ndepth: 1 in nodes 2\ntotal nodes: 3"
    );
}

#[test]
fn test_induced_subgraph_keeps_only_internal_edges() {
    let graph = LinkGraph::from_edges([
        ("A", "B"),
        ("B", "C"),
        ("C", "A"),
        ("A", "D"),
        ("D", "A"),
    ]);
    let induced = induce_subgraph(&set(&["A", "B", "C"]), &graph);
    assert_eq!(induced.edge_count(), 3);
    assert_eq!(
        induced.edges().collect::<Vec<_>>(),
        vec![("A", "B"), ("B", "C"), ("C", "A")]
    );
    assert!(!induced.has_edge("A", "D"));

    assert!(induce_subgraph(&BTreeSet::new(), &graph).is_empty());
    assert!(induce_subgraph(&set(&["Z"]), &graph).is_empty());
}

#[test]
fn test_induced_subgraph_of_query() {
    let (redirects, graph) = xyz();
    let result = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(2)).extract("X");
    let induced = induce_subgraph(&result.tree.node_set(), &graph);
    assert!(induced.has_edge("X", "Z"));
    assert!(induced.has_edge("Z", "X"));
    assert_eq!(induced.node_count(), 2);
}

#[test]
fn test_parallel_subgraph_matches_sequential() {
    let (redirects, graph) = build_pipeline(&sample_corpus());
    let result = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(3)).extract("IOI");
    let nodes: BTreeSet<String> = result.visited.iter().cloned().collect();
    assert_eq!(
        induce_subgraph(&nodes, &graph),
        induce_subgraph_parallel(&nodes, &graph)
    );
}

#[test]
fn test_query_artifact_paths() {
    let dir = Path::new("out");
    assert_eq!(query_tree_path(dir, "아이오아이"), dir.join("아이오아이.json"));
    assert_eq!(
        query_graph_path(dir, "AC/DC"),
        dir.join("AC_DC_graph.json")
    );
}
