//! Induced subgraph reconstruction.
//!
//! Given a node set `S` discovered by a traversal, keeps exactly the edges of the full graph
//! with both endpoints in `S`. This is a direct `O(|S|²)` membership test over ordered pairs,
//! not a traversal, and does not depend on BFS depth semantics.

use crate::graph::LinkGraph;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Same shape as the link graph, restricted to one query's node set. Only titles with at
/// least one kept edge appear as keys; neighbor lists are in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryGraph(BTreeMap<String, Vec<String>>);

impl QueryGraph {
    pub fn get(&self, title: &str) -> Option<&Vec<String>> {
        self.0.get(title)
    }

    pub fn has_edge(&self, source: &str, sink: &str) -> bool {
        self.0
            .get(source)
            .is_some_and(|sinks| sinks.iter().any(|s| s == sink))
    }

    pub fn node_count(&self) -> usize {
        self.0.len()
    }

    pub fn edge_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// All edges as `(source, sink)` pairs in key order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(source, sinks)| {
            sinks
                .iter()
                .map(move |sink| (source.as_str(), sink.as_str()))
        })
    }
}

fn connections(source: &str, nodes: &BTreeSet<String>, graph: &LinkGraph) -> Vec<String> {
    let Some(out) = graph.neighbors(source) else {
        return Vec::new();
    };
    nodes
        .iter()
        .filter(|sink| sink.as_str() != source && out.contains(sink.as_str()))
        .cloned()
        .collect()
}

pub fn induce_subgraph(nodes: &BTreeSet<String>, graph: &LinkGraph) -> QueryGraph {
    let mut induced = BTreeMap::new();
    for source in nodes.iter() {
        let sinks = connections(source, nodes, graph);
        if !sinks.is_empty() {
            induced.insert(source.clone(), sinks);
        }
    }
    tracing::debug!(
        "Induced subgraph over {} titles keeps {} of them",
        nodes.len(),
        induced.len()
    );
    QueryGraph(induced)
}

/// [`induce_subgraph`] with the outer loop split across rayon workers. Each worker owns a
/// disjoint set of output keys, so the result is identical to the sequential version.
pub fn induce_subgraph_parallel(nodes: &BTreeSet<String>, graph: &LinkGraph) -> QueryGraph {
    let sources: Vec<&String> = nodes.iter().collect();
    let induced: BTreeMap<String, Vec<String>> = sources
        .par_iter()
        .filter_map(|source| {
            let sinks = connections(source, nodes, graph);
            (!sinks.is_empty()).then(|| ((*source).clone(), sinks))
        })
        .collect();
    QueryGraph(induced)
}
