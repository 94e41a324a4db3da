//! Depth-limited breadth-first extraction of a query tree.
//!
//! The traversal runs over a FIFO queue of `(title, depth)` pairs with the query at depth 0.
//! Titles that are not graph keys are dereferenced through the redirect resolver when they are
//! dequeued; the redirect's traced titles become extra edges of the resolved node. Titles that
//! stay unresolvable are leaves and are dropped.
//!
//! A title is enqueued at most once, and `depth + 1 < max_depth` bounds how far neighbors are
//! followed, so the traversal always terminates. Per-depth counts only include newly
//! discovered titles, which keeps `DepthCounts::total() == visited.len()`.

use crate::{
    config::TraversalConfig,
    diagnostic::Diagnostic,
    graph::LinkGraph,
    redirect::RedirectResolver,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet, HashSet, VecDeque},
    fmt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalOptions {
    pub max_depth: usize,
    /// Stop discovering new titles once this many have been visited.
    pub max_nodes: Option<usize>,
}

impl TraversalOptions {
    pub fn new(max_depth: usize) -> TraversalOptions {
        TraversalOptions {
            max_depth,
            max_nodes: None,
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> TraversalOptions {
        self.max_nodes = Some(max_nodes);
        self
    }
}

impl Default for TraversalOptions {
    fn default() -> Self {
        TraversalOptions::from(&TraversalConfig::default())
    }
}

impl From<&TraversalConfig> for TraversalOptions {
    fn from(config: &TraversalConfig) -> Self {
        TraversalOptions {
            max_depth: config.max_depth,
            max_nodes: config.max_nodes,
        }
    }
}

/// Title to ordered neighbor list, one entry per visited title that resolved into the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryTree(BTreeMap<String, Vec<String>>);

impl QueryTree {
    pub fn get(&self, title: &str) -> Option<&Vec<String>> {
        self.0.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// The tree's keys: every expanded title.
    pub fn node_set(&self) -> BTreeSet<String> {
        self.0.keys().cloned().collect()
    }

    /// The direct neighborhood of `root`, the default scope for an induced subgraph. Empty
    /// when `root` was never expanded.
    pub fn root_scope(&self, root: &str) -> BTreeSet<String> {
        self.0
            .get(root)
            .map(|neighbors| neighbors.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Number of titles first discovered at each depth; index 0 is the query itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthCounts(Vec<usize>);

impl DepthCounts {
    fn root() -> DepthCounts {
        DepthCounts(vec![1])
    }

    fn add(&mut self, depth: usize, discovered: usize) {
        if discovered == 0 {
            return;
        }
        if self.0.len() <= depth {
            self.0.resize(depth + 1, 0);
        }
        self.0[depth] += discovered;
    }

    pub fn get(&self, depth: usize) -> usize {
        self.0.get(depth).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for DepthCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, count) in self.0.iter().enumerate() {
            writeln!(f, "depth: {depth} in nodes {count}")?;
        }
        write!(f, "total nodes: {}", self.total())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    /// The graph title the query resolved to, if it resolved at all.
    pub root: Option<String>,
    pub tree: QueryTree,
    pub depth_counts: DepthCounts,
    /// Titles in discovery order, the query first.
    pub visited: Vec<String>,
    /// Whether the node budget cut the traversal short.
    pub truncated: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl QueryResult {
    /// Node set for the induced subgraph: the root's direct neighborhood.
    pub fn root_scope(&self) -> BTreeSet<String> {
        self.root
            .as_deref()
            .map(|root| self.tree.root_scope(root))
            .unwrap_or_default()
    }
}

/// Runs depth-limited traversals against a shared graph and redirect resolver.
#[derive(Debug, Clone, Copy)]
pub struct QueryExtractor<'a> {
    graph: &'a LinkGraph,
    redirects: &'a RedirectResolver,
    options: TraversalOptions,
}

impl<'a> QueryExtractor<'a> {
    pub fn new(
        graph: &'a LinkGraph,
        redirects: &'a RedirectResolver,
        options: TraversalOptions,
    ) -> QueryExtractor<'a> {
        QueryExtractor {
            graph,
            redirects,
            options,
        }
    }

    pub fn options(&self) -> TraversalOptions {
        self.options
    }

    #[tracing::instrument(skip(self), fields(max_depth = self.options.max_depth))]
    pub fn extract(&self, query: &str) -> QueryResult {
        let mut queue: VecDeque<(String, usize)> = VecDeque::from([(query.to_string(), 0)]);
        let mut seen: HashSet<String> = HashSet::from([query.to_string()]);
        let mut visited = vec![query.to_string()];
        let mut depth_counts = DepthCounts::root();
        let mut tree: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut root = None;
        let mut truncated = false;
        let mut diagnostics = Vec::new();

        while let Some((mut node, depth)) = queue.pop_front() {
            let mut extra_edges = BTreeSet::new();
            if !self.graph.contains_node(&node) {
                let resolution = self.redirects.resolve(&node);
                if resolution.cycle {
                    let diagnostic = Diagnostic::RedirectCycle {
                        entry: resolution.final_target.clone(),
                        members: resolution.traced.iter().cloned().collect(),
                    };
                    if !diagnostics.contains(&diagnostic) {
                        diagnostics.push(diagnostic);
                    }
                }
                // The alias already stands for its target in `visited`.
                seen.insert(resolution.final_target.clone());
                node = resolution.final_target;
                extra_edges = resolution.traced;
            }

            let Some(edges) = self.graph.neighbors(&node) else {
                tracing::trace!("Dropping leaf title '{}'", node);
                continue;
            };
            extra_edges.remove(&node);
            if depth == 0 && root.is_none() {
                root = Some(node.clone());
            }

            let neighbors = tree.entry(node.clone()).or_default();
            neighbors.extend(edges.iter().cloned());
            neighbors.extend(extra_edges.iter().cloned());

            if depth + 1 >= self.options.max_depth || truncated {
                continue;
            }
            let mut discovered = 0;
            for neighbor in edges.iter().chain(extra_edges.iter()) {
                if seen.contains(neighbor) {
                    continue;
                }
                if self
                    .options
                    .max_nodes
                    .is_some_and(|limit| visited.len() >= limit)
                {
                    truncated = true;
                    break;
                }
                seen.insert(neighbor.clone());
                visited.push(neighbor.clone());
                queue.push_back((neighbor.clone(), depth + 1));
                discovered += 1;
            }
            depth_counts.add(depth + 1, discovered);
        }

        if truncated {
            if let Some(limit) = self.options.max_nodes {
                tracing::warn!("Query '{}' stopped at its node budget of {}", query, limit);
                diagnostics.push(Diagnostic::BudgetExhausted { limit });
            }
        }
        tracing::debug!(
            "Query '{}' visited {} titles, expanded {}",
            query,
            visited.len(),
            tree.len()
        );

        QueryResult {
            query: query.to_string(),
            root,
            tree: QueryTree(
                tree.into_iter()
                    .map(|(title, neighbors)| (title, neighbors.into_iter().collect()))
                    .collect(),
            ),
            depth_counts,
            visited,
            truncated,
            diagnostics,
        }
    }

    /// Runs independent queries in parallel. Results come back in the order of `queries`.
    pub fn extract_many<S: AsRef<str> + Sync>(&self, queries: &[S]) -> Vec<QueryResult> {
        queries
            .par_iter()
            .map(|query| self.extract(query.as_ref()))
            .collect()
    }
}
