//! The global link graph and its builder.
//!
//! - [`LinkGraph`]: directed adjacency map `title -> set of linked titles`
//! - [`GraphBuilder`]: turns a document stream into a [`LinkGraph`], sequentially or in parallel

mod builder;

pub use builder::GraphBuilder;

use crate::error::WikiGraphError;
use serde::{Deserialize, Serialize};
use std::{
    collections::{btree_map::Entry, BTreeMap, BTreeSet},
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Directed adjacency map keyed by title.
///
/// A title that is not a key has no known outbound links, though it may still appear as a
/// neighbor of other titles. Duplicate edges collapse by set semantics. Serializes as a JSON
/// object mapping each title to the list of its neighbors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkGraph(BTreeMap<String, BTreeSet<String>>);

impl LinkGraph {
    pub fn new() -> LinkGraph {
        LinkGraph::default()
    }

    pub fn from_edges<I, S, T>(edges: I) -> LinkGraph
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut graph = LinkGraph::new();
        for (source, sink) in edges {
            graph.insert_links(source.into(), std::iter::once(sink.into()));
        }
        graph
    }

    /// Unions `links` into the neighbor set of `title`.
    pub fn insert_links<I>(&mut self, title: String, links: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.0.entry(title).or_default().extend(links);
    }

    pub fn contains_node(&self, title: &str) -> bool {
        self.0.contains_key(title)
    }

    pub fn neighbors(&self, title: &str) -> Option<&BTreeSet<String>> {
        self.0.get(title)
    }

    pub fn has_edge(&self, source: &str, sink: &str) -> bool {
        self.0
            .get(source)
            .is_some_and(|neighbors| neighbors.contains(sink))
    }

    /// Number of titles with outbound links.
    pub fn node_count(&self) -> usize {
        self.0.len()
    }

    pub fn edge_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.0.iter()
    }

    pub fn titles(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Per-key set union of two graphs. Commutative, so partial graphs can be merged in any
    /// completion order.
    pub fn union(self, other: LinkGraph) -> LinkGraph {
        let (mut larger, smaller) = if self.0.len() >= other.0.len() {
            (self, other)
        } else {
            (other, self)
        };
        for (title, links) in smaller.0 {
            match larger.0.entry(title) {
                Entry::Vacant(e) => {
                    e.insert(links);
                }
                Entry::Occupied(mut e) => e.get_mut().extend(links),
            }
        }
        larger
    }

    /// Loads a persisted graph. A missing file is fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<LinkGraph, WikiGraphError> {
        tracing::debug!("Loading graph from {:?}", path.as_ref());
        let file = File::open(path.as_ref()).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => WikiGraphError::NotFound(format!(
                "graph artifact {} does not exist",
                path.as_ref().display()
            )),
            _ => e.into(),
        })?;
        let graph: LinkGraph = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| WikiGraphError::Serialization(format!("graph artifact: {e}")))?;
        Ok(graph)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WikiGraphError> {
        tracing::debug!("Saving graph to {:?}", path.as_ref());
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl FromIterator<(String, BTreeSet<String>)> for LinkGraph {
    fn from_iter<I: IntoIterator<Item = (String, BTreeSet<String>)>>(iter: I) -> Self {
        let mut graph = LinkGraph::new();
        for (title, links) in iter {
            graph.insert_links(title, links);
        }
        graph
    }
}
