//! Query-centered extraction over a built [`LinkGraph`](crate::graph::LinkGraph).
//!
//! - [`bfs`]: depth-limited breadth-first traversal producing a [`QueryTree`]
//! - [`subgraph`]: induced subgraph over a discovered node set, producing a [`QueryGraph`]
//!
//! Both stages only read the graph and the redirect resolver, so independent queries can run
//! concurrently against the same shared references.

pub mod bfs;
pub mod subgraph;

pub use bfs::{DepthCounts, QueryExtractor, QueryResult, QueryTree, TraversalOptions};
pub use subgraph::{induce_subgraph, induce_subgraph_parallel, QueryGraph};

use crate::error::WikiGraphError;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// File stem used for a query's persisted artifacts. Path separators are replaced so any title
/// maps to a single file inside the output directory.
pub fn query_file_stem(query: &str) -> String {
    query
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// `<dir>/<query>.json`
pub fn query_tree_path<P: AsRef<Path>>(dir: P, query: &str) -> PathBuf {
    dir.as_ref().join(format!("{}.json", query_file_stem(query)))
}

/// `<dir>/<query>_graph.json`
pub fn query_graph_path<P: AsRef<Path>>(dir: P, query: &str) -> PathBuf {
    dir.as_ref()
        .join(format!("{}_graph.json", query_file_stem(query)))
}

/// Writes a query artifact as indented JSON, the inspectable form of trees and query graphs.
pub fn save_pretty<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), WikiGraphError> {
    tracing::debug!("Writing {:?}", path.as_ref());
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Human-readable indented rendering of a query artifact.
pub fn to_pretty_text<T: Serialize>(value: &T) -> Result<String, WikiGraphError> {
    Ok(serde_json::to_string_pretty(value)?)
}
