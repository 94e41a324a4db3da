//! # wikigraph
//!
//! Link-graph extraction, redirect resolution and query-centered subgraphs for wiki markup
//! dumps.
//!
//! ## Overview
//!
//! wikigraph reads a (possibly multi-gigabyte) dump of `{title, text}` documents written in
//! namuwiki-style markup and turns it into a directed link graph between titles. Redirect
//! documents are folded into the graph so that every alias of a page links to the same
//! neighborhood. Given a query title, a depth-limited breadth-first traversal extracts the
//! titles around it, and an induced subgraph shows how those titles connect to each other.
//!
//! ## Pipeline
//!
//! 1. **[`markup`]**: `MarkupParser` extracts normalized link sets, plain text and hierarchy
//!    metadata from one document's markup
//! 2. **[`redirect`]**: `RedirectResolver` records `title -> target` redirects from a scan of
//!    the dump and follows redirect chains with an explicit cycle guard
//! 3. **[`graph`]**: `GraphBuilder` produces the global [`graph::LinkGraph`], sequentially or
//!    with rayon workers merging partial graphs
//! 4. **[`query::bfs`]**: `QueryExtractor` runs the depth-limited traversal and returns a
//!    [`query::QueryTree`] plus per-depth discovery counts
//! 5. **[`query::subgraph`]**: `induce_subgraph` keeps the graph edges among a discovered
//!    node set
//!
//! Supporting modules: [`document`] (streaming dump readers), [`corpus`] (plain-text corpus
//! export), [`config`] (TOML configuration), [`diagnostic`] (batch totals and skipped-record
//! reporting) and [`error`].
//!
//! ## Quick Start
//!
//! ```rust
//! use wikigraph::{
//!     config::GraphConfig,
//!     document::Document,
//!     graph::GraphBuilder,
//!     markup::MarkupParser,
//!     query::{induce_subgraph, QueryExtractor, TraversalOptions},
//!     redirect::RedirectResolver,
//! };
//!
//! # fn main() -> Result<(), wikigraph::WikiGraphError> {
//! let config = GraphConfig::default();
//! let parser = MarkupParser::new(&config)?;
//! let docs = vec![
//!     Document::new("X", "[[Y]] [[Z|alias]]"),
//!     Document::new("Y", "#redirect Z"),
//!     Document::new("Z", "[[X]]"),
//! ];
//!
//! // Redirects first: the graph builder expands links through them.
//! let (redirects, _scan) = RedirectResolver::from_documents(docs.iter().cloned().map(Ok), &parser)?;
//! let (graph, _stats) = GraphBuilder::new(&parser, &redirects).build(docs.into_iter().map(Ok))?;
//! assert!(graph.has_edge("X", "Z"));
//!
//! let result = QueryExtractor::new(&graph, &redirects, TraversalOptions::new(2)).extract("X");
//! assert_eq!(result.depth_counts.total(), result.visited.len());
//!
//! let query_graph = induce_subgraph(&result.tree.node_set(), &graph);
//! assert!(query_graph.has_edge("Z", "X"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Tolerance
//!
//! Batch stages never stop on a single bad record. Records missing a field and unparseable
//! table lines are counted and skipped (see [`diagnostic`]); unresolvable link targets are
//! simply leaves; redirect cycles end resolution at the cycle's entry point. Only a missing
//! dump or graph artifact is fatal.
//!
//! ## Features
//!
//! - **default**: the library
//! - **bin**: the `wikigraph` command-line tool

pub mod config;
pub mod corpus;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod graph;
pub mod markup;
pub mod query;
pub mod redirect;
#[cfg(test)]
mod tests;

pub use error::*;
