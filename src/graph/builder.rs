use super::LinkGraph;
use crate::{
    diagnostic::{BuildStats, Diagnostic},
    document::Document,
    error::WikiGraphError,
    markup::{LinkSet, MarkupParser},
    redirect::RedirectResolver,
};
use rayon::prelude::*;

/// Builds the global [`LinkGraph`] from a document stream.
///
/// The redirect resolver must already be complete: every authored link that is a redirect
/// source also links every title traced on its redirect chain. The chain's final target is not
/// added unless the document links it directly.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    parser: &'a MarkupParser,
    redirects: &'a RedirectResolver,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(parser: &'a MarkupParser, redirects: &'a RedirectResolver) -> GraphBuilder<'a> {
        GraphBuilder { parser, redirects }
    }

    /// Classifies one document and returns its node title and expanded outbound links, or
    /// `None` when it contributes no node.
    pub fn document_links(
        &self,
        doc: &Document,
        stats: &mut BuildStats,
    ) -> Option<(String, LinkSet)> {
        stats.documents += 1;
        let title = self.parser.normalize_title(&doc.title);
        if title.is_empty() {
            stats.skipped_untitled += 1;
            return None;
        }
        if self.parser.is_media_title(&title) {
            stats.skipped_media += 1;
            return None;
        }

        let mut linked = LinkSet::new();
        for link in self.parser.extract_links(&doc.text) {
            if self.redirects.is_redirect(&link) {
                let resolution = self.redirects.resolve(&link);
                if resolution.cycle {
                    stats.record(Diagnostic::RedirectCycle {
                        entry: resolution.final_target.clone(),
                        members: resolution.traced.iter().cloned().collect(),
                    });
                }
                stats.redirect_expansions += 1;
                linked.extend(resolution.traced.iter().cloned());
            }
            linked.insert(link);
        }
        linked.remove(&title);

        if linked.is_empty() {
            stats.skipped_linkless += 1;
            tracing::trace!("'{}' has no outbound links", title);
            return None;
        }
        Some((title, linked))
    }

    pub fn add_document(&self, graph: &mut LinkGraph, doc: &Document, stats: &mut BuildStats) {
        if let Some((title, links)) = self.document_links(doc, stats) {
            graph.insert_links(title, links);
        }
    }

    /// Single pass, in-order build.
    #[tracing::instrument(skip_all)]
    pub fn build<I>(&self, documents: I) -> Result<(LinkGraph, BuildStats), WikiGraphError>
    where
        I: IntoIterator<Item = Result<Document, WikiGraphError>>,
    {
        let mut graph = LinkGraph::new();
        let mut stats = BuildStats::default();
        for item in documents {
            match item {
                Ok(doc) => self.add_document(&mut graph, &doc, &mut stats),
                Err(e) if e.is_recoverable() => stats.record_malformed(&e),
                Err(e) => return Err(e),
            }
        }
        Ok(Self::finish(graph, stats))
    }

    /// Parallel build: rayon workers fold partial graphs which are then merged by per-key set
    /// union. The result equals [`GraphBuilder::build`] over the same documents.
    ///
    /// Runs on the current rayon pool; wrap the call in `ThreadPool::install` to bound it.
    #[tracing::instrument(skip_all)]
    pub fn build_parallel<I>(&self, documents: I) -> Result<(LinkGraph, BuildStats), WikiGraphError>
    where
        I: Iterator<Item = Result<Document, WikiGraphError>> + Send,
    {
        let (graph, stats) = documents
            .par_bridge()
            .try_fold(
                || (LinkGraph::new(), BuildStats::default()),
                |(mut graph, mut stats), item| {
                    match item {
                        Ok(doc) => self.add_document(&mut graph, &doc, &mut stats),
                        Err(e) if e.is_recoverable() => stats.record_malformed(&e),
                        Err(e) => return Err(e),
                    }
                    Ok((graph, stats))
                },
            )
            .try_reduce(
                || (LinkGraph::new(), BuildStats::default()),
                |(lhs_graph, lhs_stats), (rhs_graph, rhs_stats)| {
                    Ok((lhs_graph.union(rhs_graph), lhs_stats.merge(rhs_stats)))
                },
            )?;
        Ok(Self::finish(graph, stats))
    }

    fn finish(graph: LinkGraph, mut stats: BuildStats) -> (LinkGraph, BuildStats) {
        stats.nodes = graph.node_count();
        stats.edges = graph.edge_count();
        tracing::info!(
            "Graph build done: {} documents, {} nodes, {} edges",
            stats.documents,
            stats.nodes,
            stats.edges
        );
        (graph, stats)
    }
}
