//! Redirect map construction and chain resolution.
//!
//! The map stores only direct hops (`source -> target`); chains are followed on read. The
//! map is append-only while it is being built and read-only afterwards: callers only ever
//! see it through [`RedirectResolver::resolve`] and the lookup helpers.
//!
//! Persisted form is the tab-separated redirect table:
//!
//! ```text
//! <title>\t->\t<target>
//! ```

use crate::{
    diagnostic::ScanStats,
    document::Document,
    error::WikiGraphError,
    markup::MarkupParser,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{btree_map::Entry, BTreeMap, BTreeSet},
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

pub const TABLE_SEPARATOR: &str = "\t->\t";

/// Outcome of following a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// First title on the chain without a further redirect, or the cycle's entry point.
    pub final_target: String,
    /// Every redirect source passed on the way, the starting title included.
    pub traced: BTreeSet<String>,
    /// Whether the chain looped back onto itself.
    pub cycle: bool,
}

impl Resolution {
    pub fn is_redirect(&self) -> bool {
        !self.traced.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectResolver {
    map: BTreeMap<String, String>,
}

impl RedirectResolver {
    pub fn new() -> RedirectResolver {
        RedirectResolver::default()
    }

    /// Records a direct redirect. The first target recorded for a source wins; returns whether
    /// the entry was new.
    pub fn insert<S: Into<String>, T: Into<String>>(&mut self, source: S, target: T) -> bool {
        match self.map.entry(source.into()) {
            Entry::Vacant(e) => {
                e.insert(target.into());
                true
            }
            Entry::Occupied(e) => {
                tracing::debug!(
                    "Ignoring duplicate redirect for '{}' (keeping '{}')",
                    e.key(),
                    e.get()
                );
                false
            }
        }
    }

    pub fn is_redirect(&self, title: &str) -> bool {
        self.map.contains_key(title)
    }

    /// Direct (single hop) target of a redirect source.
    pub fn target(&self, title: &str) -> Option<&str> {
        self.map.get(title).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.map.iter()
    }

    /// Follows the redirect chain starting at `title`.
    ///
    /// Terminates after at most `len() + 1` lookups. When the chain revisits a title already on
    /// its trace, resolution stops there: that title becomes the final target and the result
    /// is flagged as a cycle.
    pub fn resolve(&self, title: &str) -> Resolution {
        let mut traced = BTreeSet::new();
        let mut current = title.to_string();
        for _ in 0..=self.map.len() {
            let Some(next) = self.map.get(&current) else {
                return Resolution {
                    final_target: current,
                    traced,
                    cycle: false,
                };
            };
            traced.insert(current);
            if traced.contains(next) {
                tracing::warn!(
                    "Redirect cycle detected while resolving '{}': re-entered at '{}'",
                    title,
                    next
                );
                return Resolution {
                    final_target: next.clone(),
                    traced,
                    cycle: true,
                };
            }
            current = next.clone();
        }
        // Each iteration adds a distinct map key to `traced`, so this is unreachable for a
        // consistent map; treat it as a cycle rather than loop.
        Resolution {
            final_target: current,
            traced,
            cycle: true,
        }
    }

    /// Builds a resolver from a document stream.
    pub fn from_documents<I>(
        documents: I,
        parser: &MarkupParser,
    ) -> Result<(RedirectResolver, ScanStats), WikiGraphError>
    where
        I: IntoIterator<Item = Result<Document, WikiGraphError>>,
    {
        Self::scan_documents(documents, parser, |_, _| Ok(()))
    }

    /// Builds a resolver from a document stream, handing every non-redirect document with
    /// non-empty plain text to `on_content` together with that text.
    ///
    /// Malformed records are counted and skipped; any other error aborts the scan.
    #[tracing::instrument(skip_all)]
    pub fn scan_documents<I, F>(
        documents: I,
        parser: &MarkupParser,
        mut on_content: F,
    ) -> Result<(RedirectResolver, ScanStats), WikiGraphError>
    where
        I: IntoIterator<Item = Result<Document, WikiGraphError>>,
        F: FnMut(&Document, &str) -> Result<(), WikiGraphError>,
    {
        let mut resolver = RedirectResolver::new();
        let mut stats = ScanStats::default();
        for item in documents {
            let doc = match item {
                Ok(doc) => doc,
                Err(e) if e.is_recoverable() => {
                    stats.record_malformed(&e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            stats.documents += 1;

            let lines = parser.extract_plain_text(&doc.text);
            let plain = lines.concat();
            let plain = plain.trim();
            if plain.is_empty() {
                stats.empty_documents += 1;
                continue;
            }
            match parser.redirect_target(&doc.text) {
                Some(target) => {
                    let title = parser.normalize_title(&doc.title);
                    if title.is_empty() || target.is_empty() {
                        stats.record_malformed(&WikiGraphError::MalformedInput(format!(
                            "redirect '{}' has an empty title or target",
                            doc.title
                        )));
                    } else if resolver.insert(title, target) {
                        stats.redirects += 1;
                    } else {
                        stats.duplicate_redirects += 1;
                    }
                }
                None => on_content(&doc, plain)?,
            }
        }
        tracing::info!(
            "Redirect scan done: {} documents, {} redirects",
            stats.documents,
            stats.redirects
        );
        Ok((resolver, stats))
    }

    /// Reads a redirect table, skipping and counting malformed lines.
    pub fn read_table<R: BufRead>(reader: R) -> Result<(RedirectResolver, usize), WikiGraphError> {
        let mut resolver = RedirectResolver::new();
        let mut malformed = 0;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split(TABLE_SEPARATOR);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(source), Some(target), None)
                    if !source.trim().is_empty() && !target.trim().is_empty() =>
                {
                    resolver.insert(source, target.trim());
                }
                _ => {
                    malformed += 1;
                    tracing::warn!("Skipping malformed redirect table line {}", idx + 1);
                }
            }
        }
        Ok((resolver, malformed))
    }

    pub fn write_table<W: Write>(&self, mut writer: W) -> Result<(), WikiGraphError> {
        for (source, target) in self.map.iter() {
            writeln!(writer, "{source}{TABLE_SEPARATOR}{target}")?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<RedirectResolver, WikiGraphError> {
        tracing::debug!("Reading redirect table {:?}", path.as_ref());
        let (resolver, malformed) = Self::read_table(BufReader::new(File::open(path)?))?;
        if malformed > 0 {
            tracing::warn!("Skipped {malformed} malformed redirect table line(s)");
        }
        Ok(resolver)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WikiGraphError> {
        tracing::debug!("Writing redirect table {:?}", path.as_ref());
        self.write_table(BufWriter::new(File::create(path)?))
    }
}
