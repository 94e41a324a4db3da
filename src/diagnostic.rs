//! Diagnostics and running totals for batch stages.
//!
//! None of this affects the produced graph; it exists so a batch run over a multi-gigabyte dump
//! can report what it skipped and why. Each stats type renders as the line-oriented status text
//! printed at the end of a stage.

use crate::error::WikiGraphError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Individual diagnostics kept per stats record. Counters keep counting past this.
pub const MAX_RECORDED_DIAGNOSTICS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A record or table line that could not be used and was skipped.
    Malformed(String),
    /// Redirect resolution revisited a title already on its trace.
    RedirectCycle { entry: String, members: Vec<String> },
    /// A traversal stopped enqueuing because it hit its node budget.
    BudgetExhausted { limit: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Malformed(msg) => write!(f, "malformed input skipped: {msg}"),
            Diagnostic::RedirectCycle { entry, members } => write!(
                f,
                "redirect cycle entered at '{entry}' through [{}]",
                members.join(", ")
            ),
            Diagnostic::BudgetExhausted { limit } => {
                write!(f, "traversal node budget of {limit} exhausted")
            }
        }
    }
}

fn record(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    if diagnostics.len() < MAX_RECORDED_DIAGNOSTICS && !diagnostics.contains(&diagnostic) {
        diagnostics.push(diagnostic);
    }
}

/// Totals of the redirect/plain-text scan over the document stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub documents: usize,
    pub redirects: usize,
    pub duplicate_redirects: usize,
    pub empty_documents: usize,
    pub malformed: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanStats {
    pub fn record_malformed(&mut self, error: &WikiGraphError) {
        self.malformed += 1;
        tracing::warn!("Skipping malformed record: {error}");
        record(&mut self.diagnostics, Diagnostic::Malformed(error.to_string()));
    }
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Docs: {}", self.documents)?;
        writeln!(f, "Redirects: {}", self.redirects)?;
        writeln!(f, "Duplicate Redirects: {}", self.duplicate_redirects)?;
        writeln!(f, "Empty Docs: {}", self.empty_documents)?;
        write!(f, "Malformed Records: {}", self.malformed)
    }
}

/// Totals of one graph build. Node and edge counts describe the finished graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub documents: usize,
    pub nodes: usize,
    pub edges: usize,
    pub skipped_untitled: usize,
    pub skipped_media: usize,
    pub skipped_linkless: usize,
    pub redirect_expansions: usize,
    pub malformed: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildStats {
    pub fn record_malformed(&mut self, error: &WikiGraphError) {
        self.malformed += 1;
        tracing::warn!("Skipping malformed record: {error}");
        record(&mut self.diagnostics, Diagnostic::Malformed(error.to_string()));
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        record(&mut self.diagnostics, diagnostic);
    }

    /// Combines the totals of two partial builds. Graph-level counts are left to the caller.
    pub fn merge(mut self, other: BuildStats) -> BuildStats {
        self.documents += other.documents;
        self.skipped_untitled += other.skipped_untitled;
        self.skipped_media += other.skipped_media;
        self.skipped_linkless += other.skipped_linkless;
        self.redirect_expansions += other.redirect_expansions;
        self.malformed += other.malformed;
        for diagnostic in other.diagnostics {
            record(&mut self.diagnostics, diagnostic);
        }
        self
    }
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Docs: {}", self.documents)?;
        writeln!(f, "Total Nodes: {}", self.nodes)?;
        writeln!(f, "Total Edges: {}", self.edges)?;
        writeln!(
            f,
            "Skipped Docs: {} untitled, {} media, {} without links",
            self.skipped_untitled, self.skipped_media, self.skipped_linkless
        )?;
        writeln!(f, "Redirect Expansions: {}", self.redirect_expansions)?;
        write!(f, "Malformed Records: {}", self.malformed)
    }
}
