//! Wiki markup parsing: outbound links, plain text and hierarchy metadata.
//!
//! The parser only understands the markers that matter for graph building:
//!
//! - `[[target]]` and `[[target|label]]` link spans
//! - file/image and category namespace prefixes on link targets
//! - redirect markers at the start of a document's plain text
//! - parent/child/related marker lines (see [`Hierarchy`])
//!
//! Everything else is treated as decoration and stripped by the ordered rules in
//! [`CLEANUP_RULES`].

mod hierarchy;
mod links;
mod text;

pub use hierarchy::Hierarchy;
pub use text::{clean_line, CLEANUP_RULES};

use crate::{config::GraphConfig, error::WikiGraphError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

/// A normalized set of link targets extracted from one document.
pub type LinkSet = BTreeSet<String>;

static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("link pattern is a valid regex"));

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z][A-Za-z0-9+.-]*://[\w./?=#&%~:@+-]+").expect("URL pattern is a valid regex")
});

/// Compiled markup rules for one configuration.
#[derive(Debug, Clone)]
pub struct MarkupParser {
    file_pattern: Option<Regex>,
    category_markers: Vec<String>,
    redirect_markers: Vec<String>,
    parent_marker: String,
    child_marker: String,
    related_marker: String,
    media_extensions: Vec<String>,
    normalize_unicode: bool,
}

impl MarkupParser {
    pub fn new(config: &GraphConfig) -> Result<MarkupParser, WikiGraphError> {
        let markup = &config.markup;
        let file_pattern = if markup.file_markers.is_empty() {
            None
        } else {
            let alternatives = markup
                .file_markers
                .iter()
                .map(|marker| regex::escape(marker))
                .collect::<Vec<String>>()
                .join("|");
            Some(Regex::new(&format!("^:?(?:{alternatives})"))?)
        };
        Ok(MarkupParser {
            file_pattern,
            category_markers: markup.category_markers.clone(),
            redirect_markers: markup.redirect_markers.clone(),
            parent_marker: markup.parent_marker.clone(),
            child_marker: markup.child_marker.clone(),
            related_marker: markup.related_marker.clone(),
            media_extensions: markup
                .media_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            normalize_unicode: config.normalize_unicode,
        })
    }

    /// Canonical form of a document or link title.
    pub fn normalize_title(&self, title: &str) -> String {
        normalize_title(title, self.normalize_unicode)
    }

    /// Whether a title names a binary media asset rather than an article.
    pub fn is_media_title(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        self.media_extensions.iter().any(|ext| lower.ends_with(ext))
    }

    fn is_url(target: &str) -> bool {
        URL_PATTERN.find(target).is_some_and(|m| m.start() == 0)
    }

    fn is_file_link(&self, target: &str) -> bool {
        self.file_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(target))
    }

    fn strip_category<'t>(&self, target: &'t str) -> &'t str {
        let unprefixed = target.strip_prefix(':').unwrap_or(target);
        for marker in self.category_markers.iter() {
            if let Some(name) = unprefixed.strip_prefix(marker.as_str()) {
                return name;
            }
        }
        target
    }

    fn is_category_link(&self, target: &str) -> bool {
        let unprefixed = target.strip_prefix(':').unwrap_or(target);
        self.category_markers
            .iter()
            .any(|marker| unprefixed.starts_with(marker.as_str()))
    }
}

/// Trims a title and, when requested, applies Unicode NFC so composed and decomposed Hangul
/// spellings of the same title collapse to one node.
pub fn normalize_title(title: &str, nfc: bool) -> String {
    let trimmed = title.trim();
    if nfc {
        trimmed.nfc().collect()
    } else {
        trimmed.to_string()
    }
}
