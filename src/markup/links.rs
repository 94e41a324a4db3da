use super::{LinkSet, MarkupParser, LINK_PATTERN};

impl MarkupParser {
    /// Extracts the normalized outbound link targets of a document.
    ///
    /// URL targets and file/image namespace targets are discarded, category prefixes are
    /// stripped down to the bare category name. A document without links yields an empty set.
    pub fn extract_links(&self, text: &str) -> LinkSet {
        raw_targets(text)
            .filter_map(|target| self.normalize_link(target))
            .collect()
    }

    /// Normalizes one pre-pipe link target, or `None` when it never becomes an edge.
    pub fn normalize_link(&self, target: &str) -> Option<String> {
        let target = target.trim();
        if Self::is_url(target) || self.is_file_link(target) {
            return None;
        }
        let normalized = self.normalize_title(self.strip_category(target));
        if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        }
    }
}

/// The nominal target (text before the first `|`) of every `[[...]]` span, in source order.
pub(super) fn raw_targets(text: &str) -> impl Iterator<Item = &str> {
    LINK_PATTERN.captures_iter(text).filter_map(|caps| {
        let inner = caps.get(1)?.as_str();
        Some(inner.split('|').next().unwrap_or(inner))
    })
}
