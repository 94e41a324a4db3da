use super::{MarkupParser, URL_PATTERN};

/// Literal replacements applied in order to every retained line of plain text.
pub const CLEANUP_RULES: &[(&str, &str)] = &[
    ("'''", ""),
    ("|", " "),
    ("[*", ""),
    ("[", ""),
    ("]", ""),
    ("=", ""),
    ("\\", ""),
    ("-", ""),
    ("~", ""),
    ("(...)", "."),
];

const TABLE_CELL: &str = "||";
const TRANSCLUSION: &str = "[include(";
const SECTION_ANCHOR: &str = "#s-";

impl MarkupParser {
    /// Renders a document as cleaned plain-text lines, preserving line order.
    ///
    /// Table rows and transclusion directives are dropped entirely.
    pub fn extract_plain_text(&self, text: &str) -> Vec<String> {
        text.split('\n')
            .filter(|line| !line.contains(TABLE_CELL) && !line.contains(TRANSCLUSION))
            .map(clean_line)
            .collect()
    }

    /// Redirect target of a document, if its plain text starts with a redirect marker.
    ///
    /// Detection runs on the cleaned first non-blank line; the target itself is read from the
    /// raw line so characters removed by [`CLEANUP_RULES`] survive in the title. A trailing
    /// section anchor (`#s-…`) is dropped; any other `#` is part of the title. Returns
    /// `Some("")` for a marker without a target so callers can report it.
    pub fn redirect_target(&self, text: &str) -> Option<String> {
        let raw = text
            .split('\n')
            .filter(|line| !line.contains(TABLE_CELL) && !line.contains(TRANSCLUSION))
            .find(|line| !clean_line(line).trim().is_empty())?;
        let cleaned = clean_line(raw);
        let marker = self.redirect_marker(cleaned.trim())?;
        let target = raw
            .trim()
            .strip_prefix(marker)
            .or_else(|| cleaned.trim().strip_prefix(marker))
            .unwrap_or_default();
        let target = target
            .find(SECTION_ANCHOR)
            .map_or(target, |anchor| &target[..anchor]);
        Some(self.normalize_title(target))
    }

    fn redirect_marker(&self, plain: &str) -> Option<&str> {
        self.redirect_markers
            .iter()
            .map(String::as_str)
            .find(|marker| plain.starts_with(*marker))
    }
}

/// Applies [`CLEANUP_RULES`], blanks URLs and drops a leading quote or bullet marker.
pub fn clean_line(line: &str) -> String {
    let mut cleaned = CLEANUP_RULES
        .iter()
        .fold(line.to_string(), |acc, (pattern, replacement)| {
            acc.replace(pattern, replacement)
        });
    if URL_PATTERN.is_match(&cleaned) {
        cleaned = URL_PATTERN.replace_all(&cleaned, " ").into_owned();
    }
    match cleaned.strip_prefix(['>', '*']) {
        Some(rest) => rest.trim().to_string(),
        None => cleaned,
    }
}
