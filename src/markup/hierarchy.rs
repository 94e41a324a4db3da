use super::{links::raw_targets, LinkSet, MarkupParser};
use serde::{Deserialize, Serialize};

/// Document relations declared on dedicated marker lines.
///
/// This is metadata only: the graph builder does not turn it into edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub parents: LinkSet,
    pub children: LinkSet,
    pub related: LinkSet,
    pub categories: LinkSet,
}

impl Hierarchy {
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
            && self.children.is_empty()
            && self.related.is_empty()
            && self.categories.is_empty()
    }
}

impl MarkupParser {
    pub fn extract_hierarchy(&self, text: &str) -> Hierarchy {
        let mut hierarchy = Hierarchy::default();
        for line in text.split('\n') {
            let mut bucket = if line.contains(self.parent_marker.as_str()) {
                Some(&mut hierarchy.parents)
            } else if line.contains(self.child_marker.as_str()) {
                Some(&mut hierarchy.children)
            } else if line.contains(self.related_marker.as_str()) {
                Some(&mut hierarchy.related)
            } else {
                None
            };
            for target in raw_targets(line) {
                if self.is_category_link(target) {
                    if let Some(name) = self.normalize_link(target) {
                        hierarchy.categories.insert(name);
                    }
                    continue;
                }
                if let Some(bucket) = bucket.as_deref_mut() {
                    if let Some(name) = self.normalize_link(target) {
                        bucket.insert(name);
                    }
                }
            }
        }
        hierarchy
    }
}
