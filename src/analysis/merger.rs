//! Combines analyzer outputs into a single, store-ordered extraction

use super::types::{AnalysisResult, AnalysisScope, Extraction};
use crate::graph::{DocumentId, DocumentStore};

/// Merges analyzer results
///
/// Records are put in document order (first-seen order in the store), then
/// block order. Records whose source document is not in the store are
/// dropped with a warning, so every reference source exists.
#[derive(Debug, Default, Clone)]
pub struct ResultMerger;

impl ResultMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, results: Vec<AnalysisResult>, scope: &AnalysisScope<'_>) -> Extraction {
        let mut combined = AnalysisResult::new();
        for result in results {
            combined.merge(result);
        }

        let store = scope.store;
        let mut warnings = combined.warnings;

        let unknown = |id: &DocumentId, warnings: &mut Vec<String>| -> bool {
            if store.contains(id) {
                false
            } else {
                warnings.push(format!("Dropped record from unknown document '{}'", id));
                true
            }
        };

        combined.references.retain(|r| !unknown(&r.source, &mut warnings));
        combined.tags.retain(|t| !unknown(&t.document, &mut warnings));
        combined.tasks.retain(|t| !unknown(&t.document, &mut warnings));
        combined.properties.retain(|p| !unknown(&p.document, &mut warnings));
        combined.links.retain(|l| !unknown(&l.document, &mut warnings));
        combined.stats.retain(|s| !unknown(&s.document, &mut warnings));

        // Stable sorts keep analyzer-internal order within a block
        combined
            .references
            .sort_by_key(|r| (position(store, &r.source), r.block));
        combined.tags.sort_by_key(|t| {
            (
                position(store, &t.document),
                t.block.map(|b| b + 1).unwrap_or(0),
            )
        });
        combined
            .tasks
            .sort_by_key(|t| (position(store, &t.document), t.block));
        combined
            .properties
            .sort_by_key(|p| position(store, &p.document));
        combined.links.sort_by_key(|l| position(store, &l.document));
        combined.stats.sort_by_key(|s| position(store, &s.document));
        combined.stats.dedup_by(|a, b| a.document.key() == b.document.key());

        Extraction {
            references: combined.references,
            tags: combined.tags,
            tasks: combined.tasks,
            properties: combined.properties,
            links: combined.links,
            stats: combined.stats,
            warnings,
        }
    }
}

fn position(store: &DocumentStore, id: &DocumentId) -> usize {
    store.position(id).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{DocumentStats, Reference};
    use crate::graph::Document;

    fn store() -> DocumentStore {
        DocumentStore::from_documents(vec![Document::new("A"), Document::new("B")]).unwrap()
    }

    #[test]
    fn test_merge_orders_by_store_position() {
        let store = store();
        let scope = AnalysisScope::new(&store);

        let mut first = AnalysisResult::new();
        first
            .references
            .push(Reference::new(DocumentId::new("B"), "X", 0));
        let mut second = AnalysisResult::new();
        second
            .references
            .push(Reference::new(DocumentId::new("A"), "Y", 3));
        second
            .references
            .push(Reference::new(DocumentId::new("A"), "Z", 1));

        let extraction = ResultMerger::new().merge(vec![first, second], &scope);
        let targets: Vec<_> = extraction.references.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, vec!["Z", "Y", "X"]);
    }

    #[test]
    fn test_merge_drops_unknown_sources() {
        let store = store();
        let scope = AnalysisScope::new(&store);

        let mut result = AnalysisResult::new();
        result
            .references
            .push(Reference::new(DocumentId::new("Ghost"), "A", 0));
        result
            .references
            .push(Reference::new(DocumentId::new("A"), "Ghost", 0));

        let extraction = ResultMerger::new().merge(vec![result], &scope);
        assert_eq!(extraction.references.len(), 1);
        assert_eq!(extraction.references[0].source.as_str(), "A");
        assert_eq!(extraction.warnings.len(), 1);
    }

    #[test]
    fn test_merge_keeps_first_stats_per_document() {
        let store = store();
        let scope = AnalysisScope::new(&store);

        let mut first = DocumentStats::new(DocumentId::new("A"));
        first.words = 3;
        let mut second = DocumentStats::new(DocumentId::new("a"));
        second.words = 9;

        let mut result = AnalysisResult::new();
        result.stats.push(first);
        result.stats.push(second);

        let extraction = ResultMerger::new().merge(vec![result], &scope);
        assert_eq!(extraction.stats.len(), 1);
        assert_eq!(extraction.stats[0].words, 3);
    }
}
