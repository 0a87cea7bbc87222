//! Tag frequencies

use crate::analysis::{Extraction, TagOrigin};
use crate::graph::{normalize_name, DocumentId, DocumentStore};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Which count ranks tags and fills "used N times"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCountMode {
    /// Every occurrence counts
    #[default]
    Occurrences,
    /// Each document counts once
    Documents,
}

impl FromStr for TagCountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "occurrences" => Ok(TagCountMode::Occurrences),
            "documents" | "pages" => Ok(TagCountMode::Documents),
            other => Err(format!("unknown tag count mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagStat {
    /// Spelling of the first occurrence
    pub name: String,
    pub occurrences: usize,
    /// Distinct documents carrying the tag
    pub documents: usize,
    pub inline: usize,
    pub property: usize,
}

impl TagStat {
    pub fn count(&self, mode: TagCountMode) -> usize {
        match mode {
            TagCountMode::Occurrences => self.occurrences,
            TagCountMode::Documents => self.documents,
        }
    }
}

/// Tags carried by one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTags {
    pub document: DocumentId,
    /// Distinct tags, first-seen order
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagSummary {
    /// First-seen order
    pub tags: Vec<TagStat>,
    pub by_document: Vec<DocumentTags>,
    pub total_occurrences: usize,
    pub total_documents: usize,
    pub mode: TagCountMode,
}

impl TagSummary {
    pub fn build(store: &DocumentStore, extraction: &Extraction, mode: TagCountMode) -> Self {
        let mut tags: Vec<TagStat> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
        let mut by_document: Vec<DocumentTags> = Vec::new();

        for occurrence in &extraction.tags {
            let key = normalize_name(&occurrence.tag);
            let i = *index.entry(key.clone()).or_insert_with(|| {
                tags.push(TagStat {
                    name: occurrence.tag.trim().to_string(),
                    occurrences: 0,
                    documents: 0,
                    inline: 0,
                    property: 0,
                });
                tags.len() - 1
            });

            let stat = &mut tags[i];
            stat.occurrences += 1;
            match occurrence.origin {
                TagOrigin::Inline => stat.inline += 1,
                TagOrigin::Property => stat.property += 1,
            }

            let doc_key = occurrence.document.key();
            if seen_pairs.insert((doc_key.clone(), key)) {
                stat.documents += 1;
                match by_document.iter_mut().find(|d| d.document.key() == doc_key) {
                    Some(entry) => entry.tags.push(stat.name.clone()),
                    None => by_document.push(DocumentTags {
                        document: occurrence.document.clone(),
                        tags: vec![stat.name.clone()],
                    }),
                }
            }
        }

        Self {
            total_occurrences: extraction.tags.len(),
            total_documents: store.len(),
            tags,
            by_document,
            mode,
        }
    }

    /// Tags ranked by the configured count, ties in first-seen order
    pub fn ranked(&self) -> Vec<&TagStat> {
        let mut ranked: Vec<_> = self.tags.iter().collect();
        ranked.sort_by(|a, b| b.count(self.mode).cmp(&a.count(self.mode)));
        ranked
    }

    pub fn get(&self, name: &str) -> Option<&TagStat> {
        let key = normalize_name(name);
        self.tags.iter().find(|t| normalize_name(&t.name) == key)
    }

    /// Share of a tag as a percentage: of all occurrences, or of all documents
    pub fn share_percent(&self, stat: &TagStat) -> f64 {
        let total = match self.mode {
            TagCountMode::Occurrences => self.total_occurrences,
            TagCountMode::Documents => self.total_documents,
        };
        if total == 0 {
            0.0
        } else {
            stat.count(self.mode) as f64 / total as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TagOccurrence;
    use crate::graph::Document;

    fn summary(mode: TagCountMode) -> TagSummary {
        let store = DocumentStore::from_documents(vec![
            Document::new("One"),
            Document::new("Two"),
            Document::new("Three"),
        ])
        .unwrap();
        let occ = |doc: &str, tag: &str, origin| TagOccurrence {
            document: DocumentId::new(doc),
            tag: tag.to_string(),
            origin,
            block: Some(0),
        };
        let mut extraction = Extraction::new();
        extraction.tags = vec![
            occ("One", "Rust", TagOrigin::Property),
            occ("One", "rust", TagOrigin::Inline),
            occ("One", "rust", TagOrigin::Inline),
            occ("One", "notes", TagOrigin::Inline),
            occ("Two", "notes", TagOrigin::Inline),
            occ("Three", "notes", TagOrigin::Inline),
        ];
        TagSummary::build(&store, &extraction, mode)
    }

    #[test]
    fn test_occurrences_and_documents_are_both_tracked() {
        let s = summary(TagCountMode::Occurrences);
        let rust = s.get("RUST").unwrap();
        assert_eq!(rust.name, "Rust");
        assert_eq!(rust.occurrences, 3);
        assert_eq!(rust.documents, 1);
        assert_eq!(rust.inline, 2);
        assert_eq!(rust.property, 1);

        let notes = s.get("notes").unwrap();
        assert_eq!(notes.occurrences, 3);
        assert_eq!(notes.documents, 3);
    }

    #[test]
    fn test_ranking_depends_on_mode() {
        let by_occurrence: Vec<_> = summary(TagCountMode::Occurrences)
            .ranked()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        // Tie at 3 keeps first-seen order
        assert_eq!(by_occurrence, vec!["Rust", "notes"]);

        let by_document: Vec<_> = summary(TagCountMode::Documents)
            .ranked()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(by_document, vec!["notes", "Rust"]);
    }

    #[test]
    fn test_by_document_lists_distinct_tags() {
        let s = summary(TagCountMode::Occurrences);
        assert_eq!(s.by_document.len(), 3);
        assert_eq!(s.by_document[0].tags, vec!["Rust", "notes"]);
        assert_eq!(s.by_document[2].tags, vec!["notes"]);
    }

    #[test]
    fn test_share_percent() {
        let s = summary(TagCountMode::Documents);
        let notes = s.get("notes").unwrap();
        assert!((s.share_percent(notes) - 100.0).abs() < f64::EPSILON);

        let s = summary(TagCountMode::Occurrences);
        let rust = s.get("rust").unwrap();
        assert!((s.share_percent(rust) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("Documents".parse::<TagCountMode>().unwrap(), TagCountMode::Documents);
        assert_eq!("pages".parse::<TagCountMode>().unwrap(), TagCountMode::Documents);
        assert!("weird".parse::<TagCountMode>().is_err());
    }
}
