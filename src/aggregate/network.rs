//! Link graph: in/out degrees, isolated and hub documents, rankings

use super::AggregateConfig;
use crate::analysis::Extraction;
use crate::graph::{normalize_name, DocumentId, DocumentKind, DocumentStore};
use serde::Serialize;
use std::collections::HashMap;

/// Connectivity of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentDegree {
    pub id: DocumentId,
    pub kind: DocumentKind,
    /// First-seen position in the store
    pub position: usize,
    /// References targeting this document
    pub in_degree: usize,
    /// References originating in this document
    pub out_degree: usize,
}

impl DocumentDegree {
    /// No outgoing references
    pub fn is_isolated(&self) -> bool {
        self.out_degree == 0
    }

    /// No references in either direction
    pub fn is_orphan(&self) -> bool {
        self.in_degree == 0 && self.out_degree == 0
    }

    /// Either degree exceeds the threshold
    pub fn is_hub(&self, threshold: usize) -> bool {
        self.in_degree > threshold || self.out_degree > threshold
    }
}

/// A reference target with no document behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPage {
    /// Target as first written
    pub name: String,
    pub references: usize,
    /// Distinct referring documents, first-seen order
    pub referenced_by: Vec<DocumentId>,
}

/// Metric used to rank documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeMetric {
    In,
    Out,
    Total,
}

/// Aggregated link graph over a document store
#[derive(Debug, Clone, Serialize)]
pub struct LinkGraph {
    /// One entry per document, store order
    pub degrees: Vec<DocumentDegree>,
    /// Unresolved targets, first-seen order
    pub missing: Vec<MissingPage>,
    pub total_references: usize,
    pub hub_threshold: usize,
}

impl LinkGraph {
    pub fn build(store: &DocumentStore, extraction: &Extraction, config: &AggregateConfig) -> Self {
        let mut degrees: Vec<DocumentDegree> = store
            .iter()
            .enumerate()
            .map(|(position, doc)| DocumentDegree {
                id: doc.id.clone(),
                kind: doc.kind,
                position,
                in_degree: 0,
                out_degree: 0,
            })
            .collect();

        let mut edges: Vec<(&DocumentId, &str)> = extraction
            .references
            .iter()
            .map(|r| (&r.source, r.target.as_str()))
            .collect();
        if config.tags_as_references {
            edges.extend(extraction.tags.iter().map(|t| (&t.document, t.tag.as_str())));
        }

        let mut missing: Vec<MissingPage> = Vec::new();
        let mut missing_index: HashMap<String, usize> = HashMap::new();
        let mut total_references = 0;

        for (source, target) in edges {
            // The merger guarantees sources exist
            let Some(source_pos) = store.position(source) else {
                continue;
            };
            total_references += 1;
            degrees[source_pos].out_degree += 1;

            match store.resolve(target) {
                Some(target_pos) => degrees[target_pos].in_degree += 1,
                None => {
                    let key = normalize_name(target);
                    let index = *missing_index.entry(key).or_insert_with(|| {
                        missing.push(MissingPage {
                            name: target.trim().to_string(),
                            references: 0,
                            referenced_by: Vec::new(),
                        });
                        missing.len() - 1
                    });
                    let entry = &mut missing[index];
                    entry.references += 1;
                    if !entry.referenced_by.iter().any(|id| id.key() == source.key()) {
                        entry.referenced_by.push(source.clone());
                    }
                }
            }
        }

        Self {
            degrees,
            missing,
            total_references,
            hub_threshold: config.hub_threshold,
        }
    }

    pub fn degree(&self, name: &str) -> Option<&DocumentDegree> {
        let key = normalize_name(name);
        self.degrees.iter().find(|d| d.id.key() == key)
    }

    pub fn isolated(&self) -> Vec<&DocumentDegree> {
        self.degrees.iter().filter(|d| d.is_isolated()).collect()
    }

    pub fn orphans(&self) -> Vec<&DocumentDegree> {
        self.degrees.iter().filter(|d| d.is_orphan()).collect()
    }

    pub fn hubs(&self) -> Vec<&DocumentDegree> {
        self.degrees
            .iter()
            .filter(|d| d.is_hub(self.hub_threshold))
            .collect()
    }

    /// All documents ranked by a metric, descending
    ///
    /// Ties keep store order (the sort is stable).
    pub fn ranked(&self, metric: DegreeMetric) -> Vec<&DocumentDegree> {
        let value = |d: &DocumentDegree| match metric {
            DegreeMetric::In => d.in_degree,
            DegreeMetric::Out => d.out_degree,
            DegreeMetric::Total => d.in_degree + d.out_degree,
        };
        let mut ranked: Vec<_> = self.degrees.iter().collect();
        ranked.sort_by(|a, b| value(b).cmp(&value(a)));
        ranked
    }

    /// Top `n` documents with at least one incoming reference
    pub fn most_referenced(&self, n: usize) -> Vec<&DocumentDegree> {
        self.ranked(DegreeMetric::In)
            .into_iter()
            .filter(|d| d.in_degree > 0)
            .take(n)
            .collect()
    }

    /// Top `n` documents with at least one outgoing reference
    pub fn most_linking(&self, n: usize) -> Vec<&DocumentDegree> {
        self.ranked(DegreeMetric::Out)
            .into_iter()
            .filter(|d| d.out_degree > 0)
            .take(n)
            .collect()
    }

    /// References that point at an existing document
    pub fn resolved_references(&self) -> usize {
        self.degrees.iter().map(|d| d.in_degree).sum()
    }

    pub fn average_out_degree(&self) -> f64 {
        if self.degrees.is_empty() {
            0.0
        } else {
            self.total_references as f64 / self.degrees.len() as f64
        }
    }

    /// Resolved references over possible directed pairs, as a percentage
    pub fn density_percent(&self) -> f64 {
        let n = self.degrees.len();
        if n < 2 {
            return 0.0;
        }
        self.resolved_references() as f64 / (n * (n - 1)) as f64 * 100.0
    }
}
