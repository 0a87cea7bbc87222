//! Graph aggregation over an extraction
//!
//! Turns the per-document records of an [`Extraction`] into the numbers
//! the reports show: link degrees, tag frequencies, task counts and
//! property usage. Every ranking is a stable sort over store order.

mod network;
mod properties;
mod tags;
mod tasks;

pub use network::{DegreeMetric, DocumentDegree, LinkGraph, MissingPage};
pub use properties::{property_usage, PropertyUsage};
pub use tags::{DocumentTags, TagCountMode, TagStat, TagSummary};
pub use tasks::TaskSummary;

use crate::analysis::{Extraction, LinkKind};
use crate::graph::DocumentStore;
use chrono::NaiveDate;
use serde::Serialize;

/// Aggregation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateConfig {
    /// A document is a hub when either degree exceeds this
    pub hub_threshold: usize,
    pub tag_count_mode: TagCountMode,
    /// Count tag occurrences as references to the tag's page
    pub tags_as_references: bool,
    /// Window for upcoming deadlines
    pub upcoming_days: u32,
    /// Reference date for overdue and upcoming tasks
    pub as_of: NaiveDate,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            hub_threshold: 5,
            tag_count_mode: TagCountMode::default(),
            tags_as_references: false,
            upcoming_days: 7,
            as_of: chrono::Local::now().date_naive(),
        }
    }
}

/// Headline numbers for the whole knowledge base
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub documents: usize,
    pub pages: usize,
    pub journals: usize,
    pub blocks: usize,
    pub headings: usize,
    pub words: usize,
    pub total_references: usize,
    pub resolved_references: usize,
    pub missing_pages: usize,
    pub external_links: usize,
    pub isolated: usize,
    pub orphans: usize,
    pub hubs: usize,
    pub distinct_tags: usize,
    pub tasks: usize,
    pub average_references: f64,
    pub density_percent: f64,
}

/// Everything the renderer needs
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub as_of: NaiveDate,
    pub summary: GraphSummary,
    pub network: LinkGraph,
    pub tags: TagSummary,
    pub tasks: TaskSummary,
    pub properties: Vec<PropertyUsage>,
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    pub fn build(store: &DocumentStore, extraction: &Extraction, config: &AggregateConfig) -> Self {
        let network = LinkGraph::build(store, extraction, config);
        let tags = TagSummary::build(store, extraction, config.tag_count_mode);
        let tasks = TaskSummary::build(extraction, config.as_of, config.upcoming_days);
        let properties = property_usage(extraction);

        let summary = GraphSummary {
            documents: store.len(),
            pages: store.pages().count(),
            journals: store.journals().count(),
            blocks: extraction.stats.iter().map(|s| s.blocks).sum(),
            headings: extraction.stats.iter().map(|s| s.headings).sum(),
            words: extraction.stats.iter().map(|s| s.words).sum(),
            total_references: network.total_references,
            resolved_references: network.resolved_references(),
            missing_pages: network.missing.len(),
            external_links: extraction
                .links
                .iter()
                .filter(|l| l.kind == LinkKind::External)
                .count(),
            isolated: network.isolated().len(),
            orphans: network.orphans().len(),
            hubs: network.hubs().len(),
            distinct_tags: tags.tags.len(),
            tasks: tasks.total,
            average_references: network.average_out_degree(),
            density_percent: network.density_percent(),
        };

        Self {
            as_of: config.as_of,
            summary,
            network,
            tags,
            tasks,
            properties,
            warnings: extraction.warnings.clone(),
        }
    }
}
