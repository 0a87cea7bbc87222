//! Core types for the extraction pipeline

use crate::graph::{normalize_name, Document, DocumentId, DocumentStore, Properties};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What an analyzer extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisCapability {
    /// Double-bracket references and markdown links
    References,
    /// Hash tags and `tags::` properties
    Tags,
    /// Task markers, priorities, scheduling
    Tasks,
    /// `key:: value` metadata
    Properties,
    /// Block, heading and word counts
    Structure,
}

/// Configuration for extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Skip references and tags inside code spans and fenced blocks
    pub ignore_code: bool,
    /// Documents larger than this (in bytes of block content) are skipped
    pub max_document_bytes: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ignore_code: true,
            max_document_bytes: Some(4 * 1024 * 1024),
        }
    }
}

/// The documents to analyze
#[derive(Debug, Clone)]
pub struct AnalysisScope<'a> {
    /// The whole document set
    pub store: &'a DocumentStore,
    /// Changed documents (for incremental analysis)
    pub changed: Vec<DocumentId>,
    pub config: AnalysisConfig,
}

impl<'a> AnalysisScope<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self {
            store,
            changed: Vec::new(),
            config: AnalysisConfig::default(),
        }
    }

    /// Restrict analysis to the given documents
    pub fn with_changes(mut self, changed: Vec<DocumentId>) -> Self {
        self.changed = changed;
        self
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn is_incremental(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Changed documents if incremental, all documents otherwise, in store order
    pub fn items_to_analyze(&self) -> Vec<&'a Document> {
        let store: &'a DocumentStore = self.store;
        if self.is_incremental() {
            let keys: Vec<String> = self.changed.iter().map(|id| id.key()).collect();
            store
                .iter()
                .filter(|doc| keys.contains(&doc.id.key()))
                .collect()
        } else {
            store.iter().collect()
        }
    }
}

/// A directed `[[link]]` from one document to a page name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub source: DocumentId,
    /// Target name as written
    pub target: String,
    /// Display text from `[[target|label]]`
    pub label: Option<String>,
    /// Index of the block the link appears in
    pub block: usize,
}

impl Reference {
    pub fn new(source: DocumentId, target: impl Into<String>, block: usize) -> Self {
        Self {
            source,
            target: target.into(),
            label: None,
            block,
        }
    }

    /// Case-insensitive target key
    pub fn target_key(&self) -> String {
        normalize_name(&self.target)
    }
}

/// Where a tag was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagOrigin {
    /// `#tag` or `#[[multi word]]` in block text
    Inline,
    /// A `tags::` property value
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOccurrence {
    pub document: DocumentId,
    pub tag: String,
    pub origin: TagOrigin,
    /// Block index; `None` for page properties
    pub block: Option<usize>,
}

/// Kind of a markdown `[text](url)` link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    External,
    Internal,
    Anchor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownLink {
    pub document: DocumentId,
    pub url: String,
    pub text: String,
    pub kind: LinkKind,
}

/// Task status markers; declaration order is report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
    Later,
    Now,
    Waiting,
    Cancelled,
    Delegated,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 8] = [
        TaskStatus::Todo,
        TaskStatus::Doing,
        TaskStatus::Done,
        TaskStatus::Later,
        TaskStatus::Now,
        TaskStatus::Waiting,
        TaskStatus::Cancelled,
        TaskStatus::Delegated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::Doing => "DOING",
            TaskStatus::Done => "DONE",
            TaskStatus::Later => "LATER",
            TaskStatus::Now => "NOW",
            TaskStatus::Waiting => "WAITING",
            TaskStatus::Cancelled => "CANCELLED",
            TaskStatus::Delegated => "DELEGATED",
        }
    }

    /// Finished tasks: DONE and CANCELLED
    pub fn is_closed(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AnalysisError;

    /// Markers are case-sensitive, as in the editor
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AnalysisError::ParseError(format!("unknown task marker: {}", s)))
    }
}

/// `[#A]`, `[#B]` or `[#C]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    A,
    B,
    C,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::A, Priority::B, Priority::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::A => "A",
            Priority::B => "B",
            Priority::C => "C",
        }
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" => Some(Priority::A),
            "B" => Some(Priority::B),
            "C" => Some(Priority::C),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub document: DocumentId,
    pub block: usize,
    pub status: TaskStatus,
    pub priority: Option<Priority>,
    /// First line without marker and priority
    pub text: String,
    pub scheduled: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub properties: Properties,
}

impl TaskItem {
    /// Deadline if set, scheduled date otherwise
    pub fn due(&self) -> Option<NaiveDate> {
        self.deadline.or(self.scheduled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyScope {
    Page,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOccurrence {
    pub document: DocumentId,
    pub key: String,
    pub value: String,
    pub scope: PropertyScope,
}

/// Structural counts for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub document: DocumentId,
    pub blocks: usize,
    pub headings: usize,
    pub words: usize,
    pub max_depth: usize,
}

impl DocumentStats {
    pub fn new(document: DocumentId) -> Self {
        Self {
            document,
            blocks: 0,
            headings: 0,
            words: 0,
            max_depth: 0,
        }
    }
}

/// Output of a single analyzer
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    pub references: Vec<Reference>,
    pub tags: Vec<TagOccurrence>,
    pub tasks: Vec<TaskItem>,
    pub properties: Vec<PropertyOccurrence>,
    pub links: Vec<MarkdownLink>,
    pub stats: Vec<DocumentStats>,
    /// Non-fatal problems
    pub warnings: Vec<String>,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: AnalysisResult) {
        self.references.extend(other.references);
        self.tags.extend(other.tags);
        self.tasks.extend(other.tasks);
        self.properties.extend(other.properties);
        self.links.extend(other.links);
        self.stats.extend(other.stats);
        self.warnings.extend(other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
            && self.tags.is_empty()
            && self.tasks.is_empty()
            && self.properties.is_empty()
            && self.links.is_empty()
            && self.stats.is_empty()
    }
}

/// Combined output of all analyzers, ordered by document position
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    pub references: Vec<Reference>,
    pub tags: Vec<TagOccurrence>,
    pub tasks: Vec<TaskItem>,
    pub properties: Vec<PropertyOccurrence>,
    pub links: Vec<MarkdownLink>,
    pub stats: Vec<DocumentStats>,
    pub warnings: Vec<String>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outgoing references of one document
    pub fn references_from<'a>(&'a self, id: &'a DocumentId) -> impl Iterator<Item = &'a Reference> {
        let key = id.key();
        self.references
            .iter()
            .filter(move |r| r.source.key() == key)
    }
}

/// Error types for analysis
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    #[error("Content too large: {size} bytes (max: {max})")]
    ContentTooLarge { size: usize, max: usize },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Document;

    #[test]
    fn test_task_status_parse() {
        assert_eq!("DONE".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert_eq!("DELEGATED".parse::<TaskStatus>().unwrap(), TaskStatus::Delegated);
        assert!("done".parse::<TaskStatus>().is_err());
        assert!("FINISHED".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_status_order_matches_marker_list() {
        let markers: Vec<_> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            markers,
            vec!["TODO", "DOING", "DONE", "LATER", "NOW", "WAITING", "CANCELLED", "DELEGATED"]
        );
    }

    #[test]
    fn test_scope_incremental() {
        let store = DocumentStore::from_documents(vec![
            Document::new("file1"),
            Document::new("file2"),
        ])
        .unwrap();

        let scope = AnalysisScope::new(&store).with_changes(vec![DocumentId::new("FILE2")]);

        assert!(scope.is_incremental());
        let items = scope.items_to_analyze();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name(), "file2");
    }

    #[test]
    fn test_analysis_result_merge() {
        let mut result1 = AnalysisResult::new();
        result1.add_warning("warning1");
        result1
            .references
            .push(Reference::new(DocumentId::new("A"), "B", 0));

        let mut result2 = AnalysisResult::new();
        result2.add_warning("warning2");

        result1.merge(result2);
        assert_eq!(result1.warnings.len(), 2);
        assert!(!result1.is_empty());
    }

    #[test]
    fn test_task_due_prefers_deadline() {
        let date = |d: &str| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap();
        let task = TaskItem {
            document: DocumentId::new("A"),
            block: 0,
            status: TaskStatus::Todo,
            priority: None,
            text: "x".into(),
            scheduled: Some(date("2024-01-10")),
            deadline: Some(date("2024-01-12")),
            properties: Properties::new(),
        };
        assert_eq!(task.due(), Some(date("2024-01-12")));
    }
}
