//! kbgraph: link and tag analysis for Logseq-style knowledge bases
//!
//! Reads a directory of outliner Markdown pages and journals, extracts
//! `[[page]]` references, `#tags`, tasks and properties, aggregates them into
//! a link graph and renders deterministic Markdown (or JSON) reports.
//!
//! # Pipeline
//!
//! - **Document store** ([`graph`]): named documents with properties and blocks
//! - **Extractor** ([`analysis`]): async analyzers producing an [`Extraction`]
//! - **Aggregator** ([`aggregate`]): degrees, hubs, tag and task statistics
//! - **Renderer** ([`report`]): Markdown tables and lists
//!
//! # Example
//!
//! ```
//! use kbgraph::{Document, DocumentKind, DocumentStore, KbConfig, KnowledgeBase};
//!
//! let store = DocumentStore::from_documents(vec![
//!     Document::parse("A", DocumentKind::Page, "- [[B]] and [[C]]"),
//!     Document::parse("B", DocumentKind::Page, "- leaf"),
//! ])
//! .unwrap();
//! let kb = KnowledgeBase::from_store(store, KbConfig::default());
//! let as_of = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let report = tokio_test::block_on(kb.analyze(as_of)).unwrap();
//! assert_eq!(report.summary.total_references, 2);
//! assert_eq!(report.summary.missing_pages, 1);
//! ```

pub mod aggregate;
pub mod analysis;
mod api;
pub mod config;
pub mod graph;
pub mod report;
pub mod storage;

pub use aggregate::{AggregateConfig, AnalysisReport, GraphSummary, LinkGraph, TagCountMode};
pub use analysis::{AnalysisError, AnalysisOrchestrator, Extraction};
pub use api::{analyze_directory, KbError, KbResult, KnowledgeBase, JSON_FILE_NAME};
pub use config::{ConfigError, KbConfig};
pub use graph::{Document, DocumentId, DocumentKind, DocumentStore, StoreError};
pub use report::{ReportKind, ReportRenderer};
pub use storage::{load_graph, LoadOptions, StorageError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
