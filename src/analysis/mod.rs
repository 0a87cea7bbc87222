//! Link/tag extraction pipeline
//!
//! Scans the documents of a [`DocumentStore`](crate::graph::DocumentStore)
//! and produces an [`Extraction`]: references, tags, tasks, properties and
//! structural counts, in store order.
//!
//! # Architecture
//!
//! - **DocumentAnalyzer trait**: interface for analyzers that extract records
//! - **AnalysisOrchestrator**: runs registered analyzers in priority order
//! - **ResultMerger**: combines outputs and orders them by document
//!
//! # Example
//!
//! ```
//! use kbgraph::analysis::{AnalysisOrchestrator, AnalysisScope};
//! use kbgraph::graph::{Document, DocumentKind, DocumentStore};
//!
//! # tokio_test::block_on(async {
//! let store = DocumentStore::from_documents(vec![
//!     Document::parse("A", DocumentKind::Page, "- see [[B]] #demo"),
//! ])
//! .unwrap();
//!
//! let orchestrator = AnalysisOrchestrator::with_default_analyzers();
//! let extraction = orchestrator.analyze(&AnalysisScope::new(&store)).await.unwrap();
//! assert_eq!(extraction.references.len(), 1);
//! # });
//! ```

pub mod analyzers;
mod merger;
mod orchestrator;
mod traits;
mod types;

pub use merger::ResultMerger;
pub use orchestrator::AnalysisOrchestrator;
pub use traits::{AnalyzerRegistry, DocumentAnalyzer};
pub use types::{
    AnalysisCapability, AnalysisConfig, AnalysisError, AnalysisResult, AnalysisScope,
    DocumentStats, Extraction, LinkKind, MarkdownLink, Priority, PropertyOccurrence,
    PropertyScope, Reference, TagOccurrence, TagOrigin, TaskItem, TaskStatus,
};
