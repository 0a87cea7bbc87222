//! Library entry point.
//!
//! `KnowledgeBase` ties the layers together: it owns a loaded
//! [`DocumentStore`], runs the analyzers over it, aggregates the result and
//! hands out a renderer configured from the same settings. The CLI only talks
//! to this type.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::aggregate::AnalysisReport;
use crate::analysis::{AnalysisError, AnalysisOrchestrator, AnalysisScope, Extraction};
use crate::config::{ConfigError, KbConfig};
use crate::graph::{DocumentId, DocumentStore, StoreError};
use crate::report::{ReportKind, ReportRenderer};
use crate::storage::{load_graph, ReportWriter, StorageError};

/// Any error the library can return
#[derive(Debug, Error)]
pub enum KbError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type KbResult<T> = Result<T, KbError>;

/// A knowledge base ready for analysis
pub struct KnowledgeBase {
    root: Option<PathBuf>,
    store: DocumentStore,
    skipped: Vec<PathBuf>,
    config: KbConfig,
    orchestrator: AnalysisOrchestrator,
}

impl KnowledgeBase {
    /// Load the graph directory at `root`
    pub fn open(root: impl AsRef<Path>, config: KbConfig) -> KbResult<Self> {
        config.validate()?;
        let loaded = load_graph(root.as_ref(), &config.load_options())?;
        Ok(Self {
            root: Some(loaded.root),
            store: loaded.store,
            skipped: loaded.skipped,
            config,
            orchestrator: AnalysisOrchestrator::with_default_analyzers(),
        })
    }

    /// Wrap documents that are already in memory
    pub fn from_store(store: DocumentStore, config: KbConfig) -> Self {
        Self {
            root: None,
            store,
            skipped: Vec::new(),
            config,
            orchestrator: AnalysisOrchestrator::with_default_analyzers(),
        }
    }

    /// Replace the analyzer set
    pub fn with_orchestrator(mut self, orchestrator: AnalysisOrchestrator) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Files found on disk but not loaded
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    /// Run every analyzer over the whole store
    pub async fn extract(&self) -> KbResult<Extraction> {
        let scope = AnalysisScope::new(&self.store).with_config(self.config.analysis_config());
        Ok(self.orchestrator.analyze(&scope).await?)
    }

    /// Run the analyzers over a subset of documents
    pub async fn extract_changed(&self, changed: Vec<DocumentId>) -> KbResult<Extraction> {
        let scope = AnalysisScope::new(&self.store)
            .with_changes(changed)
            .with_config(self.config.analysis_config());
        Ok(self.orchestrator.analyze(&scope).await?)
    }

    /// Extract and aggregate, with `as_of` as the reference date for tasks
    pub async fn analyze(&self, as_of: NaiveDate) -> KbResult<AnalysisReport> {
        let extraction = self.extract().await?;
        let mut report =
            AnalysisReport::build(&self.store, &extraction, &self.config.aggregate_config(as_of));
        for path in &self.skipped {
            report
                .warnings
                .push(format!("skipped unreadable file {}", path.display()));
        }
        Ok(report)
    }

    pub fn renderer(&self) -> ReportRenderer {
        ReportRenderer::new()
            .with_precision(self.config.decimal_places)
            .with_top_n(self.config.top_n)
    }

    /// Render every Markdown report into `dir`
    pub fn write_reports(&self, report: &AnalysisReport, dir: impl Into<PathBuf>) -> KbResult<Vec<PathBuf>> {
        let writer = ReportWriter::new(dir);
        let rendered = self.renderer().render_all(report);
        let files = rendered
            .iter()
            .map(|(kind, text)| (kind.file_name(), text.as_str()));
        Ok(writer.write_all(files)?)
    }

    /// Write the JSON form of the report into `dir`
    pub fn write_json(&self, report: &AnalysisReport, dir: impl Into<PathBuf>) -> KbResult<PathBuf> {
        let json = self.renderer().render_json(report)?;
        Ok(ReportWriter::new(dir).write(JSON_FILE_NAME, &json)?)
    }

    pub fn render(&self, kind: ReportKind, report: &AnalysisReport) -> String {
        self.renderer().render(kind, report)
    }
}

/// File name of the JSON report
pub const JSON_FILE_NAME: &str = "analysis.json";

/// Load, analyze and aggregate a graph directory in one call
pub async fn analyze_directory(
    root: impl AsRef<Path>,
    config: KbConfig,
    as_of: NaiveDate,
) -> KbResult<AnalysisReport> {
    KnowledgeBase::open(root, config)?.analyze(as_of).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Document, DocumentKind};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[tokio::test]
    async fn test_from_store() {
        let store = DocumentStore::from_documents(vec![
            Document::parse("A", DocumentKind::Page, "- [[B]]"),
            Document::parse("B", DocumentKind::Page, "- [[A]] [[A]]"),
        ])
        .unwrap();
        let kb = KnowledgeBase::from_store(store, KbConfig::default());

        let report = kb.analyze(as_of()).await.unwrap();
        assert_eq!(report.summary.total_references, 3);
        assert_eq!(report.network.degree("A").unwrap().in_degree, 2);
        assert!(kb.root().is_none());
    }

    #[tokio::test]
    async fn test_extract_changed() {
        let store = DocumentStore::from_documents(vec![
            Document::parse("A", DocumentKind::Page, "- [[B]]"),
            Document::parse("B", DocumentKind::Page, "- [[A]]"),
        ])
        .unwrap();
        let kb = KnowledgeBase::from_store(store, KbConfig::default());

        let extraction = kb.extract_changed(vec![DocumentId::new("B")]).await.unwrap();
        assert_eq!(extraction.references.len(), 1);
        assert_eq!(extraction.references[0].source.as_str(), "B");
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = KnowledgeBase::open(dir.path().join("missing"), KbConfig::default());
        assert!(matches!(result, Err(KbError::Storage(StorageError::NotFound(_)))));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = KbConfig {
            top_n: 0,
            ..KbConfig::default()
        };
        let result = KnowledgeBase::open(dir.path(), config);
        assert!(matches!(result, Err(KbError::Config(ConfigError::Invalid(_)))));
    }
}
