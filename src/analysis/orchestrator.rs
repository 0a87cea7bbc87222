//! Analysis orchestrator for coordinating multiple analyzers

use super::analyzers::{
    LinkAnalyzer, PropertyAnalyzer, StructureAnalyzer, TagAnalyzer, TaskAnalyzer,
};
use super::merger::ResultMerger;
use super::traits::{AnalyzerRegistry, DocumentAnalyzer};
use super::types::{AnalysisError, AnalysisResult, AnalysisScope, Extraction};
use std::collections::HashSet;

/// Runs registered analyzers over a scope and merges their output
pub struct AnalysisOrchestrator {
    registry: AnalyzerRegistry,
    merger: ResultMerger,
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisOrchestrator {
    /// Create an orchestrator with no analyzers
    pub fn new() -> Self {
        Self {
            registry: AnalyzerRegistry::new(),
            merger: ResultMerger::new(),
        }
    }

    /// Create an orchestrator with every built-in analyzer registered
    pub fn with_default_analyzers() -> Self {
        let mut orchestrator = Self::new();
        orchestrator.register(PropertyAnalyzer::new());
        orchestrator.register(StructureAnalyzer::new());
        orchestrator.register(LinkAnalyzer::new());
        orchestrator.register(TagAnalyzer::new());
        orchestrator.register(TaskAnalyzer::new());
        orchestrator
    }

    pub fn register<A: DocumentAnalyzer + 'static>(&mut self, analyzer: A) {
        self.registry.register(analyzer);
    }

    pub fn registry(&self) -> &AnalyzerRegistry {
        &self.registry
    }

    /// Run all applicable analyzers on the scope
    ///
    /// A failing analyzer does not abort the run; its error is logged and
    /// recorded as a warning in the extraction.
    pub async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<Extraction, AnalysisError> {
        let mut warnings = Vec::new();
        let oversized = self.oversized_documents(scope, &mut warnings);

        let filtered;
        let scope = if oversized.is_empty() {
            scope
        } else {
            let kept: Vec<_> = scope
                .items_to_analyze()
                .into_iter()
                .filter(|doc| !oversized.contains(&doc.id.key()))
                .map(|doc| doc.id.clone())
                .collect();
            if kept.is_empty() {
                let mut warning_result = AnalysisResult::new();
                warning_result.warnings = warnings;
                return Ok(self.merger.merge(vec![warning_result], scope));
            }
            filtered = scope.clone().with_changes(kept);
            &filtered
        };

        let kinds: HashSet<_> = scope.items_to_analyze().iter().map(|d| d.kind).collect();

        let mut results = Vec::with_capacity(self.registry.len() + 1);
        for analyzer in self.registry.analyzers() {
            if !kinds.iter().any(|kind| analyzer.can_handle(*kind)) {
                continue;
            }
            tracing::debug!(analyzer = analyzer.id(), "running analyzer");
            match analyzer.analyze(scope).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(analyzer = analyzer.id(), error = %e, "analyzer failed");
                    let mut error_result = AnalysisResult::new();
                    error_result.add_warning(format!("Analyzer '{}' failed: {}", analyzer.id(), e));
                    results.push(error_result);
                }
            }
        }

        let mut warning_result = AnalysisResult::new();
        warning_result.warnings = warnings;
        results.push(warning_result);

        Ok(self.merger.merge(results, scope))
    }

    /// Keys of documents exceeding the configured size limit
    fn oversized_documents(
        &self,
        scope: &AnalysisScope<'_>,
        warnings: &mut Vec<String>,
    ) -> HashSet<String> {
        let Some(max) = scope.config.max_document_bytes else {
            return HashSet::new();
        };
        let mut oversized = HashSet::new();
        for doc in scope.items_to_analyze() {
            let size: usize = doc.blocks.iter().map(|b| b.content.len()).sum();
            if size > max {
                let err = AnalysisError::ContentTooLarge { size, max };
                tracing::warn!(document = %doc.id, error = %err, "skipping document");
                warnings.push(format!("Skipped '{}': {}", doc.id, err));
                oversized.insert(doc.id.key());
            }
        }
        oversized
    }

    /// Registered analyzer IDs in execution order
    pub fn analyzer_ids(&self) -> Vec<&str> {
        self.registry.analyzers().iter().map(|a| a.id()).collect()
    }
}
