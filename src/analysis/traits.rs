//! Analyzer traits defining the extraction interface

use super::types::{AnalysisCapability, AnalysisError, AnalysisResult, AnalysisScope};
use crate::graph::DocumentKind;
use async_trait::async_trait;

/// Trait for document analyzers
///
/// Analyzers scan the documents in scope and return the records they
/// recognize. Malformed syntax is never an error: analyzers skip it.
///
/// # Example
///
/// ```ignore
/// struct WordCounter;
///
/// #[async_trait]
/// impl DocumentAnalyzer for WordCounter {
///     fn id(&self) -> &str { "word-counter" }
///     fn name(&self) -> &str { "Word Counter" }
///     fn capabilities(&self) -> Vec<AnalysisCapability> {
///         vec![AnalysisCapability::Structure]
///     }
///
///     async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<AnalysisResult, AnalysisError> {
///         Ok(AnalysisResult::new())
///     }
/// }
/// ```
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Unique identifier for this analyzer
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// What this analyzer extracts
    fn capabilities(&self) -> Vec<AnalysisCapability>;

    /// Which document kinds this analyzer reads
    fn handles(&self) -> Vec<DocumentKind> {
        vec![DocumentKind::Page, DocumentKind::Journal]
    }

    /// Priority for execution order (lower = earlier)
    fn priority(&self) -> u32 {
        100
    }

    /// Analyze the documents in scope
    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<AnalysisResult, AnalysisError>;

    fn can_handle(&self, kind: DocumentKind) -> bool {
        self.handles().contains(&kind)
    }
}

/// Registry of available analyzers
pub struct AnalyzerRegistry {
    analyzers: Vec<Box<dyn DocumentAnalyzer>>,
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self {
            analyzers: Vec::new(),
        }
    }

    pub fn register<A: DocumentAnalyzer + 'static>(&mut self, analyzer: A) {
        self.analyzers.push(Box::new(analyzer));
    }

    /// All analyzers sorted by priority; equal priorities keep registration order
    pub fn analyzers(&self) -> Vec<&dyn DocumentAnalyzer> {
        let mut analyzers: Vec<_> = self.analyzers.iter().map(|a| a.as_ref()).collect();
        analyzers.sort_by_key(|a| a.priority());
        analyzers
    }

    /// Analyzers providing a capability
    pub fn analyzers_with(&self, capability: AnalysisCapability) -> Vec<&dyn DocumentAnalyzer> {
        self.analyzers()
            .into_iter()
            .filter(|a| a.capabilities().contains(&capability))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}
