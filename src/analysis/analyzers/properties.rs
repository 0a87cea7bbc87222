//! Property analyzer
//!
//! Reports every `key:: value` pair found on pages and blocks.

use crate::analysis::{
    AnalysisCapability, AnalysisError, AnalysisResult, AnalysisScope, DocumentAnalyzer,
    PropertyOccurrence, PropertyScope,
};
use async_trait::async_trait;

/// Analyzer that extracts property usage
pub struct PropertyAnalyzer {
    priority: u32,
}

impl Default for PropertyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyAnalyzer {
    pub fn new() -> Self {
        Self { priority: 5 } // Run early, before structure analysis
    }
}

#[async_trait]
impl DocumentAnalyzer for PropertyAnalyzer {
    fn id(&self) -> &str {
        "property-analyzer"
    }

    fn name(&self) -> &str {
        "Property Analyzer"
    }

    fn capabilities(&self) -> Vec<AnalysisCapability> {
        vec![AnalysisCapability::Properties]
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<AnalysisResult, AnalysisError> {
        let mut result = AnalysisResult::new();

        for doc in scope.items_to_analyze() {
            for (key, value) in &doc.properties {
                result.properties.push(PropertyOccurrence {
                    document: doc.id.clone(),
                    key: key.clone(),
                    value: value.clone(),
                    scope: PropertyScope::Page,
                });
            }
            for block in &doc.blocks {
                for (key, value) in &block.properties {
                    result.properties.push(PropertyOccurrence {
                        document: doc.id.clone(),
                        key: key.clone(),
                        value: value.clone(),
                        scope: PropertyScope::Block,
                    });
                }
            }
        }

        Ok(result)
    }
}
