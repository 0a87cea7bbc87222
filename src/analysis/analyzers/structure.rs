//! Structure analyzer
//!
//! Counts blocks, headings, words and outline depth per document.

use crate::analysis::{
    AnalysisCapability, AnalysisError, AnalysisResult, AnalysisScope, DocumentAnalyzer,
    DocumentStats,
};
use crate::graph::{Block, Document};
use async_trait::async_trait;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Analyzer that produces [`DocumentStats`]
///
/// Headings are markdown `#` headings or blocks with `heading:: true`.
/// Words are counted in rendered text, so markup does not count. Tokens
/// without a letter or digit, such as a lone `-`, are not words.
pub struct StructureAnalyzer {
    priority: u32,
}

impl Default for StructureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureAnalyzer {
    pub fn new() -> Self {
        Self { priority: 10 }
    }

    /// (headings, words) in one block
    fn count_block(block: &Block) -> (usize, usize) {
        let mut headings = 0;
        // The parser splits `[[page]]` into several text events, so words
        // are counted once over the joined text
        let mut text = String::new();

        for event in Parser::new_ext(&block.content, Options::all()) {
            match event {
                Event::Start(Tag::Heading { .. }) => headings += 1,
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak
                | Event::HardBreak
                | Event::End(
                    TagEnd::Paragraph
                    | TagEnd::Heading(_)
                    | TagEnd::Item
                    | TagEnd::CodeBlock
                    | TagEnd::TableCell,
                ) => text.push(' '),
                _ => {}
            }
        }

        let words = text
            .split_whitespace()
            .filter(|w| w.chars().any(char::is_alphanumeric))
            .count();

        let heading_property = block
            .properties
            .get("heading")
            .map(|v| v.trim() == "true")
            .unwrap_or(false);
        if heading_property && headings == 0 {
            headings = 1;
        }

        (headings, words)
    }

    fn document_stats(doc: &Document) -> DocumentStats {
        let mut stats = DocumentStats::new(doc.id.clone());
        stats.blocks = doc.blocks.len();
        for block in &doc.blocks {
            let (headings, words) = Self::count_block(block);
            stats.headings += headings;
            stats.words += words;
            stats.max_depth = stats.max_depth.max(block.depth);
        }
        stats
    }
}

#[async_trait]
impl DocumentAnalyzer for StructureAnalyzer {
    fn id(&self) -> &str {
        "structure-analyzer"
    }

    fn name(&self) -> &str {
        "Structure Analyzer"
    }

    fn capabilities(&self) -> Vec<AnalysisCapability> {
        vec![AnalysisCapability::Structure]
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<AnalysisResult, AnalysisError> {
        let mut result = AnalysisResult::new();
        for doc in scope.items_to_analyze() {
            result.stats.push(Self::document_stats(doc));
        }
        Ok(result)
    }
}
