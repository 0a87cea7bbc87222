//! Tag analyzer
//!
//! Extracts `#tag` and `#[[multi word]]` tags from block text, and
//! `tags::` values from page and block properties.

use super::code::{code_ranges, in_code};
use crate::analysis::{
    AnalysisCapability, AnalysisError, AnalysisResult, AnalysisScope, DocumentAnalyzer,
    TagOccurrence, TagOrigin,
};
use crate::graph::{property_list, Document};
use async_trait::async_trait;

/// Characters that end a bare `#tag`
pub(crate) const TAG_TERMINATORS: &[char] = &[',', ';', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}', '<', '>'];

/// Analyzer that extracts tags
pub struct TagAnalyzer {
    priority: u32,
}

impl Default for TagAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TagAnalyzer {
    pub fn new() -> Self {
        Self { priority: 30 }
    }

    /// Extract hash tags with the byte offset of their `#`
    ///
    /// A `#` only starts a tag at the beginning of the text or after
    /// whitespace or `(`, so headings, URL fragments and `C#` are ignored.
    pub fn extract_hashtags(content: &str) -> Vec<(String, usize)> {
        let mut tags = Vec::new();
        let mut previous: Option<char> = None;

        for (offset, c) in content.char_indices() {
            let boundary = match previous {
                None => true,
                Some(p) => p.is_whitespace() || p == '(',
            };
            previous = Some(c);
            if c != '#' || !boundary {
                continue;
            }

            let rest = &content[offset + 1..];
            if let Some(inner) = rest.strip_prefix("[[") {
                if let Some(end) = inner.find("]]") {
                    let name = inner[..end].trim();
                    if !name.is_empty() && !name.contains('\n') && !name.contains("[[") {
                        tags.push((name.to_string(), offset));
                    }
                }
                continue;
            }

            let end = rest
                .find(|ch: char| ch.is_whitespace() || TAG_TERMINATORS.contains(&ch))
                .unwrap_or(rest.len());
            let name = rest[..end].trim_end_matches(&['.', ':'][..]);
            if name.is_empty() || name.starts_with('#') {
                continue;
            }
            tags.push((name.to_string(), offset));
        }

        tags
    }

    fn push(result: &mut AnalysisResult, doc: &Document, tag: String, origin: TagOrigin, block: Option<usize>) {
        result.tags.push(TagOccurrence {
            document: doc.id.clone(),
            tag,
            origin,
            block,
        });
    }

    fn parse_document(&self, doc: &Document, ignore_code: bool, result: &mut AnalysisResult) {
        if let Some(value) = doc.properties.get("tags") {
            for tag in property_list(value) {
                Self::push(result, doc, tag, TagOrigin::Property, None);
            }
        }

        for (index, block) in doc.blocks.iter().enumerate() {
            if let Some(value) = block.properties.get("tags") {
                for tag in property_list(value) {
                    Self::push(result, doc, tag, TagOrigin::Property, Some(index));
                }
            }

            let code = if ignore_code {
                code_ranges(&block.content)
            } else {
                Vec::new()
            };
            for (tag, offset) in Self::extract_hashtags(&block.content) {
                if in_code(&code, offset) {
                    continue;
                }
                Self::push(result, doc, tag, TagOrigin::Inline, Some(index));
            }
        }
    }
}

#[async_trait]
impl DocumentAnalyzer for TagAnalyzer {
    fn id(&self) -> &str {
        "tag-analyzer"
    }

    fn name(&self) -> &str {
        "Tag Analyzer"
    }

    fn capabilities(&self) -> Vec<AnalysisCapability> {
        vec![AnalysisCapability::Tags]
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<AnalysisResult, AnalysisError> {
        let mut result = AnalysisResult::new();
        for doc in scope.items_to_analyze() {
            self.parse_document(doc, scope.config.ignore_code, &mut result);
        }
        Ok(result)
    }
}
