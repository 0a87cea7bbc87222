//! Link analyzer
//!
//! Extracts `[[double-bracket]]` references and markdown links from blocks.

use super::code::{code_ranges, in_code};
use crate::analysis::{
    AnalysisCapability, AnalysisError, AnalysisResult, AnalysisScope, DocumentAnalyzer, LinkKind,
    MarkdownLink, Reference,
};
use crate::graph::Document;
use async_trait::async_trait;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// A `[[target]]` or `[[target|label]]` found in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    pub target: String,
    pub label: Option<String>,
    /// Byte offset of the opening `[[`
    pub offset: usize,
}

/// Analyzer that extracts references between documents
///
/// Produces one [`Reference`] per `[[link]]` occurrence (no deduplication)
/// and one [`MarkdownLink`] per `[text](url)` link. `#[[tag]]` is left to
/// the tag analyzer.
pub struct LinkAnalyzer {
    priority: u32,
}

impl Default for LinkAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkAnalyzer {
    pub fn new() -> Self {
        Self { priority: 20 }
    }

    /// Classify a markdown link destination
    fn classify_link(url: &str) -> Option<LinkKind> {
        if url.starts_with("[[") && url.ends_with("]]") {
            // `[label]([[Page]])` is already counted as a reference
            None
        } else if url.starts_with('#') {
            Some(LinkKind::Anchor)
        } else if url.contains("://") || url.starts_with("mailto:") {
            Some(LinkKind::External)
        } else {
            Some(LinkKind::Internal)
        }
    }

    /// Extract wikilinks from text (not handled by pulldown-cmark)
    ///
    /// Unterminated links, links spanning a line break, and empty targets
    /// are skipped. A `[[` inside an open link restarts it.
    pub fn extract_wikilinks(content: &str) -> Vec<WikiLink> {
        let mut links = Vec::new();
        let bytes = content.as_bytes();
        let mut open: Option<usize> = None;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'[' && bytes.get(i + 1) == Some(&b'[') {
                open = Some(i);
                i += 2;
                continue;
            }
            if let Some(start) = open {
                if bytes[i] == b'\n' {
                    open = None;
                } else if bytes[i] == b']' && bytes.get(i + 1) == Some(&b']') {
                    open = None;
                    let tagged = start > 0 && bytes[start - 1] == b'#';
                    if !tagged {
                        if let Some(link) = Self::parse_inner(&content[start + 2..i], start) {
                            links.push(link);
                        }
                    }
                    i += 2;
                    continue;
                }
            }
            i += 1;
        }

        links
    }

    fn parse_inner(inner: &str, offset: usize) -> Option<WikiLink> {
        let (target, label) = match inner.find('|') {
            Some(pipe) => {
                let label = inner[pipe + 1..].trim();
                (
                    inner[..pipe].trim(),
                    (!label.is_empty()).then(|| label.to_string()),
                )
            }
            None => (inner.trim(), None),
        };
        if target.is_empty() {
            return None;
        }
        Some(WikiLink {
            target: target.to_string(),
            label,
            offset,
        })
    }

    fn markdown_links(content: &str, doc: &Document, result: &mut AnalysisResult) {
        let mut current_url = String::new();
        let mut current_text = String::new();
        let mut in_link = false;

        for event in Parser::new_ext(content, Options::all()) {
            match event {
                Event::Start(Tag::Link { dest_url, .. }) => {
                    in_link = true;
                    current_url = dest_url.to_string();
                    current_text.clear();
                }
                Event::End(TagEnd::Link) => {
                    in_link = false;
                    if let Some(kind) = Self::classify_link(&current_url) {
                        result.links.push(MarkdownLink {
                            document: doc.id.clone(),
                            url: std::mem::take(&mut current_url),
                            text: std::mem::take(&mut current_text),
                            kind,
                        });
                    }
                }
                Event::Text(text) | Event::Code(text) if in_link => {
                    current_text.push_str(&text);
                }
                _ => {}
            }
        }
    }

    fn parse_document(&self, doc: &Document, ignore_code: bool, result: &mut AnalysisResult) {
        for (index, block) in doc.blocks.iter().enumerate() {
            let code = if ignore_code {
                code_ranges(&block.content)
            } else {
                Vec::new()
            };

            for link in Self::extract_wikilinks(&block.content) {
                if in_code(&code, link.offset) {
                    continue;
                }
                let mut reference = Reference::new(doc.id.clone(), link.target, index);
                reference.label = link.label;
                result.references.push(reference);
            }

            Self::markdown_links(&block.content, doc, result);
        }
    }
}

#[async_trait]
impl DocumentAnalyzer for LinkAnalyzer {
    fn id(&self) -> &str {
        "link-analyzer"
    }

    fn name(&self) -> &str {
        "Link Analyzer"
    }

    fn capabilities(&self) -> Vec<AnalysisCapability> {
        vec![AnalysisCapability::References]
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<AnalysisResult, AnalysisError> {
        let mut result = AnalysisResult::new();

        for doc in scope.items_to_analyze() {
            if !self.can_handle(doc.kind) {
                continue;
            }
            self.parse_document(doc, scope.config.ignore_code, &mut result);
        }

        Ok(result)
    }
}
