//! Document representation in the knowledge base

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name of a document, as written by its author
///
/// Matching between references and documents is case-insensitive; use
/// [`DocumentId::key`] for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalized lookup key
    pub fn key(&self) -> String {
        normalize_name(&self.0)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Lowercase, trimmed form of a page name used for case-insensitive matching
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether a document is a regular page or a dated journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Page,
    Journal,
}

/// `key:: value` metadata, ordered by key
pub type Properties = BTreeMap<String, String>;

/// Split a list-valued property (`tags:: a, [[b c]], #d`) into its items
pub fn property_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| {
            let item = item.trim();
            let item = item.strip_prefix('#').unwrap_or(item);
            let item = item
                .strip_prefix("[[")
                .and_then(|s| s.strip_suffix("]]"))
                .unwrap_or(item);
            item.trim().to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// One outline item of a document body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block text with bullet and indentation removed; continuation lines
    /// are joined with `\n`
    pub content: String,
    /// Nesting level, 0 for top-level blocks
    pub depth: usize,
    /// 1-based line of the block's first line in the source file
    pub line: usize,
    /// Block-level `key:: value` properties
    pub properties: Properties,
}

impl Block {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            depth: 0,
            line: 0,
            properties: Properties::new(),
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// First line of the block content
    pub fn first_line(&self) -> &str {
        self.content.lines().next().unwrap_or("")
    }
}

/// A page or journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub kind: DocumentKind,
    /// Source file, relative to the graph root
    pub path: Option<PathBuf>,
    /// Page-level properties
    pub properties: Properties,
    /// Ordered outline blocks
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create an empty page
    pub fn new(name: impl Into<DocumentId>) -> Self {
        Self {
            id: name.into(),
            kind: DocumentKind::Page,
            path: None,
            properties: Properties::new(),
            blocks: Vec::new(),
        }
    }

    /// Parse a document from Logseq-flavoured Markdown
    ///
    /// A `title::` page property replaces `name`.
    pub fn parse(name: impl Into<DocumentId>, kind: DocumentKind, text: &str) -> Self {
        let outline = super::outline::parse_outline(text);
        let mut id = name.into();
        if let Some(title) = outline.properties.get("title") {
            if !title.trim().is_empty() {
                id = DocumentId::new(title.as_str());
            }
        }
        Self {
            id,
            kind,
            path: None,
            properties: outline.properties,
            blocks: outline.blocks,
        }
    }

    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    /// Names declared with the `alias::` page property
    pub fn aliases(&self) -> Vec<String> {
        self.properties
            .get("alias")
            .map(|v| property_list(v))
            .unwrap_or_default()
    }

    pub fn is_journal(&self) -> bool {
        self.kind == DocumentKind::Journal
    }
}
